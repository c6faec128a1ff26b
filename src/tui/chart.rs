//! Gantt chart widget.
//!
//! The layout engine works in percentages of the date window; this widget
//! maps them onto terminal columns. The first line is the axis, every line
//! after it is either a team header or one lane of that team.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::geometry::Geometry;
use crate::layout::TimelineLayout;
use crate::theme::TeamColors;
use crate::tui::colors::{TeamPalette, GRID_GREY, LABEL_GREY, TODAY_RED};
use crate::tui::utils::truncate;

/// Widest the team label column gets.
pub const LABEL_WIDTH: u16 = 16;

const GRID_CHAR: char = '┆';
const TODAY_CHAR: char = '│';
const TODAY_HEAD: char = '▼';

/// Column inside a track of `width` columns for a percentage of the window.
pub fn percent_to_column(percent: f64, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let p = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 0.0 };
    let col = (p / 100.0 * f64::from(width)).floor() as u16;
    col.min(width - 1)
}

/// First column and length of a bar. Every bar gets at least one column.
pub fn bar_span(geometry: &Geometry, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let start = percent_to_column(geometry.left, width);
    let right = geometry.right().clamp(0.0, 100.0);
    let end = ((right / 100.0 * f64::from(width)).round() as u16).min(width);
    let len = end.saturating_sub(start).max(1);
    (start, len.min(width - start))
}

/// Columns of a bar of `len` columns covered by the progress fill.
pub fn progress_columns(len: u16, progress: f64) -> u16 {
    let filled = (f64::from(len) * progress.clamp(0.0, 100.0) / 100.0).round() as u16;
    filled.min(len)
}

/// One line of the chart body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartLine {
    Team(usize),
    Lane { team: usize, row: usize },
}

/// Body lines in display order.
pub fn chart_lines(layout: &TimelineLayout) -> Vec<ChartLine> {
    let mut lines = Vec::new();
    for (t, lanes) in layout.teams.iter().enumerate() {
        lines.push(ChartLine::Team(t));
        for row in 0..lanes.row_count {
            lines.push(ChartLine::Lane { team: t, row });
        }
    }
    lines
}

/// Body line holding the `index`-th bar of `layout.bars()`.
pub fn bar_line(layout: &TimelineLayout, index: usize) -> Option<usize> {
    let mut line = 0;
    let mut seen = 0;
    for lanes in &layout.teams {
        if index < seen + lanes.bars.len() {
            return Some(line + 1 + lanes.bars[index - seen].row_index);
        }
        seen += lanes.bars.len();
        line += 1 + lanes.row_count;
    }
    None
}

/// The chart for one layout.
pub struct GanttChart<'a> {
    layout: &'a TimelineLayout,
    colors: &'a TeamColors,
    selected: Option<usize>,
    scroll: usize,
}

impl<'a> GanttChart<'a> {
    pub fn new(layout: &'a TimelineLayout, colors: &'a TeamColors) -> Self {
        GanttChart {
            layout,
            colors,
            selected: None,
            scroll: 0,
        }
    }

    /// Highlight the `index`-th bar of `layout.bars()`.
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Skip this many body lines.
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn render_axis(&self, track: Rect, buf: &mut Buffer) {
        let mut left = 0.0;
        for interval in &self.layout.intervals {
            let col = percent_to_column(left, track.width);
            let next = percent_to_column(left + interval.width, track.width);
            left += interval.width;
            let room = next.saturating_sub(col) as usize;
            if room < 2 {
                continue;
            }
            let label = truncate(&interval.label, room - 1);
            buf.set_string(track.x + col, track.y, label, Style::default().fg(LABEL_GREY));
        }
    }

    fn interval_columns(&self, width: u16) -> Vec<u16> {
        let mut cols = Vec::with_capacity(self.layout.intervals.len());
        let mut left = 0.0;
        for interval in &self.layout.intervals {
            let col = percent_to_column(left, width);
            if col > 0 {
                cols.push(col);
            }
            left += interval.width;
        }
        cols
    }

    fn render_lane(&self, team: usize, row: usize, track: Rect, y: u16, buf: &mut Buffer) {
        let lanes = &self.layout.teams[team];
        let palette = TeamPalette::from(&self.colors.get(&lanes.team));
        let first_index: usize = self.layout.teams[..team].iter().map(|t| t.bars.len()).sum();

        for (i, bar) in lanes.bars.iter().enumerate() {
            if bar.row_index != row {
                continue;
            }
            let (start, len) = bar_span(&bar.geometry, track.width);
            let filled = progress_columns(len, bar.task.clamped_progress());
            let selected = self.selected == Some(first_index + i);

            let mut title = truncate(&bar.task.title, len as usize).chars().collect::<Vec<_>>();
            title.resize(len as usize, ' ');

            for (offset, ch) in title.into_iter().enumerate() {
                let offset = offset as u16;
                let bg = if offset < filled { palette.progress } else { palette.bar };
                let mut style = Style::default().bg(bg).fg(palette.text);
                if selected {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }
                if let Some(cell) = buf.cell_mut((track.x + start + offset, y)) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
    }
}

impl Widget for GanttChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 || area.width < 4 {
            return;
        }
        let label_width = LABEL_WIDTH.min(area.width / 4);
        let track = Rect {
            x: area.x + label_width,
            y: area.y,
            width: area.width - label_width,
            height: area.height,
        };

        self.render_axis(track, buf);

        let grid = self.interval_columns(track.width);
        let today_col = percent_to_column(self.layout.today_position, track.width);
        buf.set_string(track.x + today_col, area.y, TODAY_HEAD.to_string(), Style::default().fg(TODAY_RED));

        let lines = chart_lines(self.layout);
        let body_height = (area.height - 1) as usize;
        for (i, line) in lines.iter().skip(self.scroll).take(body_height).enumerate() {
            let y = area.y + 1 + i as u16;

            for &col in &grid {
                buf.set_string(track.x + col, y, GRID_CHAR.to_string(), Style::default().fg(GRID_GREY));
            }
            buf.set_string(track.x + today_col, y, TODAY_CHAR.to_string(), Style::default().fg(TODAY_RED));

            match *line {
                ChartLine::Team(t) => {
                    let lanes = &self.layout.teams[t];
                    let palette = TeamPalette::from(&self.colors.get(&lanes.team));
                    let name = truncate(&lanes.team, label_width.saturating_sub(1) as usize);
                    buf.set_string(
                        area.x,
                        y,
                        name,
                        Style::default().fg(palette.border).add_modifier(Modifier::BOLD),
                    );
                },
                ChartLine::Lane { team, row } => {
                    self.render_lane(team, row, track, y, buf);
                },
            }
        }
    }
}
