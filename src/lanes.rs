//! Lane packing for one team's tasks.
//!
//! Tasks are placed greedily, first fit: sorted by start then end date, each
//! task goes into the lowest row where it touches nothing already placed.
//! Rows are buckets in an indexed arena; a task is never moved once placed.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::pad_end;
use crate::task::Task;

/// Most rows a team may open. Tasks that fit nowhere share the last one.
pub const MAX_ROWS: usize = 20;

/// A task together with the row it was packed into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedTask<'a> {
    pub task: &'a Task,
    pub row_index: usize,
    /// Placed in the last row despite overlapping a task already there.
    pub forced: bool,
}

/// Whether two `[start, end]` bars would touch once drawn.
///
/// Both ends get the render pad, so bars meeting on the same day count as
/// overlapping and a bar starting the day after another ends does not.
/// Padding both sides also keeps two single-day tasks on the same day in
/// separate rows, where a test padding only the placed bar lets them share one.
pub fn tasks_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> bool {
    a.0 < pad_end(b.1) && b.0 < pad_end(a.1)
}

/// Assign a row to every task of one team.
///
/// Ordering is deterministic: a stable sort on `(start, end)`. The output is
/// grouped by row, lowest row first; within a row tasks keep sorted order.
/// `today` stands in for unusable dates.
pub fn pack_lanes(tasks: &[Task], today: NaiveDate) -> Vec<PlacedTask<'_>> {
    let mut sorted: Vec<(&Task, (NaiveDate, NaiveDate))> = tasks
        .iter()
        .map(|t| (t, (t.start_at(today), t.end_at(today))))
        .collect();
    sorted.sort_by(|a, b| a.1.cmp(&b.1));

    let mut rows: Vec<Vec<(&Task, (NaiveDate, NaiveDate), bool)>> = Vec::new();

    for (task, span) in sorted {
        let free = rows
            .iter()
            .take(MAX_ROWS)
            .position(|row| row.iter().all(|&(_, placed, _)| !tasks_overlap(span, placed)));

        let (row_index, forced) = match free {
            Some(idx) => (idx, false),
            None if rows.len() < MAX_ROWS => {
                rows.push(Vec::new());
                (rows.len() - 1, false)
            }
            None => (MAX_ROWS - 1, true),
        };
        rows[row_index].push((task, span, forced));
    }

    rows.into_iter()
        .enumerate()
        .flat_map(|(row_index, row)| {
            row.into_iter()
                .map(move |(task, _, forced)| PlacedTask { task, row_index, forced })
        })
        .collect()
}

/// Number of tasks that had to overlap another in the last row.
pub fn forced_count(placed: &[PlacedTask<'_>]) -> usize {
    placed.iter().filter(|p| p.forced).count()
}

/// Number of rows a packed team occupies; at least one.
pub fn row_count(placed: &[PlacedTask<'_>]) -> usize {
    placed.iter().map(|p| p.row_index + 1).max().unwrap_or(1)
}
