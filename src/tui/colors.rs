//! Colour handling for the terminal user interface.

use ratatui::style::Color;

use crate::theme::TeamColor;

/// Marker line for today.
pub const TODAY_RED: Color = Color::Rgb(239, 68, 68);
/// Interval grid lines.
pub const GRID_GREY: Color = Color::Rgb(90, 90, 90);
/// Axis labels and secondary text.
pub const LABEL_GREY: Color = Color::Rgb(160, 160, 160);

/// Parse `#RRGGBB` (or `RRGGBB`) into a terminal colour.
pub fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Terminal colours for one team's bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPalette {
    pub bar: Color,
    pub border: Color,
    pub text: Color,
    pub progress: Color,
}

impl From<&TeamColor> for TeamPalette {
    fn from(c: &TeamColor) -> Self {
        TeamPalette {
            bar: parse_hex(&c.bg).unwrap_or(Color::Gray),
            border: parse_hex(&c.border).unwrap_or(Color::Cyan),
            text: parse_hex(&c.text).unwrap_or(Color::Black),
            progress: parse_hex(&c.progress_bg).unwrap_or(Color::Blue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#0EA5E9"), Some(Color::Rgb(14, 165, 233)));
        assert_eq!(parse_hex("ffffff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex("#FFF"), None);
        assert_eq!(parse_hex("#GGGGGG"), None);
    }
}
