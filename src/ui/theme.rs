//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::RouteHealth;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for idle routes.
    pub idle: Color,
    /// Color for failed/stopped routes.
    pub failed: Color,
    /// Color for active routes.
    pub active: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            idle: Color::Gray,
            failed: Color::Red,
            active: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            idle: Color::DarkGray,
            failed: Color::Red,
            active: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a route health bucket
    pub fn status_style(&self, health: RouteHealth) -> Style {
        match health {
            RouteHealth::Active => Style::default().fg(self.active),
            RouteHealth::Idle => Style::default().fg(self.idle),
            RouteHealth::Failed => Style::default().fg(self.failed).add_modifier(Modifier::BOLD),
        }
    }
}

/// Parse a `#RRGGBB` hex string into a terminal color.
///
/// Service and edge colors travel as hex strings; anything that does
/// not parse falls back to the default foreground.
pub fn hex_color(hex: &str) -> Color {
    let digits = match hex.strip_prefix('#') {
        // Length is in bytes; multibyte input must not reach the slices
        Some(d) if d.len() == 6 && d.is_ascii() => d,
        _ => return Color::Reset,
    };
    let parse = |range| u8::from_str_radix(&digits[range], 16);
    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parses_rgb() {
        assert_eq!(hex_color("#ff251e"), Color::Rgb(0xff, 0x25, 0x1e));
        assert_eq!(hex_color("#B2B2B2"), Color::Rgb(0xb2, 0xb2, 0xb2));
    }

    #[test]
    fn test_hex_color_rejects_malformed() {
        assert_eq!(hex_color("ff251e"), Color::Reset);
        assert_eq!(hex_color("#fff"), Color::Reset);
        assert_eq!(hex_color("#zzzzzz"), Color::Reset);
    }

    #[test]
    fn test_hex_color_rejects_multibyte_without_panicking() {
        // Colors arrive from upstream JSON; 6 bytes is not 6 hex digits
        assert_eq!(hex_color("#aébbb"), Color::Reset);
        assert_eq!(hex_color("#ééé"), Color::Reset);
    }

    #[test]
    fn test_status_styles_differ() {
        let theme = Theme::dark();
        assert_ne!(
            theme.status_style(RouteHealth::Active),
            theme.status_style(RouteHealth::Failed)
        );
    }
}
