use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Priority, TaskStatus, UiConfig};
use crate::util::dates::DateBadge;

/// Parsed color theme for the terminal table
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub header_bg: Color,
    pub selection_bg: Color,
    /// Per-tag colors
    pub tag_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut tag_colors = HashMap::new();
        tag_colors.insert("research".into(), Color::Rgb(0x44, 0x88, 0xFF));
        tag_colors.insert("design".into(), Color::Rgb(0x44, 0xDD, 0xFF));
        tag_colors.insert("ready".into(), Color::Rgb(0x44, 0xFF, 0x88));
        tag_colors.insert("bug".into(), Color::Rgb(0xFF, 0x44, 0x44));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            header_bg: Color::Rgb(0x1A, 0x0A, 0x2E),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            tag_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "red" => &mut theme.red,
                "yellow" => &mut theme.yellow,
                "green" => &mut theme.green,
                "cyan" => &mut theme.cyan,
                "purple" => &mut theme.purple,
                "blue" => &mut theme.blue,
                "header_bg" => &mut theme.header_bg,
                "selection_bg" => &mut theme.selection_bg,
                _ => continue,
            };
            *slot = color;
        }

        for (tag, value) in &ui.tag_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.tag_colors.insert(tag.clone(), color);
            }
        }

        theme
    }

    /// Get the color for a tag, falling back to text color
    pub fn tag_color(&self, tag: &str) -> Color {
        self.tag_colors.get(tag).copied().unwrap_or(self.text)
    }

    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::NotStarted => self.text,
            TaskStatus::InProgress => self.highlight,
            TaskStatus::Completed => self.green,
            TaskStatus::Abandoned => self.dim,
            TaskStatus::Planned => self.cyan,
        }
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Lowest | Priority::Low => self.dim,
            Priority::Medium => self.text,
            Priority::High => self.yellow,
            Priority::Highest => self.red,
        }
    }

    pub fn badge_color(&self, badge: DateBadge) -> Color {
        match badge {
            DateBadge::Overdue | DateBadge::Yesterday => self.red,
            DateBadge::Today => self.highlight,
            DateBadge::Tomorrow => self.yellow,
            DateBadge::Upcoming(_) => self.dim,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.colors.insert("selection_bg".into(), "#223344".into());
        ui.colors.insert("nonsense".into(), "#111111".into());
        ui.tag_colors.insert("custom".into(), "#112233".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.selection_bg, Color::Rgb(0x22, 0x33, 0x44));
        assert_eq!(theme.tag_color("custom"), Color::Rgb(0x11, 0x22, 0x33));
        // Unchanged defaults still present
        assert_eq!(theme.text, Color::Rgb(0xB0, 0xAA, 0xFF));
    }

    #[test]
    fn test_tag_color_fallback() {
        let theme = Theme::default();
        assert_eq!(theme.tag_color("bug"), theme.red);
        assert_eq!(theme.tag_color("unknown"), theme.text);
    }

    #[test]
    fn test_badge_colors() {
        let theme = Theme::default();
        assert_eq!(theme.badge_color(DateBadge::Overdue), theme.red);
        assert_eq!(theme.badge_color(DateBadge::Upcoming(3)), theme.dim);
        assert_eq!(theme.status_color(TaskStatus::InProgress), theme.highlight);
    }
}
