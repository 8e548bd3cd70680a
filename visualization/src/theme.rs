//! Terminal color theme
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use owo_colors::{OwoColorize, Style};

/// Styles used by the text renderer. Table cells are never styled, so
/// column widths stay exact.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub label: Style,
    pub muted: Style,
    pub fault: Style,
    pub error: Style,
    pub warning: Style,
    pub info: Style,
    pub active: Style,
}

impl Theme {
    pub fn colored() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().magenta(),
            muted: Style::new().bright_black(),
            fault: Style::new().red().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow(),
            info: Style::new().cyan(),
            active: Style::new().white().bold().underline(),
        }
    }

    /// No escape codes at all, for pipes and tests
    pub fn plain() -> Self {
        Self {
            title: Style::new(),
            label: Style::new(),
            muted: Style::new(),
            fault: Style::new(),
            error: Style::new(),
            warning: Style::new(),
            info: Style::new(),
            active: Style::new(),
        }
    }

    pub fn for_color(color: bool) -> Self {
        if color {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::colored()
    }
}

pub fn styled<T: std::fmt::Display>(text: T, style: Style) -> String {
    text.style(style).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_adds_no_escapes() {
        let theme = Theme::plain();
        assert_eq!(styled("Fault", theme.fault), "Fault");
        assert_eq!(styled(42, theme.label), "42");
    }

    #[test]
    fn test_colored_theme_adds_escapes() {
        let theme = Theme::for_color(true);
        let text = styled("Fault", theme.fault);
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("Fault"));
    }
}
