//! Color themes. The site has a persisted dark/light toggle; both palettes
//! live here so the toggle is a pure swap.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub heading: Color,
    pub code_fg: Color,
    pub code_bg: Color,
    pub border: Color,
    pub error: Color,
    pub badge: Color,
    pub liked: Color,
    pub overlay_bg: Color,
}

pub const THEME_DARK: &str = "dark";
pub const THEME_LIGHT: &str = "light";

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(24, 24, 30),
            fg: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(130, 130, 140),
            accent: Color::Rgb(57, 197, 187),
            heading: Color::Rgb(137, 220, 235),
            code_fg: Color::Rgb(230, 200, 120),
            code_bg: Color::Rgb(40, 40, 48),
            border: Color::Rgb(90, 90, 100),
            error: Color::Rgb(235, 110, 110),
            badge: Color::Rgb(255, 180, 80),
            liked: Color::Rgb(240, 120, 160),
            overlay_bg: Color::Rgb(16, 16, 20),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(250, 250, 248),
            fg: Color::Rgb(40, 40, 40),
            dim: Color::Rgb(120, 120, 120),
            accent: Color::Rgb(0, 150, 140),
            heading: Color::Rgb(20, 110, 160),
            code_fg: Color::Rgb(140, 90, 0),
            code_bg: Color::Rgb(235, 235, 228),
            border: Color::Rgb(180, 180, 180),
            error: Color::Rgb(190, 40, 40),
            badge: Color::Rgb(200, 120, 0),
            liked: Color::Rgb(210, 70, 120),
            overlay_bg: Color::Rgb(240, 240, 236),
        }
    }

    /// Resolve a configured theme name; unknown names fall back to dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            THEME_LIGHT => Self::light(),
            _ => Self::dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_falls_back_to_dark() {
        assert_eq!(Theme::from_name("solarized"), Theme::dark());
        assert_eq!(Theme::from_name(THEME_LIGHT), Theme::light());
    }
}
