//! Color themes for the wizard screen.

use ratatui::style::Color;

/// Colors used by the wizard screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name as written in the config file
    pub name: &'static str,
    /// Active step, focused field border, titles
    pub primary: Color,
    /// Busy indicators
    pub accent: Color,
    pub text: Color,
    /// Labels, hints, pending steps
    pub text_dim: Color,
    pub border: Color,
    /// Highlighted row in the KPI list
    pub selected_bg: Color,
    /// Completed steps and confirmations
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Works on both light and dark terminals.
    pub fn default_theme() -> Self {
        Self {
            name: "default",
            primary: Color::Rgb(99, 102, 241),
            accent: Color::Rgb(251, 146, 60),
            text: Color::Reset,
            text_dim: Color::Rgb(156, 163, 175),
            border: Color::Rgb(75, 85, 99),
            selected_bg: Color::Rgb(55, 65, 81),
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(234, 179, 8),
            error: Color::Rgb(239, 68, 68),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            primary: Color::Rgb(136, 192, 208),
            accent: Color::Rgb(208, 135, 112),
            text: Color::Rgb(236, 239, 244),
            text_dim: Color::Rgb(129, 161, 193),
            border: Color::Rgb(67, 76, 94),
            selected_bg: Color::Rgb(59, 66, 82),
            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
            error: Color::Rgb(191, 97, 106),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            primary: Color::Rgb(30, 102, 245),
            accent: Color::Rgb(254, 100, 11),
            text: Color::Rgb(76, 79, 105),
            text_dim: Color::Rgb(140, 143, 161),
            border: Color::Rgb(188, 192, 204),
            selected_bg: Color::Rgb(220, 224, 232),
            success: Color::Rgb(64, 160, 43),
            warning: Color::Rgb(223, 142, 29),
            error: Color::Rgb(210, 15, 57),
        }
    }

    /// Plain ANSI colors for accessibility.
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast",
            primary: Color::Cyan,
            accent: Color::Yellow,
            text: Color::White,
            text_dim: Color::Gray,
            border: Color::White,
            selected_bg: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }

    /// Look a theme up by its config name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_theme()),
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "high-contrast" | "high_contrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "dark", "light", "high-contrast"]
    }
}
