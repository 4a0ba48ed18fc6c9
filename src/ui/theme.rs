use ratatui::style::Color;

use crate::render::Band;

/// Named color roles for every widget. Swapping themes only remaps these
/// roles; the numeric content of a frame never changes with the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub ok: Color,
    pub warning: Color,
    pub critical: Color,
    pub border: Color,
    pub muted: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            name: "dark",
            background: Color::Reset,
            foreground: Color::Rgb(205, 214, 244),
            accent: Color::Rgb(125, 211, 252),
            ok: Color::Rgb(166, 227, 161),
            warning: Color::Rgb(249, 226, 175),
            critical: Color::Rgb(243, 139, 168),
            border: Color::Rgb(69, 71, 90),
            muted: Color::Rgb(108, 112, 134),
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            background: Color::Reset,
            foreground: Color::Rgb(40, 44, 52),
            accent: Color::Rgb(0, 102, 153),
            ok: Color::Rgb(0, 120, 0),
            warning: Color::Rgb(176, 121, 6),
            critical: Color::Rgb(186, 36, 54),
            border: Color::Rgb(150, 150, 150),
            muted: Color::Rgb(120, 124, 130),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// The other palette; toggling twice is the identity.
    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Usage-band coloring shared by bars, sparklines, and percent cells.
    pub fn band_color(&self, band: Band) -> Color {
        match band {
            Band::Low => self.ok,
            Band::Warning => self.warning,
            Band::Critical => self.critical,
        }
    }
}
