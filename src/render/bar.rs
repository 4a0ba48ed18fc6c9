use std::fmt;

/// Narrowest and widest bar interiors a caller can get, whatever it asks
/// for.
pub const MIN_BAR_WIDTH: usize = 6;
pub const MAX_BAR_WIDTH: usize = 60;

/// Color band for a usage percentage. Thresholds are shared by bars and
/// sparklines so a value reads the same everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Warning,
    Critical,
}

impl Band {
    pub fn for_percent(percent: f64) -> Self {
        if percent >= 85.0 {
            Band::Critical
        } else if percent >= 65.0 {
            Band::Warning
        } else {
            Band::Low
        }
    }
}

/// A usage bar: `filled` of `width` interior cells plus the one-decimal
/// percent suffix, all in the band color. Pure value; the widget layer
/// maps the band onto the active theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub percent: f64,
    pub width: usize,
    pub filled: usize,
    pub band: Band,
}

pub fn render_bar(percent: f64, width: usize) -> Bar {
    let width = width.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0 * width as f64).round() as usize).min(width);

    Bar {
        percent,
        width,
        filled,
        band: Band::for_percent(percent),
    }
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for _ in 0..self.filled {
            write!(f, "█")?;
        }
        for _ in self.filled..self.width {
            write!(f, " ")?;
        }
        write!(f, "] {:.1}%", self.percent)
    }
}
