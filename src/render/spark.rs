use std::fmt;

use super::bar::Band;

pub const MIN_SPARK_WIDTH: usize = 4;
pub const MAX_SPARK_WIDTH: usize = 60;

/// Glyph shown for "no signal": an empty series, or a sample that
/// quantizes to nothing. Distinct from the lowest height level so a flat
/// line never masquerades as a tiny one.
pub const PLACEHOLDER: char = '·';

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkCell {
    pub glyph: char,
    /// `None` for placeholder cells, which take the muted color.
    pub band: Option<Band>,
}

/// A rendered sparkline, exactly `width` cells, newest sample rightmost.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    pub cells: Vec<SparkCell>,
}

/// Quantize a series into 8 height levels scaled to its own maximum.
///
/// A longer series is max-pooled into `width` segments so transient
/// spikes survive the downsample; a shorter one is left-padded so the
/// most recent sample stays at the right edge. Coloring uses the shared
/// percent bands, treating each sample as a percent of the series max.
pub fn render_spark(series: &[f64], width: usize) -> Sparkline {
    let width = width.clamp(MIN_SPARK_WIDTH, MAX_SPARK_WIDTH);

    let max = series.iter().copied().fold(0.0_f64, f64::max);
    if series.is_empty() || max <= 0.0 {
        return Sparkline {
            cells: vec![placeholder_cell(); width],
        };
    }

    let mut cells = Vec::with_capacity(width);

    if series.len() > width {
        // One cell per segment, keeping the segment maximum.
        for i in 0..width {
            let start = i * series.len() / width;
            let end = ((i + 1) * series.len() / width).max(start + 1);
            let peak = series[start..end].iter().copied().fold(f64::MIN, f64::max);
            cells.push(sample_cell(peak, max));
        }
    } else {
        for _ in 0..width - series.len() {
            cells.push(placeholder_cell());
        }
        for &value in series {
            cells.push(sample_cell(value, max));
        }
    }

    Sparkline { cells }
}

fn placeholder_cell() -> SparkCell {
    SparkCell {
        glyph: PLACEHOLDER,
        band: None,
    }
}

fn sample_cell(value: f64, max: f64) -> SparkCell {
    if value <= 0.0 {
        return placeholder_cell();
    }
    let fraction = (value / max).clamp(0.0, 1.0);
    let level = ((fraction * LEVELS.len() as f64).ceil() as usize).clamp(1, LEVELS.len());
    SparkCell {
        glyph: LEVELS[level - 1],
        band: Some(Band::for_percent(fraction * 100.0)),
    }
}

impl fmt::Display for Sparkline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.glyph)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder_string(width: usize) -> String {
        PLACEHOLDER.to_string().repeat(width)
    }

    #[test]
    fn empty_series_renders_placeholder_line() {
        assert_eq!(render_spark(&[], 12).to_string(), placeholder_string(12));
    }

    #[test]
    fn all_zero_series_renders_placeholder_line() {
        assert_eq!(
            render_spark(&[0.0, 0.0, 0.0], 12).to_string(),
            placeholder_string(12)
        );
    }

    #[test]
    fn one_positive_sample_never_renders_all_placeholder() {
        let spark = render_spark(&[0.0, 0.0, 4.2], 8);
        assert_ne!(spark.to_string(), placeholder_string(8));
        assert_eq!(spark.cells.last().unwrap().glyph, '█');
    }

    #[test]
    fn short_series_is_left_padded() {
        let spark = render_spark(&[1.0, 2.0], 6);
        assert_eq!(spark.cells.len(), 6);
        assert_eq!(spark.cells[3].glyph, PLACEHOLDER);
        assert_ne!(spark.cells[4].glyph, PLACEHOLDER);
        assert_eq!(spark.cells[5].glyph, '█');
    }

    #[test]
    fn long_series_max_pools_segments() {
        // A single spike inside a segment must survive the downsample.
        let mut series = vec![1.0; 40];
        series[17] = 100.0;
        let spark = render_spark(&series, 4);
        assert_eq!(spark.cells.len(), 4);
        assert_eq!(spark.cells[1].glyph, '█');
        assert_eq!(spark.cells[1].band, Some(Band::Critical));
    }

    #[test]
    fn levels_scale_to_series_max() {
        // Max is 800, so 100 is one eighth: the lowest level, low band.
        let spark = render_spark(&[100.0, 800.0], 4);
        let cells = &spark.cells;
        assert_eq!(cells[2].glyph, LEVELS[0]);
        assert_eq!(cells[2].band, Some(Band::Low));
        assert_eq!(cells[3].glyph, LEVELS[7]);
        assert_eq!(cells[3].band, Some(Band::Critical));
    }

    #[test]
    fn width_is_clamped() {
        assert_eq!(render_spark(&[], 1).cells.len(), MIN_SPARK_WIDTH);
        assert_eq!(render_spark(&[], 500).cells.len(), MAX_SPARK_WIDTH);
    }

    #[test]
    fn negative_samples_render_placeholder_cells() {
        let spark = render_spark(&[-5.0, 10.0], 4);
        assert_eq!(spark.cells[2].glyph, PLACEHOLDER);
        assert_eq!(spark.cells[2].band, None);
    }
}
