pub mod cpu;
pub mod footer;
pub mod gpu;
pub mod header;
pub mod help;
pub mod memory;
pub mod process_table;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;

use crate::app::App;
use crate::render::{Bar, Sparkline};
use crate::ui::theme::Theme;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let plan = app.layout(area.width, area.height);

    let core_count = app.snapshot.cpu_per_core.len();
    let core_rows = core_count.div_ceil(plan.cores_per_row.max(1));
    let cpu_height = (core_rows as u16).saturating_add(3);
    let gpu_height = gpu::panel_height(&app.snapshot);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(cpu_height),
            Constraint::Length(7),
            Constraint::Length(gpu_height),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .split(area);

    header::render(frame, chunks[0], app);
    cpu::render(frame, chunks[1], app, &plan);
    memory::render(frame, chunks[2], app);
    gpu::render(frame, chunks[3], app);
    process_table::render(frame, chunks[4], app, &plan);
    footer::render(frame, chunks[5], app);

    // Overlay last so it sits on top of everything.
    if app.show_help {
        help::render(frame, area, &app.theme);
    }
}

/// Styled spans for a usage bar: band-colored fill, muted empties, and
/// the percent suffix in the band color.
pub(crate) fn bar_spans(bar: &Bar, theme: &Theme) -> Vec<Span<'static>> {
    vec![
        Span::styled("[", Style::default().fg(theme.muted)),
        Span::styled(
            "█".repeat(bar.filled),
            Style::default().fg(theme.band_color(bar.band)),
        ),
        Span::styled(
            " ".repeat(bar.width - bar.filled),
            Style::default().fg(theme.muted),
        ),
        Span::styled("]", Style::default().fg(theme.muted)),
        Span::styled(
            format!(" {:.1}%", bar.percent),
            Style::default().fg(theme.band_color(bar.band)),
        ),
    ]
}

/// Styled spans for a sparkline, merging runs of equally-colored cells.
pub(crate) fn spark_spans(spark: &Sparkline, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_band = None;

    for cell in &spark.cells {
        if cell.band != run_band && !run.is_empty() {
            spans.push(span_for_run(std::mem::take(&mut run), run_band, theme));
        }
        run_band = cell.band;
        run.push(cell.glyph);
    }
    if !run.is_empty() {
        spans.push(span_for_run(run, run_band, theme));
    }
    spans
}

fn span_for_run(
    run: String,
    band: Option<crate::render::Band>,
    theme: &Theme,
) -> Span<'static> {
    let color = band.map(|b| theme.band_color(b)).unwrap_or(theme.muted);
    Span::styled(run, Style::default().fg(color))
}
