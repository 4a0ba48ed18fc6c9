use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::render::{LayoutPlan, render_bar, render_spark};
use crate::ui::{bar_spans, spark_spans};

/// Aggregate usage with its trend, then one bar per core laid out in the
/// column count the layout plan picked for this width.
pub fn render(frame: &mut Frame, area: Rect, app: &App, plan: &LayoutPlan) {
    let theme = &app.theme;
    let snap = &app.snapshot;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" CPU ", Style::default().fg(theme.accent)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if snap.cpu_per_core.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "CPU metrics unavailable",
                Style::default().fg(theme.warning),
            )),
            inner,
        );
        return;
    }

    let mut lines = Vec::new();

    let total_bar_width = (inner.width as usize).saturating_sub(30).clamp(12, 60);
    let total_bar = render_bar(snap.cpu_total as f64, total_bar_width);
    let mut total_spans = vec![Span::styled(
        "Total ",
        Style::default().fg(theme.foreground),
    )];
    total_spans.extend(bar_spans(&total_bar, theme));

    let spark_width = (inner.width as usize)
        .saturating_sub(total_bar_width + 16)
        .clamp(8, 40);
    if spark_width >= 8 {
        total_spans.push(Span::raw("  "));
        total_spans.extend(spark_spans(
            &render_spark(&app.histories.cpu.to_vec(), spark_width),
            theme,
        ));
    }
    lines.push(Line::from(total_spans));

    for (row_index, row) in snap.cpu_per_core.chunks(plan.cores_per_row).enumerate() {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (offset, &usage) in row.iter().enumerate() {
            let core = row_index * plan.cores_per_row + offset;
            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                format!("C{:02} ", core + 1),
                Style::default().fg(theme.accent),
            ));
            spans.extend(bar_spans(&render_bar(usage as f64, plan.core_bar_width), theme));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
