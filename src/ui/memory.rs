use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::format::format_bytes;
use crate::render::render_bar;
use crate::render::render_spark;
use crate::system::history::History;
use crate::ui::theme::Theme;
use crate::ui::{bar_spans, spark_spans};

/// Memory details on the left, swap and the primary disk on the right.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_memory(frame, halves[0], app);
    render_swap_disk(frame, halves[1], app);
}

fn render_memory(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mem = &app.snapshot.memory;

    let block = titled_block(" Memory ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if mem.total == 0 {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "memory metrics unavailable",
                Style::default().fg(theme.warning),
            )),
            inner,
        );
        return;
    }

    let bar_width = (inner.width as usize).saturating_sub(34).clamp(10, 60);
    let mut lines = vec![Line::from(Span::styled(
        format!("Total      {}", format_bytes(mem.total)),
        Style::default().fg(theme.foreground),
    ))];

    let mut used = vec![Span::styled(
        "Used       ",
        Style::default().fg(theme.foreground),
    )];
    used.extend(bar_spans(&render_bar(mem.used_percent, bar_width), theme));
    used.push(Span::styled(
        format!("  {}", format_bytes(mem.used)),
        Style::default().fg(theme.foreground),
    ));
    let spark_width = (inner.width as usize)
        .saturating_sub(bar_width + 34)
        .clamp(8, 40);
    if spark_width >= 8 {
        used.push(Span::raw("  "));
        used.extend(spark_spans(
            &render_spark(&app.histories.memory.to_vec(), spark_width),
            theme,
        ));
    }
    lines.push(Line::from(used));

    lines.push(Line::from(Span::styled(
        format!(
            "Available  {} ({:.0}%)",
            format_bytes(mem.available),
            percent(mem.available, mem.total)
        ),
        Style::default().fg(theme.foreground),
    )));

    if mem.cached > 0 {
        lines.push(Line::from(Span::styled(
            format!(
                "Cached     {} ({:.0}%)",
                format_bytes(mem.cached),
                percent(mem.cached, mem.total)
            ),
            Style::default().fg(theme.muted),
        )));
    }
    if mem.buffers > 0 {
        lines.push(Line::from(Span::styled(
            format!(
                "Buffers    {} ({:.0}%)",
                format_bytes(mem.buffers),
                percent(mem.buffers, mem.total)
            ),
            Style::default().fg(theme.muted),
        )));
    }

    let procs = &app.snapshot.procs;
    lines.push(Line::from(Span::styled(
        format!(
            "Tasks {}  Threads {}  Running {}",
            procs.total, procs.threads, procs.running
        ),
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_swap_disk(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let snap = &app.snapshot;

    let block = titled_block(" Swap / Disk ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bar_width = (inner.width as usize).saturating_sub(30).clamp(10, 60);
    let mut lines = Vec::new();

    if snap.swap.total > 0 {
        lines.push(usage_line(
            "Swap",
            snap.swap.used_percent,
            snap.swap.used,
            snap.swap.total,
            bar_width,
            &app.histories.swap,
            inner.width,
            theme,
        ));
    } else {
        lines.push(Line::from(Span::styled(
            "Swap  none configured",
            Style::default().fg(theme.muted),
        )));
    }

    if snap.disk.total > 0 {
        let mut line = usage_line(
            "Disk",
            snap.disk.used_percent(),
            snap.disk.used,
            snap.disk.total,
            bar_width,
            &app.histories.disk,
            inner.width,
            theme,
        );
        line.push_span(Span::styled(
            format!(" ({})", snap.disk.path),
            Style::default().fg(theme.muted),
        ));
        lines.push(line);
    } else {
        lines.push(Line::from(Span::styled(
            "Disk  unavailable",
            Style::default().fg(theme.muted),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

#[allow(clippy::too_many_arguments)]
fn usage_line(
    label: &str,
    used_percent: f64,
    used: u64,
    total: u64,
    bar_width: usize,
    history: &History,
    inner_width: u16,
    theme: &Theme,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{label:<5} "),
        Style::default().fg(theme.foreground),
    )];
    spans.extend(bar_spans(&render_bar(used_percent, bar_width), theme));
    spans.push(Span::styled(
        format!("  {}/{}", format_bytes(used), format_bytes(total)),
        Style::default().fg(theme.foreground),
    ));

    let spark_width = (inner_width as usize)
        .saturating_sub(bar_width + 36)
        .clamp(8, 40);
    if spark_width >= 8 && !history.is_empty() {
        spans.push(Span::raw("  "));
        spans.extend(spark_spans(&render_spark(&history.to_vec(), spark_width), theme));
    }
    Line::from(spans)
}

fn titled_block(title: &'static str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(title, Style::default().fg(theme.accent)))
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
