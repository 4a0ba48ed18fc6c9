use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::format::{format_bytes, truncate_unicode};
use crate::render::render_bar;
use crate::render::render_spark;
use crate::system::snapshot::{GpuDevice, Snapshot};
use crate::ui::theme::Theme;
use crate::ui::{bar_spans, spark_spans};

const DEVICE_BAR_WIDTH: usize = 15;

/// Rows the GPU panel needs for this snapshot, borders included.
pub fn panel_height(snapshot: &Snapshot) -> u16 {
    if snapshot.gpus.is_empty() {
        return 3;
    }
    let content: usize = snapshot
        .gpus
        .iter()
        .map(|gpu| {
            let procs = snapshot
                .gpu_processes
                .get(&gpu.index)
                .map(|list| list.len() + 1)
                .unwrap_or(0);
            6 + procs
        })
        .sum();
    // Blank separators between devices, plus the borders.
    (content + snapshot.gpus.len().saturating_sub(1) + 2) as u16
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let snap = &app.snapshot;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" GPU ", Style::default().fg(theme.accent)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if snap.gpus.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "no discrete GPU detected",
                Style::default().fg(theme.muted),
            )),
            inner,
        );
        return;
    }

    let mut lines = Vec::new();
    for (i, gpu) in snap.gpus.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        device_lines(&mut lines, gpu, snap, app, inner.width, theme);
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn device_lines(
    lines: &mut Vec<Line<'static>>,
    gpu: &GpuDevice,
    snap: &Snapshot,
    app: &App,
    width: u16,
    theme: &Theme,
) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("[{}] ", gpu.index),
            Style::default().fg(theme.accent),
        ),
        Span::styled(gpu.name.clone(), Style::default().fg(theme.foreground)),
        Span::styled(
            format!(" (driver {})", gpu.driver),
            Style::default().fg(theme.muted),
        ),
    ]));

    lines.push(Line::from(Span::styled(
        format!("P-State {}   SM {} MHz", gpu.pstate, gpu.sm_clock_mhz),
        Style::default().fg(theme.muted),
    )));

    let mut usage = vec![Span::styled("GPU ", Style::default().fg(theme.foreground))];
    usage.extend(bar_spans(
        &render_bar(gpu.utilization as f64, DEVICE_BAR_WIDTH),
        theme,
    ));
    let spark_width = (width as usize)
        .saturating_sub(2 * (DEVICE_BAR_WIDTH + 14) + 22)
        .clamp(8, 40);
    if let Some(history) = app.histories.gpu(gpu.index)
        && spark_width >= 8
    {
        usage.push(Span::raw("  "));
        usage.extend(spark_spans(&render_spark(&history.to_vec(), spark_width), theme));
    }
    usage.push(Span::styled(
        "   Mem ",
        Style::default().fg(theme.foreground),
    ));
    usage.extend(bar_spans(
        &render_bar(gpu.memory_percent(), DEVICE_BAR_WIDTH),
        theme,
    ));
    usage.push(Span::styled(
        format!(
            " {}/{}",
            format_bytes(gpu.memory_used),
            format_bytes(gpu.memory_total)
        ),
        Style::default().fg(theme.foreground),
    ));
    lines.push(Line::from(usage));

    let mut ctrl = vec![Span::styled(
        "Mem Ctrl ",
        Style::default().fg(theme.foreground),
    )];
    ctrl.extend(bar_spans(
        &render_bar(gpu.mem_utilization as f64, DEVICE_BAR_WIDTH),
        theme,
    ));
    ctrl.push(Span::styled(
        format!(
            "   Temp {}°C   Power {}/{} W   Fan {}%",
            gpu.temperature, gpu.power_usage_w, gpu.power_limit_w, gpu.fan_percent
        ),
        Style::default().fg(theme.foreground),
    ));
    lines.push(Line::from(ctrl));

    lines.push(Line::from(Span::styled(
        format!(
            "Clocks  core {} MHz  memory {} MHz",
            gpu.graphics_clock_mhz, gpu.memory_clock_mhz
        ),
        Style::default().fg(theme.muted),
    )));

    let throttle = active_throttle(&gpu.throttle);
    lines.push(Line::from(vec![
        Span::styled("Throttle ", Style::default().fg(theme.muted)),
        if throttle.is_empty() {
            Span::styled("None", Style::default().fg(theme.ok))
        } else {
            Span::styled(throttle, Style::default().fg(theme.warning))
        },
    ]));

    if let Some(procs) = snap.gpu_processes.get(&gpu.index) {
        let total: u64 = procs.iter().map(|p| p.memory_bytes).sum();
        lines.push(Line::from(Span::styled(
            format!("Processes {} · {}", procs.len(), format_bytes(total)),
            Style::default().fg(theme.accent),
        )));
        for proc in procs {
            lines.push(Line::from(Span::styled(
                format!(
                    "  {:>7}  {:<25}  {:>9}",
                    proc.pid,
                    truncate_unicode(&proc.name, 25),
                    format_bytes(proc.memory_bytes)
                ),
                Style::default().fg(theme.foreground),
            )));
        }
    }
}

/// Reasons worth surfacing; idle and "None" are the quiet steady state.
fn active_throttle(reasons: &[String]) -> String {
    let active: Vec<&str> = reasons
        .iter()
        .map(|r| r.as_str())
        .filter(|r| !r.is_empty() && *r != "None" && *r != "GPU Idle")
        .collect();
    active.join(", ")
}
