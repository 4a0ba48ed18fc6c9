use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::format::{format_rate, format_uptime};
use crate::render::render_spark;
use crate::ui::spark_spans;

/// Two-line summary strip: identity and task counts on top, network
/// throughput with its trends below.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let snap = &app.snapshot;

    let mut top = vec![
        Span::styled(
            snap.hostname.clone(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  up {}", format_uptime(snap.uptime_secs)),
            Style::default().fg(theme.foreground),
        ),
        Span::styled(
            format!("  tasks {}/{}", snap.procs.running, snap.procs.total),
            Style::default().fg(theme.foreground),
        ),
    ];
    if snap.load.reported {
        top.push(Span::styled(
            format!(
                "  load {:.2} {:.2} {:.2}",
                snap.load.one, snap.load.five, snap.load.fifteen
            ),
            Style::default().fg(theme.foreground),
        ));
    } else {
        top.push(Span::styled(
            "  load n/a",
            Style::default().fg(theme.muted),
        ));
    }

    let bottom = if app.rates.valid {
        let spark_width = (area.width as usize / 4).clamp(8, 32);
        let up_spark = render_spark(&app.histories.net_up.to_vec(), spark_width);
        let down_spark = render_spark(&app.histories.net_down.to_vec(), spark_width);

        let mut spans = vec![
            Span::styled("net ", Style::default().fg(theme.muted)),
            Span::styled("↑ ", Style::default().fg(theme.accent)),
            Span::styled(
                format!("{:>10} ", format_rate(app.rates.up)),
                Style::default().fg(theme.foreground),
            ),
        ];
        spans.extend(spark_spans(&up_spark, theme));
        spans.push(Span::styled("  ↓ ", Style::default().fg(theme.accent)));
        spans.push(Span::styled(
            format!("{:>10} ", format_rate(app.rates.down)),
            Style::default().fg(theme.foreground),
        ));
        spans.extend(spark_spans(&down_spark, theme));
        Line::from(spans)
    } else {
        Line::from(Span::styled(
            "net collecting baseline…",
            Style::default().fg(theme.muted),
        ))
    };

    frame.render_widget(Paragraph::new(vec![Line::from(top), bottom]), area);
}
