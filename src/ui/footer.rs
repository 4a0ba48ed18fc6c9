use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::format::format_rate;

/// Key hints on top, a status line below. A transient message (e.g. a
/// failed refresh) replaces the status line until it expires.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let hints = Line::from(vec![
        key_span("q", theme.accent),
        desc_span(" Quit  ", theme.foreground),
        key_span("s", theme.accent),
        desc_span(" Sort  ", theme.foreground),
        key_span("t", theme.accent),
        desc_span(" Theme  ", theme.foreground),
        key_span("?", theme.accent),
        desc_span(" Help  ", theme.foreground),
        key_span("↑↓", theme.accent),
        desc_span(" Scroll", theme.foreground),
    ]);

    let status = match &app.status_message {
        Some((message, _)) => Line::from(Span::styled(
            message.clone(),
            Style::default()
                .fg(theme.critical)
                .add_modifier(Modifier::BOLD),
        )),
        None => {
            let mut parts = vec![
                format!("Refresh {}ms", app.refresh_interval.as_millis()),
                format!("Theme {}", app.theme.name),
                format!("Sort {}", app.sort_mode.label()),
                format!("Tasks {}", app.snapshot.procs.total),
                format!("Mem {:.1}%", app.snapshot.memory.used_percent),
            ];
            if app.rates.valid {
                parts.push(format!(
                    "Net ↑ {} ↓ {}",
                    format_rate(app.rates.up),
                    format_rate(app.rates.down)
                ));
            }
            Line::from(Span::styled(
                parts.join("  ·  "),
                Style::default().fg(theme.muted),
            ))
        }
    };

    frame.render_widget(Paragraph::new(vec![hints, status]), area);
}

fn key_span(key: &'static str, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn desc_span(desc: &'static str, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(desc, Style::default().fg(color))
}
