use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::ui::theme::Theme;

const BINDINGS: [(&str, &str); 9] = [
    ("q / Esc", "Quit"),
    ("s", "Cycle sort (CPU → Memory → Time)"),
    ("t", "Toggle theme"),
    ("? / F1", "Toggle this help"),
    ("↑ / k", "Selection up"),
    ("↓ / j", "Selection down"),
    ("PgUp / PgDn", "Selection by page"),
    ("Home / End", "First / last process"),
    ("Ctrl+C", "Quit (always)"),
];

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup = centered(50, 60, area);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(Span::styled(
            "Key bindings",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    for (key, description) in BINDINGS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {key:<12}"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(description, Style::default().fg(theme.foreground)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "  press any key to close",
        Style::default().fg(theme.muted),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Help ", Style::default().fg(theme.accent)));

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
