use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::app::App;
use crate::format::{format_bytes, format_runtime, truncate_unicode};
use crate::render::{Band, LayoutPlan, ProcessColumn};
use crate::system::snapshot::ProcessInfo;
use crate::ui::theme::Theme;

/// Sortable process table. The column set and the command width come out
/// of the layout plan, so what fits is decided once per terminal width.
pub fn render(frame: &mut Frame, area: Rect, app: &mut App, plan: &LayoutPlan) {
    let theme = app.theme;
    let procs = app.sorted_processes();

    // Which PIDs hold GPU memory, for the optional GPU column.
    let gpu_attach: HashMap<u32, (u32, u64)> = app
        .snapshot
        .gpu_processes
        .iter()
        .flat_map(|(gpu_index, list)| {
            list.iter().map(move |p| (p.pid, (*gpu_index, p.memory_bytes)))
        })
        .collect();

    let header = Row::new(
        plan.process_columns
            .iter()
            .map(|col| {
                Cell::from(col.header()).style(
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                )
            })
            .collect::<Vec<_>>(),
    );

    let epoch = app.snapshot.taken_at_epoch;
    let rows: Vec<Row> = procs
        .iter()
        .map(|proc| {
            Row::new(
                plan.process_columns
                    .iter()
                    .map(|col| cell_for(*col, proc, &gpu_attach, epoch, plan, &theme))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let widths: Vec<Constraint> = plan
        .process_columns
        .iter()
        .map(|col| match col {
            ProcessColumn::Command => Constraint::Min(plan.command_width as u16),
            other => Constraint::Length(other.width()),
        })
        .collect();

    let title = format!(" Processes · sort: {} ", app.sort_mode.label());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(Span::styled(title, Style::default().fg(theme.accent))),
        )
        .row_highlight_style(
            Style::default()
                .bg(theme.border)
                .add_modifier(Modifier::BOLD),
        );

    // The selection survives re-sorts; just keep it inside the table.
    if let Some(selected) = app.table_state.selected()
        && selected >= procs.len()
        && !procs.is_empty()
    {
        app.table_state.select(Some(procs.len() - 1));
    }

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn cell_for(
    column: ProcessColumn,
    proc: &ProcessInfo,
    gpu_attach: &HashMap<u32, (u32, u64)>,
    epoch_now: u64,
    plan: &LayoutPlan,
    theme: &Theme,
) -> Cell<'static> {
    let fg = Style::default().fg(theme.foreground);
    let muted = Style::default().fg(theme.muted);

    match column {
        ProcessColumn::Pid => Cell::from(format!("{:>6}", proc.pid)).style(fg),
        ProcessColumn::User => {
            Cell::from(truncate_unicode(&proc.user, 10)).style(Style::default().fg(theme.accent))
        }
        ProcessColumn::Cpu => Cell::from(format!("{:>5.1}", proc.cpu_percent)).style(
            Style::default().fg(theme.band_color(Band::for_percent(proc.cpu_percent as f64))),
        ),
        ProcessColumn::Mem => Cell::from(format!("{:>5.1}", proc.mem_percent)).style(
            Style::default().fg(theme.band_color(Band::for_percent(proc.mem_percent as f64))),
        ),
        ProcessColumn::State => Cell::from(proc.status.to_string()).style(muted),
        ProcessColumn::Threads => Cell::from(format!("{:>3}", proc.threads)).style(fg),
        ProcessColumn::Gpu => match gpu_attach.get(&proc.pid) {
            Some((index, bytes)) => Cell::from(format!("G{}:{}", index, format_bytes(*bytes)))
                .style(Style::default().fg(theme.accent)),
            None => Cell::from("").style(muted),
        },
        ProcessColumn::Priority => Cell::from(optional_number(proc.priority)).style(muted),
        ProcessColumn::Nice => Cell::from(optional_number(proc.nice)).style(muted),
        ProcessColumn::Virt => Cell::from(format_bytes(proc.virtual_bytes)).style(muted),
        ProcessColumn::Res => Cell::from(format_bytes(proc.resident_bytes)).style(muted),
        ProcessColumn::Time => {
            let runtime = epoch_now.saturating_sub(proc.started_at_secs);
            Cell::from(format!("{:>8}", format_runtime(runtime))).style(muted)
        }
        ProcessColumn::Command => {
            let label = if proc.command.is_empty() {
                &proc.name
            } else {
                &proc.command
            };
            Cell::from(truncate_unicode(label, plan.command_width)).style(fg)
        }
    }
}

/// Explicit placeholder for values the platform never reported.
fn optional_number(value: Option<i32>) -> String {
    match value {
        Some(v) => format!("{v:>3}"),
        None => "  -".to_string(),
    }
}
