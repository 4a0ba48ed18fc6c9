use super::bar::{MAX_BAR_WIDTH, MIN_BAR_WIDTH};

/// Ordered `(min_width, cores_per_row)` breakpoints, widest first; the
/// first row that matches wins.
const CORE_BREAKPOINTS: [(u16, usize); 3] = [(120, 4), (90, 3), (60, 2)];

/// Columns beyond the bar itself in a per-core cell: "C07 " label plus
/// brackets and the percent suffix.
const CORE_LABEL_OVERHEAD: usize = 10;
/// Fixed parts of one rendered core cell around the bar interior:
/// 4 (label) + 2 (brackets) + 7 (" 100.0%").
const CORE_CELL_CHROME: usize = 13;
const CORE_CELL_GAP: usize = 2;

const COMMAND_MIN_WIDTH: usize = 16;
const COMMAND_MAX_WIDTH: usize = 48;
/// Budget per fixed process-table column when sizing the command field.
const COLUMN_BUDGET: usize = 10;

/// Process-table columns in display order. The optional ones appear as
/// the terminal widens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessColumn {
    Pid,
    User,
    Cpu,
    Mem,
    State,
    Threads,
    Gpu,
    Priority,
    Nice,
    Virt,
    Res,
    Time,
    Command,
}

impl ProcessColumn {
    pub fn header(self) -> &'static str {
        match self {
            ProcessColumn::Pid => "PID",
            ProcessColumn::User => "USER",
            ProcessColumn::Cpu => "CPU%",
            ProcessColumn::Mem => "MEM%",
            ProcessColumn::State => "S",
            ProcessColumn::Threads => "THR",
            ProcessColumn::Gpu => "GPU",
            ProcessColumn::Priority => "PRI",
            ProcessColumn::Nice => "NI",
            ProcessColumn::Virt => "VIRT",
            ProcessColumn::Res => "RES",
            ProcessColumn::Time => "TIME",
            ProcessColumn::Command => "COMMAND",
        }
    }

    pub fn width(self) -> u16 {
        match self {
            ProcessColumn::Pid => 7,
            ProcessColumn::User => 10,
            ProcessColumn::Cpu => 6,
            ProcessColumn::Mem => 6,
            ProcessColumn::State => 2,
            ProcessColumn::Threads => 4,
            ProcessColumn::Gpu => 10,
            ProcessColumn::Priority => 4,
            ProcessColumn::Nice => 3,
            ProcessColumn::Virt => 9,
            ProcessColumn::Res => 9,
            ProcessColumn::Time => 9,
            ProcessColumn::Command => 0,
        }
    }
}

/// Width-driven layout decisions for one frame. Pure function of the
/// inputs; the app caches the plan per terminal width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub cores_per_row: usize,
    pub core_bar_width: usize,
    pub process_columns: Vec<ProcessColumn>,
    pub command_width: usize,
}

pub fn choose_layout(width: u16, _height: u16, core_count: usize) -> LayoutPlan {
    let cores_per_row = cores_per_row(width, core_count);
    let core_bar_width = core_bar_width(width, cores_per_row);
    let process_columns = process_columns(width);
    let command_width = command_width(width, &process_columns);

    LayoutPlan {
        cores_per_row,
        core_bar_width,
        process_columns,
        command_width,
    }
}

fn cores_per_row(width: u16, core_count: usize) -> usize {
    if core_count == 0 {
        return 1;
    }
    let columns = CORE_BREAKPOINTS
        .iter()
        .find(|(min_width, _)| width >= *min_width)
        .map(|(_, columns)| *columns)
        .unwrap_or(1);
    columns.min(core_count).max(1)
}

fn core_bar_width(width: u16, cores_per_row: usize) -> usize {
    let per_cell = (width as usize / cores_per_row).saturating_sub(CORE_LABEL_OVERHEAD);
    let mut bar = per_cell.clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);

    // The bar is the flexible field of a core row: shave one cell at a
    // time until the full row fits, but never below the floor.
    while bar > MIN_BAR_WIDTH && core_row_width(cores_per_row, bar) > width as usize {
        bar -= 1;
    }
    bar
}

fn core_row_width(cores_per_row: usize, bar_width: usize) -> usize {
    cores_per_row * (bar_width + CORE_CELL_CHROME) + (cores_per_row - 1) * CORE_CELL_GAP
}

fn process_columns(width: u16) -> Vec<ProcessColumn> {
    let mut columns = vec![
        ProcessColumn::Pid,
        ProcessColumn::User,
        ProcessColumn::Cpu,
        ProcessColumn::Mem,
        ProcessColumn::State,
    ];
    if width >= 90 {
        columns.push(ProcessColumn::Threads);
    }
    if width >= 100 {
        columns.push(ProcessColumn::Gpu);
    }
    if width >= 110 {
        columns.push(ProcessColumn::Priority);
    }
    if width >= 120 {
        columns.push(ProcessColumn::Nice);
    }
    if width >= 140 {
        columns.push(ProcessColumn::Virt);
        columns.push(ProcessColumn::Res);
    }
    columns.push(ProcessColumn::Time);
    columns.push(ProcessColumn::Command);
    columns
}

/// The command field absorbs whatever the fixed columns leave over,
/// within its floor and ceiling.
fn command_width(width: u16, columns: &[ProcessColumn]) -> usize {
    let fixed = columns.len().saturating_sub(1) * COLUMN_BUDGET;
    (width as usize)
        .saturating_sub(fixed)
        .clamp(COMMAND_MIN_WIDTH, COMMAND_MAX_WIDTH)
}
