use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::action::Action;
use crate::render::{LayoutPlan, choose_layout};
use crate::system::history::Histories;
use crate::system::rates::{NetRates, compute_rates};
use crate::system::snapshot::{ProcessInfo, Snapshot};
use crate::ui::theme::Theme;

/// How long a transient status message stays in the footer.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Process-table ordering. Cycles in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    ByCpu,
    ByMemory,
    ByTime,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::ByCpu => SortMode::ByMemory,
            SortMode::ByMemory => SortMode::ByTime,
            SortMode::ByTime => SortMode::ByCpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::ByCpu => "CPU",
            SortMode::ByMemory => "Memory",
            SortMode::ByTime => "Time",
        }
    }
}

/// All dashboard state, owned by the UI loop and mutated nowhere else.
/// Snapshots arrive through `apply_sample`; everything the widgets draw
/// derives from the fields here.
pub struct App {
    pub running: bool,
    pub snapshot: Snapshot,
    pub rates: NetRates,
    pub histories: Histories,
    pub sort_mode: SortMode,
    pub theme: Theme,
    pub show_help: bool,
    pub table_state: TableState,
    pub status_message: Option<(String, Instant)>,
    pub refresh_interval: Duration,
    cached_layout: Option<(u16, LayoutPlan)>,
}

impl App {
    /// Build from the first successful snapshot. That snapshot seeds the
    /// rate baseline and the histories; rates stay invalid until the
    /// second one lands.
    pub fn new(first: Snapshot, theme: Theme, refresh_interval: Duration) -> Self {
        let rates = NetRates::default();
        let mut histories = Histories::default();
        histories.record(&first, &rates);

        let mut table_state = TableState::default();
        table_state.select(Some(0));

        App {
            running: true,
            snapshot: first,
            rates,
            histories,
            sort_mode: SortMode::default(),
            theme,
            show_help: false,
            table_state,
            status_message: None,
            refresh_interval,
            cached_layout: None,
        }
    }

    /// Apply one sampler result. On success the previous snapshot becomes
    /// the rate baseline and is then discarded; on failure all state is
    /// left untouched apart from a transient status message, and the next
    /// tick is the retry.
    pub fn apply_sample(&mut self, result: Result<Snapshot, String>) {
        match result {
            Ok(snapshot) => {
                let rates = compute_rates(Some(&self.snapshot), &snapshot);
                self.histories.record(&snapshot, &rates);
                if rates.valid {
                    self.rates = rates;
                }
                self.snapshot = snapshot;
            }
            Err(message) => {
                self.set_status(format!("refresh failed: {message}"));
            }
        }
        self.expire_status();
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    fn expire_status(&mut self) {
        if let Some((_, created)) = &self.status_message
            && created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    /// Translate a key press. When the help overlay is open, any key
    /// except Ctrl+C just closes it.
    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        if self.show_help {
            return Action::ToggleHelp;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('s') => Action::CycleSort,
            KeyCode::Char('t') => Action::ToggleTheme,
            KeyCode::Char('?') | KeyCode::F(1) => Action::ToggleHelp,
            KeyCode::Down | KeyCode::Char('j') => Action::Scroll(1),
            KeyCode::Up | KeyCode::Char('k') => Action::Scroll(-1),
            KeyCode::PageDown => Action::Scroll(10),
            KeyCode::PageUp => Action::Scroll(-10),
            KeyCode::Home => Action::SelectFirst,
            KeyCode::End => Action::SelectLast,
            _ => Action::None,
        }
    }

    /// User transitions never touch the collector; they re-render from
    /// the snapshot already applied.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::CycleSort => {
                self.sort_mode = self.sort_mode.next();
                self.table_state.select(Some(0));
            }
            Action::ToggleTheme => self.theme = self.theme.toggled(),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Scroll(delta) => self.scroll(delta),
            Action::SelectFirst => self.select_clamped(0),
            Action::SelectLast => self.select_clamped(usize::MAX),
            Action::None => {}
        }
    }

    pub fn on_resize(&mut self) {
        self.cached_layout = None;
    }

    /// Layout plan for the current terminal size, recomputed only when
    /// the width differs from the cached one.
    pub fn layout(&mut self, width: u16, height: u16) -> LayoutPlan {
        if let Some((cached_width, plan)) = &self.cached_layout
            && *cached_width == width
        {
            return plan.clone();
        }
        let plan = choose_layout(width, height, self.snapshot.cpu_per_core.len());
        self.cached_layout = Some((width, plan.clone()));
        plan
    }

    /// Processes ordered by the active sort mode. Stable sort, so equal
    /// keys keep the collector's CPU ordering.
    pub fn sorted_processes(&self) -> Vec<ProcessInfo> {
        let mut procs = self.snapshot.processes.clone();
        match self.sort_mode {
            SortMode::ByCpu => procs.sort_by(|a, b| {
                b.cpu_percent
                    .partial_cmp(&a.cpu_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            SortMode::ByMemory => procs.sort_by(|a, b| {
                b.mem_percent
                    .partial_cmp(&a.mem_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            SortMode::ByTime => procs.sort_by_key(|p| p.started_at_secs),
        }
        procs
    }

    fn scroll(&mut self, delta: i32) {
        let len = self.snapshot.processes.len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if delta >= 0 {
            current.saturating_add(delta as usize).min(len - 1)
        } else {
            current.saturating_sub(delta.unsigned_abs() as usize)
        };
        self.table_state.select(Some(next));
    }

    fn select_clamped(&mut self, index: usize) {
        let len = self.snapshot.processes.len();
        if len == 0 {
            return;
        }
        self.table_state.select(Some(index.min(len - 1)));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::system::snapshot::{MemoryStats, NetCounters, ProcessInfo};

    fn make_snapshot(taken_at: Instant, sent: u64, received: u64) -> Snapshot {
        Snapshot {
            taken_at,
            taken_at_epoch: 1_700_000_000,
            hostname: "testhost".into(),
            uptime_secs: 3600,
            load: Default::default(),
            cpu_per_core: vec![10.0, 20.0, 30.0, 40.0],
            cpu_total: 25.0,
            memory: MemoryStats {
                total: 1000,
                used: 400,
                available: 600,
                cached: 0,
                buffers: 0,
                used_percent: 40.0,
            },
            swap: Default::default(),
            disk: Default::default(),
            net: NetCounters { sent, received },
            procs: Default::default(),
            processes: vec![
                ProcessInfo {
                    pid: 1,
                    name: "old_hog".into(),
                    cpu_percent: 90.0,
                    mem_percent: 5.0,
                    started_at_secs: 100,
                    ..Default::default()
                },
                ProcessInfo {
                    pid: 2,
                    name: "young_fat".into(),
                    cpu_percent: 10.0,
                    mem_percent: 50.0,
                    started_at_secs: 900,
                    ..Default::default()
                },
                ProcessInfo {
                    pid: 3,
                    name: "middle".into(),
                    cpu_percent: 40.0,
                    mem_percent: 20.0,
                    started_at_secs: 500,
                    ..Default::default()
                },
            ],
            gpus: Vec::new(),
            gpu_processes: Default::default(),
        }
    }

    fn make_app() -> App {
        App::new(
            make_snapshot(Instant::now(), 1000, 1000),
            Theme::dark(),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn sort_mode_cycles_back_after_three_steps() {
        let mode = SortMode::ByCpu;
        assert_eq!(mode.next(), SortMode::ByMemory);
        assert_eq!(mode.next().next(), SortMode::ByTime);
        assert_eq!(mode.next().next().next(), SortMode::ByCpu);
    }

    #[test]
    fn sorted_processes_follow_mode() {
        let mut app = make_app();

        let by_cpu: Vec<u32> = app.sorted_processes().iter().map(|p| p.pid).collect();
        assert_eq!(by_cpu, vec![1, 3, 2]);

        app.dispatch(Action::CycleSort);
        let by_mem: Vec<u32> = app.sorted_processes().iter().map(|p| p.pid).collect();
        assert_eq!(by_mem, vec![2, 3, 1]);

        app.dispatch(Action::CycleSort);
        let by_time: Vec<u32> = app.sorted_processes().iter().map(|p| p.pid).collect();
        assert_eq!(by_time, vec![1, 3, 2]);
    }

    #[test]
    fn first_sample_invalid_second_valid() {
        let t0 = Instant::now();
        let mut app = App::new(
            make_snapshot(t0, 1000, 1000),
            Theme::dark(),
            Duration::from_secs(1),
        );
        assert!(!app.rates.valid);

        app.apply_sample(Ok(make_snapshot(
            t0 + Duration::from_secs(5),
            1500,
            2000,
        )));
        assert!(app.rates.valid);
        assert_eq!(app.rates.up, 100.0);
        assert_eq!(app.rates.down, 200.0);
    }

    #[test]
    fn failed_refresh_keeps_previous_state() {
        let mut app = make_app();
        let hostname = app.snapshot.hostname.clone();
        let cpu_len = app.histories.cpu.len();

        app.apply_sample(Err("provider exploded".into()));

        assert_eq!(app.snapshot.hostname, hostname);
        assert_eq!(app.histories.cpu.len(), cpu_len);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("provider exploded"));
        assert!(app.running);
    }

    #[test]
    fn successful_sample_advances_histories() {
        let t0 = Instant::now();
        let mut app = App::new(
            make_snapshot(t0, 1000, 1000),
            Theme::dark(),
            Duration::from_secs(1),
        );
        assert_eq!(app.histories.cpu.len(), 1);
        assert!(app.histories.net_up.is_empty());

        app.apply_sample(Ok(make_snapshot(t0 + Duration::from_secs(1), 2000, 2000)));
        assert_eq!(app.histories.cpu.len(), 2);
        assert_eq!(app.histories.net_up.len(), 1);
    }

    #[test]
    fn theme_toggle_twice_is_identity() {
        let mut app = make_app();
        let original = app.theme;
        app.dispatch(Action::ToggleTheme);
        assert_ne!(app.theme, original);
        app.dispatch(Action::ToggleTheme);
        assert_eq!(app.theme, original);
    }

    #[test]
    fn layout_is_cached_per_width() {
        let mut app = make_app();
        let a = app.layout(120, 40);
        let b = app.layout(120, 40);
        assert_eq!(a, b);

        let narrower = app.layout(58, 40);
        assert_eq!(narrower.cores_per_row, 1);

        app.on_resize();
        let recomputed = app.layout(120, 40);
        assert_eq!(recomputed.cores_per_row, 4);
    }

    #[test]
    fn default_keys_map_to_expected_actions() {
        let app = make_app();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.map_key(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(app.map_key(key(KeyCode::Char('s'))), Action::CycleSort);
        assert_eq!(app.map_key(key(KeyCode::Char('t'))), Action::ToggleTheme);
        assert_eq!(app.map_key(key(KeyCode::Char('?'))), Action::ToggleHelp);
        assert_eq!(app.map_key(key(KeyCode::Down)), Action::Scroll(1));
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(app.map_key(key(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        let mut app = make_app();
        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help);

        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(ctrl_c), Action::Quit);
    }

    #[test]
    fn scroll_clamps_to_table_bounds() {
        let mut app = make_app();
        app.dispatch(Action::Scroll(100));
        assert_eq!(app.table_state.selected(), Some(2));
        app.dispatch(Action::Scroll(-100));
        assert_eq!(app.table_state.selected(), Some(0));
        app.dispatch(Action::SelectLast);
        assert_eq!(app.table_state.selected(), Some(2));
        app.dispatch(Action::SelectFirst);
        assert_eq!(app.table_state.selected(), Some(0));
    }
}
