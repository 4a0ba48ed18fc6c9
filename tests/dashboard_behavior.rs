//! End-to-end behavior of the dashboard state machine: synthetic
//! snapshots in, rendered frames out through a test backend.

use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use vitals::action::Action;
use vitals::app::App;
use vitals::system::snapshot::{
    DiskStats, GpuDevice, GpuProcess, LoadAvg, MemoryStats, NetCounters, ProcessInfo,
    ProcessSummary, Snapshot,
};
use vitals::ui;
use vitals::ui::theme::Theme;

fn make_process(pid: u32, name: &str, cpu: f32, mem: f32, started: u64) -> ProcessInfo {
    ProcessInfo {
        pid,
        ppid: 1,
        name: name.to_string(),
        user: "tester".to_string(),
        cpu_percent: cpu,
        mem_percent: mem,
        virtual_bytes: 512 * 1024 * 1024,
        resident_bytes: 128 * 1024 * 1024,
        shared_bytes: 0,
        threads: 4,
        status: 'S',
        started_at_secs: started,
        command: format!("{name} --daemon"),
        priority: None,
        nice: None,
    }
}

fn make_snapshot(taken_at: Instant, sent: u64, received: u64) -> Snapshot {
    Snapshot {
        taken_at,
        taken_at_epoch: 1_700_000_000,
        hostname: "boxen".to_string(),
        uptime_secs: 93_784,
        load: LoadAvg {
            one: 0.42,
            five: 0.37,
            fifteen: 0.31,
            reported: true,
        },
        cpu_per_core: vec![12.0, 48.0, 71.0, 93.0],
        cpu_total: 56.0,
        memory: MemoryStats {
            total: 16 * 1024 * 1024 * 1024,
            used: 6 * 1024 * 1024 * 1024,
            available: 10 * 1024 * 1024 * 1024,
            cached: 0,
            buffers: 0,
            used_percent: 37.5,
        },
        swap: MemoryStats::default(),
        disk: DiskStats {
            path: "/".to_string(),
            used: 90 * 1024 * 1024 * 1024,
            total: 200 * 1024 * 1024 * 1024,
        },
        net: NetCounters { sent, received },
        procs: ProcessSummary {
            total: 3,
            running: 1,
            threads: 12,
        },
        processes: vec![
            make_process(101, "miner", 88.0, 4.0, 1_699_990_000),
            make_process(102, "browser", 22.0, 31.0, 1_699_999_000),
            make_process(103, "editor", 5.0, 9.0, 1_699_950_000),
        ],
        gpus: Vec::new(),
        gpu_processes: Default::default(),
    }
}

fn make_app() -> App {
    App::new(
        make_snapshot(Instant::now(), 10_000, 10_000),
        Theme::dark(),
        Duration::from_secs(1),
    )
}

fn draw_buffer(app: &mut App, width: u16, height: u16) -> ratatui::buffer::Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::draw(frame, app)).unwrap();
    terminal.backend().buffer().clone()
}

fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf.cell((x, y)).unwrap().symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn draws_without_panic_across_widths() {
    for (width, height) in [(40, 20), (60, 30), (80, 40), (100, 45), (140, 50), (200, 60)] {
        let mut app = make_app();
        let buf = draw_buffer(&mut app, width, height);
        assert_eq!(buf.area.width, width);
    }
}

#[test]
fn frame_contains_the_expected_sections() {
    let mut app = make_app();
    let text = buffer_text(&draw_buffer(&mut app, 100, 45));

    assert!(text.contains("boxen"));
    assert!(text.contains("load 0.42"));
    assert!(text.contains(" CPU "));
    assert!(text.contains(" Memory "));
    assert!(text.contains("Swap  none configured"));
    assert!(text.contains("no discrete GPU detected"));
    assert!(text.contains("Processes"));
    assert!(text.contains("miner"));
}

#[test]
fn theme_toggle_twice_restores_the_frame() {
    let mut app = make_app();
    let before = draw_buffer(&mut app, 100, 45);

    app.dispatch(Action::ToggleTheme);
    let toggled = draw_buffer(&mut app, 100, 45);
    assert_ne!(before, toggled);

    app.dispatch(Action::ToggleTheme);
    let restored = draw_buffer(&mut app, 100, 45);
    assert_eq!(before, restored);
}

#[test]
fn theme_toggle_changes_colors_not_text() {
    let mut app = make_app();
    let before = buffer_text(&draw_buffer(&mut app, 100, 45));

    app.dispatch(Action::ToggleTheme);
    let after = buffer_text(&draw_buffer(&mut app, 100, 45));

    // Only the footer's palette name may differ textually.
    let differing: Vec<(&str, &str)> = before
        .lines()
        .zip(after.lines())
        .filter(|(a, b)| a != b)
        .collect();
    assert!(differing.len() <= 1);
    for (line, _) in &differing {
        assert!(line.contains("Theme"));
    }
}

#[test]
fn sort_cycle_three_times_restores_the_frame() {
    let mut app = make_app();
    let before = draw_buffer(&mut app, 100, 45);

    app.dispatch(Action::CycleSort);
    app.dispatch(Action::CycleSort);
    app.dispatch(Action::CycleSort);

    let after = draw_buffer(&mut app, 100, 45);
    assert_eq!(before, after);
}

#[test]
fn sort_cycle_reorders_only_the_table() {
    let mut app = make_app();
    let by_cpu = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(by_cpu.contains("sort: CPU"));

    app.dispatch(Action::CycleSort);
    let by_mem = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(by_mem.contains("sort: Memory"));

    let first_data_row = |text: &str| {
        text.lines()
            .find(|l| l.contains("tester"))
            .unwrap()
            .to_string()
    };
    assert!(first_data_row(&by_cpu).contains("miner"));
    assert!(first_data_row(&by_mem).contains("browser"));
}

#[test]
fn failed_refresh_keeps_the_data_and_reports_it() {
    let mut app = make_app();
    app.apply_sample(Err("nvml timed out".to_string()));

    let text = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(text.contains("refresh failed: nvml timed out"));
    assert!(text.contains("miner"));
    assert!(app.running);
}

#[test]
fn successive_samples_drive_rates_into_the_frame() {
    let t0 = Instant::now();
    let mut app = App::new(
        make_snapshot(t0, 10_000, 10_000),
        Theme::dark(),
        Duration::from_secs(1),
    );

    let text = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(text.contains("collecting baseline"));

    app.apply_sample(Ok(make_snapshot(
        t0 + Duration::from_secs(2),
        10_000 + 4096,
        10_000 + 8192,
    )));
    let text = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(text.contains("2 KB/s"));
    assert!(text.contains("4 KB/s"));
}

#[test]
fn unreported_load_renders_placeholder() {
    let mut snapshot = make_snapshot(Instant::now(), 0, 0);
    snapshot.load.reported = false;
    let mut app = App::new(snapshot, Theme::dark(), Duration::from_secs(1));

    let text = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(text.contains("load n/a"));
    assert!(!text.contains("load 0.00"));
}

#[test]
fn gpu_inventory_renders_devices_and_attached_processes() {
    let mut snapshot = make_snapshot(Instant::now(), 0, 0);
    snapshot.gpus = vec![GpuDevice {
        index: 0,
        name: "TestCard 9000".to_string(),
        driver: "999.99".to_string(),
        utilization: 72,
        mem_utilization: 40,
        memory_used: 6 * 1024 * 1024 * 1024,
        memory_total: 12 * 1024 * 1024 * 1024,
        temperature: 61,
        power_usage_w: 180,
        power_limit_w: 300,
        fan_percent: 45,
        graphics_clock_mhz: 1800,
        memory_clock_mhz: 9500,
        sm_clock_mhz: 1750,
        pstate: "P2".to_string(),
        throttle: vec!["SW Power Cap".to_string()],
    }];
    snapshot.gpu_processes.insert(
        0,
        vec![GpuProcess {
            pid: 4242,
            name: "trainer".to_string(),
            memory_bytes: 4 * 1024 * 1024 * 1024,
        }],
    );
    let mut app = App::new(snapshot, Theme::dark(), Duration::from_secs(1));

    let text = buffer_text(&draw_buffer(&mut app, 110, 55));
    assert!(text.contains("TestCard 9000"));
    assert!(text.contains("SW Power Cap"));
    assert!(text.contains("trainer"));
    assert!(!text.contains("no discrete GPU detected"));
}

#[test]
fn help_overlay_toggles_on_top_of_the_frame() {
    let mut app = make_app();
    let without = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(!without.contains("Key bindings"));

    app.dispatch(Action::ToggleHelp);
    let with = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(with.contains("Key bindings"));

    app.dispatch(Action::ToggleHelp);
    let again = buffer_text(&draw_buffer(&mut app, 100, 45));
    assert!(!again.contains("Key bindings"));
}
