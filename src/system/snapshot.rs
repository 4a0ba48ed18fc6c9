use std::collections::HashMap;
use std::time::Instant;

/// One point-in-time reading of everything the dashboard tracks.
///
/// Produced by the collector, consumed once by the app. Fields backed by a
/// metric the platform does not expose are left zero/`None`/empty; the
/// widgets render explicit placeholders for those instead of failing.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub taken_at: Instant,
    /// Wall-clock seconds since the Unix epoch at the same instant; used
    /// to turn per-process start times into elapsed runtimes.
    pub taken_at_epoch: u64,
    pub hostname: String,
    pub uptime_secs: u64,
    pub load: LoadAvg,
    /// Per-core usage percentages, index = core id.
    pub cpu_per_core: Vec<f32>,
    pub cpu_total: f32,
    pub memory: MemoryStats,
    /// `total == 0` means no swap configured.
    pub swap: MemoryStats,
    pub disk: DiskStats,
    pub net: NetCounters,
    pub procs: ProcessSummary,
    /// Top processes by CPU, at most the collector's `limit`.
    pub processes: Vec<ProcessInfo>,
    pub gpus: Vec<GpuDevice>,
    /// Attached compute processes keyed by GPU index, capped per device.
    pub gpu_processes: HashMap<u32, Vec<GpuProcess>>,
}

/// Load averages with an explicit availability flag so an unreported
/// triple is never mistaken for a measured 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadAvg {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    pub reported: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStats {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    pub cached: u64,
    pub buffers: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DiskStats {
    pub path: String,
    pub used: u64,
    pub total: u64,
}

impl DiskStats {
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64 * 100.0
        }
    }
}

/// Cumulative byte counters summed over all non-loopback interfaces.
/// Monotonically intended; a counter reset may make them drop, which rate
/// computation treats as a zero-rate tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetCounters {
    pub sent: u64,
    pub received: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSummary {
    pub total: usize,
    pub running: usize,
    pub threads: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessInfo {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub user: String,
    pub cpu_percent: f32,
    pub mem_percent: f32,
    pub virtual_bytes: u64,
    pub resident_bytes: u64,
    pub shared_bytes: u64,
    pub threads: usize,
    /// Single-letter state code (R, S, I, Z, T).
    pub status: char,
    /// Unix epoch seconds at process start.
    pub started_at_secs: u64,
    pub command: String,
    /// `None` when the platform query layer exposes no real value.
    pub priority: Option<i32>,
    pub nice: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct GpuDevice {
    pub index: u32,
    pub name: String,
    pub driver: String,
    pub utilization: u32,
    pub mem_utilization: u32,
    pub memory_used: u64,
    pub memory_total: u64,
    pub temperature: u32,
    pub power_usage_w: u32,
    pub power_limit_w: u32,
    pub fan_percent: u32,
    pub graphics_clock_mhz: u32,
    pub memory_clock_mhz: u32,
    pub sm_clock_mhz: u32,
    pub pstate: String,
    pub throttle: Vec<String>,
}

impl GpuDevice {
    pub fn memory_percent(&self) -> f64 {
        if self.memory_total == 0 {
            0.0
        } else {
            self.memory_used as f64 / self.memory_total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GpuProcess {
    pub pid: u32,
    pub name: String,
    pub memory_bytes: u64,
}
