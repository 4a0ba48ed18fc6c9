use std::path::Path;
use std::time::Instant;

use sysinfo::{Disks, Networks, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};
use thiserror::Error;

use super::gpu::GpuReader;
use super::snapshot::{
    DiskStats, LoadAvg, MemoryStats, NetCounters, ProcessInfo, ProcessSummary, Snapshot,
};

/// The provider could not produce a snapshot at all. Individual missing
/// fields are not errors; they stay zero and render as placeholders.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("host metrics unavailable: no CPU cores and no memory visible")]
    Unavailable,
}

/// Pull-based reader over the OS metric sources. Owns the sysinfo handles
/// (and the NVML handle when present) so successive refreshes can compute
/// usage deltas.
pub struct Collector {
    sys: System,
    networks: Networks,
    disks: Disks,
    gpu: GpuReader,
    limit: usize,
}

impl Collector {
    /// `limit` caps the top-process list carried in each snapshot.
    pub fn new(limit: usize) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );

        Collector {
            sys,
            networks: Networks::new_with_refreshed_list(),
            disks: Disks::new_with_refreshed_list(),
            gpu: GpuReader::new(),
            limit,
        }
    }

    /// Read one snapshot. Blocks on syscalls and NVML queries, so this is
    /// only ever called from the sampler thread (and once at startup).
    pub fn collect(&mut self) -> Result<Snapshot, CollectError> {
        #[cfg(feature = "debug-tracing")]
        let _span = tracing::debug_span!("collector.collect").entered();

        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );
        self.networks.refresh(true);
        self.disks.refresh(true);

        let snapshot = self.build_snapshot();
        if snapshot.cpu_per_core.is_empty() && snapshot.memory.total == 0 {
            return Err(CollectError::Unavailable);
        }
        Ok(snapshot)
    }

    fn build_snapshot(&self) -> Snapshot {
        let memory = self.memory_stats();
        let (procs, processes) = self.process_stats(memory.total);
        let (gpus, gpu_processes) = self.gpu.read(&self.sys);

        Snapshot {
            taken_at: Instant::now(),
            taken_at_epoch: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            hostname: System::host_name().unwrap_or_else(|| "unknown".into()),
            uptime_secs: System::uptime(),
            load: load_stats(),
            cpu_per_core: self.sys.cpus().iter().map(|c| c.cpu_usage()).collect(),
            cpu_total: self.sys.global_cpu_usage(),
            memory,
            swap: self.swap_stats(),
            disk: self.disk_stats(),
            net: self.net_counters(),
            procs,
            processes,
            gpus,
            gpu_processes,
        }
    }

    fn memory_stats(&self) -> MemoryStats {
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        MemoryStats {
            total,
            used,
            available: self.sys.available_memory(),
            // Not exposed by the query layer; zero keeps those lines hidden.
            cached: 0,
            buffers: 0,
            used_percent: percent_of(used, total),
        }
    }

    fn swap_stats(&self) -> MemoryStats {
        let total = self.sys.total_swap();
        let used = self.sys.used_swap();
        MemoryStats {
            total,
            used,
            available: total.saturating_sub(used),
            cached: 0,
            buffers: 0,
            used_percent: percent_of(used, total),
        }
    }

    /// Usage for one primary mount: the root filesystem when present,
    /// otherwise the largest disk the platform reports.
    fn disk_stats(&self) -> DiskStats {
        let primary = self
            .disks
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| self.disks.iter().max_by_key(|d| d.total_space()));

        match primary {
            Some(disk) => DiskStats {
                path: disk.mount_point().to_string_lossy().to_string(),
                used: disk.total_space().saturating_sub(disk.available_space()),
                total: disk.total_space(),
            },
            None => DiskStats::default(),
        }
    }

    fn net_counters(&self) -> NetCounters {
        let mut counters = NetCounters::default();
        for (name, data) in self.networks.iter() {
            if name.starts_with("lo") {
                continue;
            }
            counters.sent = counters.sent.saturating_add(data.total_transmitted());
            counters.received = counters.received.saturating_add(data.total_received());
        }
        counters
    }

    fn process_stats(&self, total_memory: u64) -> (ProcessSummary, Vec<ProcessInfo>) {
        let mut summary = ProcessSummary::default();
        let mut infos: Vec<ProcessInfo> = Vec::with_capacity(self.sys.processes().len());

        for (pid, proc) in self.sys.processes() {
            let status = status_code(proc.status());
            let threads = thread_count(proc);

            summary.total += 1;
            summary.threads += threads;
            if status == 'R' {
                summary.running += 1;
            }

            let user = proc
                .user_id()
                .map(|uid| uid.to_string())
                .unwrap_or_else(|| "?".into());

            let name = proc.name().to_string_lossy().to_string();
            let cmd: Vec<String> = proc
                .cmd()
                .iter()
                .map(|s| s.to_string_lossy().to_string())
                .collect();
            let command = if cmd.is_empty() {
                name.clone()
            } else {
                cmd.join(" ")
            };

            infos.push(ProcessInfo {
                pid: pid.as_u32(),
                ppid: proc.parent().map(|p| p.as_u32()).unwrap_or(0),
                name,
                user,
                cpu_percent: proc.cpu_usage(),
                mem_percent: percent_of(proc.memory(), total_memory) as f32,
                virtual_bytes: proc.virtual_memory(),
                resident_bytes: proc.memory(),
                shared_bytes: 0,
                threads,
                status,
                started_at_secs: proc.start_time(),
                command,
                priority: None,
                nice: None,
            });
        }

        infos.sort_unstable_by(|a, b| {
            b.cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        infos.truncate(self.limit);

        (summary, infos)
    }
}

fn load_stats() -> LoadAvg {
    let load = System::load_average();
    LoadAvg {
        one: load.one,
        five: load.five,
        fifteen: load.fifteen,
        reported: !cfg!(target_os = "windows"),
    }
}

fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn status_code(status: ProcessStatus) -> char {
    match status {
        ProcessStatus::Run => 'R',
        ProcessStatus::Sleep => 'S',
        ProcessStatus::Idle => 'I',
        ProcessStatus::Zombie => 'Z',
        ProcessStatus::Stop => 'T',
        ProcessStatus::Dead => 'X',
        _ => '?',
    }
}

#[cfg(target_os = "linux")]
fn thread_count(proc: &sysinfo::Process) -> usize {
    proc.tasks().map(|t| t.len()).unwrap_or(1)
}

#[cfg(not(target_os = "linux"))]
fn thread_count(_proc: &sysinfo::Process) -> usize {
    1
}
