use std::collections::VecDeque;

use super::rates::NetRates;
use super::snapshot::Snapshot;

/// Samples kept per tracked metric; at one sample per second this is
/// three minutes of trend behind each sparkline.
pub const HISTORY_CAPACITY: usize = 180;

/// Fixed-capacity ring buffer of recent scalar samples, oldest first.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "history capacity must be at least 1");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the single oldest one once full.
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Samples in arrival order. Empty until the first push, which is how
    /// the renderer tells "no data yet" apart from "all-zero data".
    pub fn series(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

/// One history per tracked metric. GPU buffers are keyed by device index
/// and grow lazily the first time a device reports.
#[derive(Debug, Clone)]
pub struct Histories {
    pub cpu: History,
    pub memory: History,
    pub swap: History,
    pub disk: History,
    pub net_up: History,
    pub net_down: History,
    pub gpu_util: Vec<History>,
    capacity: usize,
}

impl Histories {
    pub fn new(capacity: usize) -> Self {
        Self {
            cpu: History::new(capacity),
            memory: History::new(capacity),
            swap: History::new(capacity),
            disk: History::new(capacity),
            net_up: History::new(capacity),
            net_down: History::new(capacity),
            gpu_util: Vec::new(),
            capacity,
        }
    }

    /// Push one sample per metric out of an applied snapshot. Network
    /// histories only advance once rates are derivable, so their
    /// sparklines pad instead of recording a bogus first tick.
    pub fn record(&mut self, snapshot: &Snapshot, rates: &NetRates) {
        self.cpu.push(snapshot.cpu_total as f64);
        self.memory.push(snapshot.memory.used_percent);
        self.swap.push(snapshot.swap.used_percent);
        self.disk.push(snapshot.disk.used_percent());

        if rates.valid {
            self.net_up.push(rates.up);
            self.net_down.push(rates.down);
        }

        for gpu in &snapshot.gpus {
            let idx = gpu.index as usize;
            while self.gpu_util.len() <= idx {
                self.gpu_util.push(History::new(self.capacity));
            }
            self.gpu_util[idx].push(gpu.utilization as f64);
        }
    }

    pub fn gpu(&self, index: u32) -> Option<&History> {
        self.gpu_util.get(index as usize)
    }
}

impl Default for Histories {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}
