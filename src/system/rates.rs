use super::snapshot::Snapshot;

/// Network throughput derived from two consecutive snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetRates {
    /// Upload, bytes per second.
    pub up: f64,
    /// Download, bytes per second.
    pub down: f64,
    /// False until two ordered snapshots exist.
    pub valid: bool,
}

/// Derive up/down rates from the cumulative counters of `prev` and `curr`.
///
/// The first snapshot of a run only seeds the baseline (`valid == false`).
/// A non-positive elapsed time is a clock anomaly and also yields an
/// invalid result rather than a division by zero. A counter that went
/// backwards (interface reset, counter wrap) contributes a rate of 0 for
/// this tick instead of a negative or underflowed value.
pub fn compute_rates(prev: Option<&Snapshot>, curr: &Snapshot) -> NetRates {
    let Some(prev) = prev else {
        return NetRates::default();
    };

    let elapsed = curr
        .taken_at
        .saturating_duration_since(prev.taken_at)
        .as_secs_f64();
    if elapsed <= 0.0 {
        return NetRates::default();
    }

    let up = counter_rate(prev.net.sent, curr.net.sent, elapsed);
    let down = counter_rate(prev.net.received, curr.net.received, elapsed);

    NetRates {
        up,
        down,
        valid: true,
    }
}

fn counter_rate(prev: u64, curr: u64, elapsed: f64) -> f64 {
    if curr >= prev {
        (curr - prev) as f64 / elapsed
    } else {
        0.0
    }
}
