//! Network throughput derived from cumulative byte counters.

use crate::types::{BYTES_PER_MB, NetCounters};
use log::warn;

/// Floor for the elapsed time between two readings, in seconds. Keeps a
/// stalled or backwards clock from dividing by zero or flipping the sign.
pub const MIN_ELAPSED_SECS: f64 = 1e-6;

/// Counters and the instant (seconds since the epoch) they were read at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterState {
    pub counters: NetCounters,
    pub captured_at: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NetworkRate {
    /// No previous reading to diff against.
    Baseline,
    Measured(f64),
    /// Counters went backwards (interface reset or wrap). Reported as 0.
    RolledBack { delta_bytes: i128 },
}

impl NetworkRate {
    pub fn mb_per_sec(&self) -> f64 {
        match self {
            Self::Measured(rate) => *rate,
            Self::Baseline | Self::RolledBack { .. } => 0.0,
        }
    }
}

pub fn compute_rate(
    prev: Option<&CounterState>,
    curr: &NetCounters,
    curr_time: f64,
) -> NetworkRate {
    let Some(prev) = prev else {
        return NetworkRate::Baseline;
    };

    let delta_bytes = curr.total() as i128 - prev.counters.total() as i128;
    if delta_bytes < 0 {
        return NetworkRate::RolledBack { delta_bytes };
    }
    let delta_time = (curr_time - prev.captured_at).max(MIN_ELAPSED_SECS);
    NetworkRate::Measured((delta_bytes as f64 / delta_time) / BYTES_PER_MB)
}

/// Holds the previous counter reading between ticks.
#[derive(Debug, Default)]
pub struct RateTracker {
    baseline: Option<CounterState>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline(&self) -> Option<&CounterState> {
        self.baseline.as_ref()
    }

    /// Computes the rate against the stored baseline, then replaces the
    /// baseline with `curr`. Every call advances state exactly once.
    pub fn observe(&mut self, curr: NetCounters, curr_time: f64) -> NetworkRate {
        let rate = compute_rate(self.baseline.as_ref(), &curr, curr_time);
        if let NetworkRate::RolledBack { delta_bytes } = rate {
            warn!("[sampler] network counters went backwards by {delta_bytes} bytes; reporting 0 MB/s");
        }
        self.baseline = Some(CounterState {
            counters: curr,
            captured_at: curr_time,
        });
        rate
    }
}
