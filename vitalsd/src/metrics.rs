use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Daemon self-metrics, updated by the sampler and read by `/status`.
pub struct Metrics {
    started: Instant,
    ticks_total: AtomicU64,
    tick_failures: AtomicU64,
    counter_rollbacks: AtomicU64,
    partitions_skipped: AtomicU64,
    last_tick_us: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_s: u64,
    pub ticks_total: u64,
    pub tick_failures: u64,
    pub counter_rollbacks: u64,
    pub partitions_skipped: u64,
    pub last_tick_us: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            ticks_total: AtomicU64::new(0),
            tick_failures: AtomicU64::new(0),
            counter_rollbacks: AtomicU64::new(0),
            partitions_skipped: AtomicU64::new(0),
            last_tick_us: AtomicU64::new(0),
        }
    }

    pub fn record_tick(&self, took: Duration) {
        self.ticks_total.fetch_add(1, Ordering::Relaxed);
        self.last_tick_us
            .store(took.as_micros().min(u64::MAX as u128) as u64, Ordering::Relaxed);
    }

    pub fn inc_tick_failures(&self) {
        self.tick_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_counter_rollbacks(&self) {
        self.counter_rollbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_partitions_skipped(&self, count: usize) {
        self.partitions_skipped
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn ticks_total(&self) -> u64 {
        self.ticks_total.load(Ordering::Relaxed)
    }

    pub fn tick_failures(&self) -> u64 {
        self.tick_failures.load(Ordering::Relaxed)
    }

    pub fn counter_rollbacks(&self) -> u64 {
        self.counter_rollbacks.load(Ordering::Relaxed)
    }

    pub fn partitions_skipped(&self) -> u64 {
        self.partitions_skipped.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_s: self.started.elapsed().as_secs(),
            ticks_total: self.ticks_total(),
            tick_failures: self.tick_failures(),
            counter_rollbacks: self.counter_rollbacks(),
            partitions_skipped: self.partitions_skipped(),
            last_tick_us: self.last_tick_us.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
