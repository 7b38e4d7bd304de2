//! Sampling engine.
//!
//! Each tick pulls one snapshot from the source, folds partitions into a
//! capacity-weighted disk figure, turns network counters into a rate and
//! appends the result to the bounded history. Ticks are serialized on one
//! lock; history reads only take the ring's read lock.

pub mod disk;
pub mod history;
pub mod rate;
pub mod scheduler;
pub mod thresholds;

use crate::collectors::{SnapshotSource, SourceError};
use crate::metrics::Metrics;
use crate::types::{DriveUsage, NetCounters, ProcessUsage, Sample};
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Instant;
use thiserror::Error;

pub use history::{History, HistoryRing};
pub use rate::{NetworkRate, RateTracker};
pub use thresholds::{Alert, Severity, Thresholds};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),
    #[error("sampling task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessSort {
    #[default]
    Cpu,
    Memory,
}

/// Anything but `cpu` sorts by memory.
impl From<&str> for ProcessSort {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("cpu") {
            Self::Cpu
        } else {
            Self::Memory
        }
    }
}

struct TickState {
    source: Box<dyn SnapshotSource>,
    rates: RateTracker,
}

pub struct Engine {
    state: Mutex<TickState>,
    history: RwLock<HistoryRing>,
    thresholds: Thresholds,
    metrics: Arc<Metrics>,
}

impl Engine {
    pub fn new(
        source: Box<dyn SnapshotSource>,
        capacity: usize,
        thresholds: Thresholds,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            state: Mutex::new(TickState {
                source,
                rates: RateTracker::new(),
            }),
            history: RwLock::new(HistoryRing::new(capacity)),
            thresholds,
            metrics,
        }
    }

    /// Takes one sample and appends it to the history.
    ///
    /// A source failure returns before any state is touched, so the rate
    /// baseline and the history stay as they were.
    pub fn tick(&self) -> Result<Sample, SampleError> {
        let started = Instant::now();
        let mut state = self.lock_state();

        let snapshot = match state.source.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.metrics.inc_tick_failures();
                return Err(err.into());
            }
        };
        let timestamp = Utc::now();

        let (usable, skipped) = disk::readable(&snapshot.partitions);
        if skipped > 0 {
            self.metrics.add_partitions_skipped(skipped);
        }
        let disk_percent = disk::aggregate(usable.iter().copied());
        let per_drive = usable.iter().map(|usage| disk::drive_usage(usage)).collect();

        let rate = state.rates.observe(snapshot.network, epoch_secs(&timestamp));
        if let NetworkRate::RolledBack { .. } = rate {
            self.metrics.inc_counter_rollbacks();
        }

        let sample = Sample {
            timestamp,
            cpu_percent: snapshot.cpu_percent,
            memory_percent: snapshot.memory_percent,
            disk_percent,
            network_rate_mb_s: rate.mb_per_sec(),
            per_drive,
            per_interface: snapshot.interfaces,
        };

        // still under the tick lock so pushes land in tick order
        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(
                sample.timestamp,
                sample.cpu_percent,
                sample.memory_percent,
                sample.disk_percent,
                sample.network_rate_mb_s,
            );
        drop(state);

        self.metrics.record_tick(started.elapsed());
        debug!(
            "[sampler] tick cpu={:.1}% mem={:.1}% disk={:.2}% net={:.3}MB/s",
            sample.cpu_percent,
            sample.memory_percent,
            sample.disk_percent,
            sample.network_rate_mb_s
        );
        Ok(sample)
    }

    /// Runs `f` on the blocking pool. The source is synchronous and may stall
    /// on procfs or statfs, so async callers go through here.
    pub async fn run_blocking<T, F>(self: &Arc<Self>, f: F) -> Result<T, SampleError>
    where
        F: FnOnce(&Engine) -> Result<T, SampleError> + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&engine))
            .await
            .map_err(|err| SampleError::Aborted(err.to_string()))?
    }

    pub fn history(&self, n: i64) -> History {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .read(n)
    }

    pub fn history_len(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn history_capacity(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .capacity()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn evaluate(&self, sample: &Sample) -> Option<Alert> {
        thresholds::evaluate(sample, &self.thresholds)
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Top `n` processes, highest first. Does not touch the rate baseline or
    /// the history.
    pub fn processes(&self, sort: ProcessSort, n: usize) -> Result<Vec<ProcessUsage>, SampleError> {
        let mut state = self.lock_state();
        let mut procs = state.source.processes()?;
        drop(state);

        match sort {
            ProcessSort::Cpu => procs.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent)),
            ProcessSort::Memory => {
                procs.sort_by(|a, b| b.memory_percent.total_cmp(&a.memory_percent))
            }
        }
        procs.truncate(n);
        Ok(procs)
    }

    /// Per-drive usage. Refreshes disks only, so the CPU window of the next
    /// tick is left alone.
    pub fn drives(&self) -> Result<Vec<DriveUsage>, SampleError> {
        let partitions = self.lock_state().source.partitions()?;
        let (usable, _) = disk::readable(&partitions);
        Ok(usable.into_iter().map(disk::drive_usage).collect())
    }

    pub fn interfaces(&self) -> Result<BTreeMap<String, NetCounters>, SampleError> {
        Ok(self.lock_state().source.interfaces()?)
    }

    // The source only panics before the rate tracker is touched, so the state
    // behind a poisoned lock is still consistent.
    fn lock_state(&self) -> MutexGuard<'_, TickState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn epoch_secs(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.timestamp_micros() as f64 / 1_000_000.0
}
