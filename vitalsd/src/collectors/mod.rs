//! Host readings consumed by the sampler.
//!
//! A [`SnapshotSource`] hands out point-in-time readings. Counters it reports
//! are cumulative; turning them into rates is the sampler's job.

pub mod system;

use crate::types::{NetCounters, ProcessUsage};
use std::collections::BTreeMap;
use thiserror::Error;

pub use system::SysinfoSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("host metrics unavailable: {0}")]
    Unavailable(String),
}

/// Raw usage of a partition as the OS reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionUsage {
    pub mount: String,
    pub fstype: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

impl PartitionUsage {
    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.total_bytes as f64 * 100.0
    }
}

/// Outcome of looking up one mounted partition.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionReading {
    Usage(PartitionUsage),
    /// Lookup failed (permission denied, no capacity reported). The partition
    /// is left out of aggregation rather than counted as empty.
    Skipped { mount: String, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct HostSnapshot {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub partitions: Vec<PartitionReading>,
    /// Summed across all interfaces.
    pub network: NetCounters,
    pub interfaces: BTreeMap<String, NetCounters>,
}

pub trait SnapshotSource: Send {
    /// Full reading for a tick. Starts a new CPU measurement window.
    fn snapshot(&mut self) -> Result<HostSnapshot, SourceError>;

    /// Partitions alone; must not touch CPU or memory state.
    fn partitions(&mut self) -> Result<Vec<PartitionReading>, SourceError>;

    /// Per-interface counters alone; must not touch CPU or memory state.
    fn interfaces(&mut self) -> Result<BTreeMap<String, NetCounters>, SourceError>;

    fn processes(&mut self) -> Result<Vec<ProcessUsage>, SourceError>;
}
