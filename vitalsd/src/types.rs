use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Cumulative byte counters as reported by the OS (since boot or interface up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

impl NetCounters {
    pub fn new(bytes_sent: u64, bytes_recv: u64) -> Self {
        Self {
            bytes_sent,
            bytes_recv,
        }
    }

    /// Sent plus received, widened so two `u64::MAX` counters still fit.
    pub fn total(&self) -> u128 {
        self.bytes_sent as u128 + self.bytes_recv as u128
    }
}

/// Usage of one readable partition, sizes in MB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveUsage {
    pub mount: String,
    pub fstype: String,
    pub percent: f64,
    pub total_mb: f64,
    pub used_mb: f64,
    pub free_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessUsage {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// One immutable reading of every tracked metric, produced once per tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    // capacity-weighted, 0 when no partition was readable
    pub disk_percent: f64,
    pub network_rate_mb_s: f64,
    pub per_drive: Vec<DriveUsage>,
    // raw cumulative counters, not rates
    pub per_interface: BTreeMap<String, NetCounters>,
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
