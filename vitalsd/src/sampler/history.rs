use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Copy of the most recent points, oldest first. All five series have the
/// same length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct History {
    pub timestamps: Vec<DateTime<Utc>>,
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
    pub disk: Vec<f64>,
    pub network: Vec<f64>,
}

impl History {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Five parallel series bounded to `capacity` points, evicting the oldest.
#[derive(Debug)]
pub struct HistoryRing {
    timestamps: VecDeque<DateTime<Utc>>,
    cpu: VecDeque<f64>,
    memory: VecDeque<f64>,
    disk: VecDeque<f64>,
    network: VecDeque<f64>,
    capacity: usize,
}

impl HistoryRing {
    /// `capacity` must be at least 1; config validation enforces it.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            timestamps: VecDeque::with_capacity(capacity),
            cpu: VecDeque::with_capacity(capacity),
            memory: VecDeque::with_capacity(capacity),
            disk: VecDeque::with_capacity(capacity),
            network: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(
        &mut self,
        timestamp: DateTime<Utc>,
        cpu: f64,
        memory: f64,
        disk: f64,
        network: f64,
    ) {
        if self.timestamps.len() == self.capacity {
            self.timestamps.pop_front();
            self.cpu.pop_front();
            self.memory.pop_front();
            self.disk.pop_front();
            self.network.pop_front();
        }
        self.timestamps.push_back(timestamp);
        self.cpu.push_back(cpu);
        self.memory.push_back(memory);
        self.disk.push_back(disk);
        self.network.push_back(network);
        debug_assert!(self.series_aligned());
    }

    /// Last `min(n, len)` points. Non-positive `n` yields an empty history.
    pub fn read(&self, n: i64) -> History {
        let take = usize::try_from(n).unwrap_or(0).min(self.len());
        let skip = self.len() - take;
        History {
            timestamps: tail(&self.timestamps, skip),
            cpu: tail(&self.cpu, skip),
            memory: tail(&self.memory, skip),
            disk: tail(&self.disk, skip),
            network: tail(&self.network, skip),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn series_aligned(&self) -> bool {
        let len = self.timestamps.len();
        self.cpu.len() == len
            && self.memory.len() == len
            && self.disk.len() == len
            && self.network.len() == len
    }
}

fn tail<T: Clone>(series: &VecDeque<T>, skip: usize) -> Vec<T> {
    series.iter().skip(skip).cloned().collect()
}
