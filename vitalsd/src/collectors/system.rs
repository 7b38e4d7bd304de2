use super::{HostSnapshot, PartitionReading, PartitionUsage, SnapshotSource, SourceError};
use crate::types::{NetCounters, ProcessUsage, round2};
use log::debug;
use std::collections::BTreeMap;
use sysinfo::{Disk, Disks, Networks, ProcessesToUpdate, System};

/// [`SnapshotSource`] backed by the `sysinfo` crate.
///
/// Handles are kept between calls: CPU usage is computed by sysinfo from the
/// delta against the previous refresh, so the very first reading is 0.
pub struct SysinfoSource {
    sys: System,
    disks: Disks,
    networks: Networks,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
        }
    }

    fn memory_percent(&self) -> Result<f64, SourceError> {
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(SourceError::Unavailable(
                "total memory reported as 0".to_string(),
            ));
        }
        Ok(self.sys.used_memory() as f64 / total as f64 * 100.0)
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotSource for SysinfoSource {
    fn snapshot(&mut self) -> Result<HostSnapshot, SourceError> {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();
        let memory_percent = self.memory_percent()?;
        let partitions = self.partitions()?;
        let interfaces = self.interfaces()?;

        let network = interfaces
            .values()
            .fold(NetCounters::default(), |sum, counters| {
                NetCounters::new(
                    sum.bytes_sent.saturating_add(counters.bytes_sent),
                    sum.bytes_recv.saturating_add(counters.bytes_recv),
                )
            });
        debug!(
            "[sysinfo] snapshot: {} disks, {} interfaces",
            partitions.len(),
            interfaces.len()
        );

        Ok(HostSnapshot {
            cpu_percent: self.sys.global_cpu_usage() as f64,
            memory_percent,
            partitions,
            network,
            interfaces,
        })
    }

    fn partitions(&mut self) -> Result<Vec<PartitionReading>, SourceError> {
        self.disks.refresh(true);
        Ok(self.disks.list().iter().map(read_partition).collect())
    }

    fn interfaces(&mut self) -> Result<BTreeMap<String, NetCounters>, SourceError> {
        self.networks.refresh(true);
        Ok(self
            .networks
            .list()
            .iter()
            .map(|(name, data)| {
                (
                    name.clone(),
                    NetCounters::new(data.total_transmitted(), data.total_received()),
                )
            })
            .collect())
    }

    fn processes(&mut self) -> Result<Vec<ProcessUsage>, SourceError> {
        self.sys.refresh_memory();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let total_memory = self.sys.total_memory();
        if total_memory == 0 {
            return Err(SourceError::Unavailable(
                "total memory reported as 0".to_string(),
            ));
        }

        Ok(self
            .sys
            .processes()
            .values()
            .map(|proc| {
                process_usage(
                    proc.pid().as_u32(),
                    proc.name().to_string_lossy().into_owned(),
                    proc.cpu_usage(),
                    proc.memory(),
                    total_memory,
                )
            })
            .collect())
    }
}

fn process_usage(
    pid: u32,
    name: String,
    cpu: f32,
    rss_bytes: u64,
    total_memory: u64,
) -> ProcessUsage {
    ProcessUsage {
        pid,
        name,
        cpu_percent: round2(cpu as f64),
        memory_percent: round2(rss_bytes as f64 / total_memory as f64 * 100.0),
    }
}

fn read_partition(disk: &Disk) -> PartitionReading {
    let mount = disk.mount_point().to_string_lossy().into_owned();
    let total = disk.total_space();
    let available = disk.available_space();

    if total == 0 {
        return PartitionReading::Skipped {
            mount,
            reason: "no capacity reported".to_string(),
        };
    }
    if available > total {
        return PartitionReading::Skipped {
            mount,
            reason: format!("available {available} exceeds total {total}"),
        };
    }

    PartitionReading::Usage(PartitionUsage {
        mount,
        fstype: disk.file_system().to_string_lossy().into_owned(),
        total_bytes: total,
        used_bytes: total - available,
        free_bytes: available,
    })
}
