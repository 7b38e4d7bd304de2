use crate::collectors::{PartitionReading, PartitionUsage};
use crate::types::{DriveUsage, bytes_to_mb, round2};
use log::debug;

/// Capacity-weighted utilization across partitions.
///
/// Each partition's percent is weighted by its total size, so a 90% full 1TB
/// disk weighs ten times a 90% full 100GB one. Returns 0 when nothing has
/// capacity.
pub fn aggregate<'a, I>(partitions: I) -> f64
where
    I: IntoIterator<Item = &'a PartitionUsage>,
{
    let (weighted_sum, total_size) = partitions
        .into_iter()
        .fold((0.0f64, 0.0f64), |(weighted, size), usage| {
            let total = usage.total_bytes as f64;
            (weighted + usage.percent() * total, size + total)
        });

    if total_size > 0.0 {
        weighted_sum / total_size
    } else {
        0.0
    }
}

/// Splits readings into readable partitions, logging every skip.
pub fn readable(readings: &[PartitionReading]) -> (Vec<&PartitionUsage>, usize) {
    let mut usable = Vec::with_capacity(readings.len());
    let mut skipped = 0;
    for reading in readings {
        match reading {
            PartitionReading::Usage(usage) => usable.push(usage),
            PartitionReading::Skipped { mount, reason } => {
                debug!("[sampler] skipping partition {mount}: {reason}");
                skipped += 1;
            }
        }
    }
    (usable, skipped)
}

pub fn drive_usage(usage: &PartitionUsage) -> DriveUsage {
    DriveUsage {
        mount: usage.mount.clone(),
        fstype: usage.fstype.clone(),
        percent: round2(usage.percent()),
        total_mb: bytes_to_mb(usage.total_bytes),
        used_mb: bytes_to_mb(usage.used_bytes),
        free_mb: bytes_to_mb(usage.free_bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(mount: &str, percent: u64, total: u64) -> PartitionUsage {
        let used = total * percent / 100;
        PartitionUsage {
            mount: mount.to_string(),
            fstype: "ext4".to_string(),
            total_bytes: total,
            used_bytes: used,
            free_bytes: total - used,
        }
    }

    #[test]
    fn weights_by_capacity() {
        let parts = [part("/small", 90, 1000), part("/big", 10, 9000)];
        assert!((aggregate(&parts) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn differs_from_plain_mean() {
        let parts = [part("/a", 90, 1000), part("/b", 10, 9000)];
        let mean = (90.0 + 10.0) / 2.0;
        assert!((aggregate(&parts) - mean).abs() > 1.0);
    }

    #[test]
    fn empty_is_zero() {
        let parts: [PartitionUsage; 0] = [];
        assert_eq!(aggregate(&parts), 0.0);
    }

    #[test]
    fn zero_capacity_is_zero() {
        let parts = [part("/void", 0, 0)];
        assert_eq!(aggregate(&parts), 0.0);
    }

    #[test]
    fn skipped_partitions_are_excluded() {
        let readings = vec![
            PartitionReading::Usage(part("/", 50, 2000)),
            PartitionReading::Skipped {
                mount: "/secret".to_string(),
                reason: "permission denied".to_string(),
            },
        ];
        let (usable, skipped) = readable(&readings);
        assert_eq!(skipped, 1);
        assert_eq!(usable.len(), 1);
        assert!((aggregate(usable) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn drive_usage_converts_to_mb() {
        let usage = PartitionUsage {
            mount: "/data".to_string(),
            fstype: "xfs".to_string(),
            total_bytes: 4 * 1024 * 1024,
            used_bytes: 1024 * 1024,
            free_bytes: 3 * 1024 * 1024,
        };
        let drive = drive_usage(&usage);
        assert_eq!(drive.total_mb, 4.0);
        assert_eq!(drive.used_mb, 1.0);
        assert_eq!(drive.free_mb, 3.0);
        assert_eq!(drive.percent, 25.0);
        assert_eq!(drive.fstype, "xfs");
    }
}
