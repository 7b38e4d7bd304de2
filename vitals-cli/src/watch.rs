use crate::client::{Counters, Metrics, VitalsClient};
use crate::report;
use anyhow::Result;
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-interface send/receive rates in MB/s between two polls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceRate {
    pub sent_mb_s: f64,
    pub recv_mb_s: f64,
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Counters that went backwards (interface reset) read as zero.
pub fn interface_rates(
    prev: &BTreeMap<String, Counters>,
    curr: &BTreeMap<String, Counters>,
    elapsed_secs: f64,
) -> BTreeMap<String, InterfaceRate> {
    let elapsed = elapsed_secs.max(1e-6);
    curr.iter()
        .filter_map(|(name, now)| {
            let before = prev.get(name)?;
            let sent = now.bytes_sent.saturating_sub(before.bytes_sent) as f64;
            let recv = now.bytes_recv.saturating_sub(before.bytes_recv) as f64;
            Some((
                name.clone(),
                InterfaceRate {
                    sent_mb_s: sent / BYTES_PER_MB / elapsed,
                    recv_mb_s: recv / BYTES_PER_MB / elapsed,
                },
            ))
        })
        .collect()
}

pub async fn run_watch(client: &VitalsClient, interval: Duration, count: Option<u64>) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    let mut prev: Option<Metrics> = None;
    let mut seen = 0u64;

    loop {
        ticker.tick().await;
        let current = client.metrics().await?;
        report::print_summary(&current);
        if let Some(prev) = &prev {
            let rates = interface_rates(
                &prev.per_interface,
                &current.per_interface,
                current.timestamp - prev.timestamp,
            );
            for (name, rate) in &rates {
                println!(
                    "  {:<16} tx {:.4} MB/s  rx {:.4} MB/s",
                    name, rate.sent_mb_s, rate.recv_mb_s
                );
            }
        }
        prev = Some(current);

        seen += 1;
        if count.is_some_and(|limit| seen >= limit) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(pairs: &[(&str, u64, u64)]) -> BTreeMap<String, Counters> {
        pairs
            .iter()
            .map(|(name, sent, recv)| {
                (
                    name.to_string(),
                    Counters {
                        bytes_sent: *sent,
                        bytes_recv: *recv,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn rates_from_counter_deltas() {
        let prev = counters(&[("eth0", 0, 1024 * 1024)]);
        let curr = counters(&[("eth0", 2 * 1024 * 1024, 3 * 1024 * 1024)]);
        let rates = interface_rates(&prev, &curr, 2.0);
        assert_eq!(
            rates["eth0"],
            InterfaceRate {
                sent_mb_s: 1.0,
                recv_mb_s: 1.0
            }
        );
    }

    #[test]
    fn reset_counters_read_as_zero() {
        let prev = counters(&[("eth0", 5000, 5000)]);
        let curr = counters(&[("eth0", 10, 6000)]);
        let rate = interface_rates(&prev, &curr, 1.0)["eth0"];
        assert_eq!(rate.sent_mb_s, 0.0);
        assert!(rate.recv_mb_s > 0.0);
    }

    #[test]
    fn new_interfaces_wait_for_a_second_poll() {
        let prev = counters(&[("eth0", 0, 0)]);
        let curr = counters(&[("eth0", 0, 0), ("wg0", 100, 100)]);
        let rates = interface_rates(&prev, &curr, 1.0);
        assert!(rates.contains_key("eth0"));
        assert!(!rates.contains_key("wg0"));
    }
}
