use crate::client::{Counters, Drive, History, Metrics, Severity};
use colored::*;
use std::collections::BTreeMap;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::Warning => Color::Yellow,
    }
}

pub fn print_summary(m: &Metrics) {
    println!(
        "cpu {:>5.1}%  mem {:>5.1}%  disk {:>5.1}%  net {:.4} MB/s",
        m.cpu, m.memory, m.disk, m.network
    );
    if let Some(alert) = alert_line(m) {
        println!("{alert}");
    }
}

pub fn alert_line(m: &Metrics) -> Option<ColoredString> {
    let message = m.message.as_deref()?;
    Some(match m.severity {
        Some(severity) => {
            let tag = format!("{severity:?}").to_uppercase();
            format!("[{tag}] {message}").color(severity_color(severity))
        }
        None => message.normal(),
    })
}

pub fn print_history(history: &History) {
    if history.timestamps.is_empty() {
        println!("{}", "no samples recorded yet".dimmed());
        return;
    }
    println!(
        "{:<26} {:>7} {:>7} {:>7} {:>12}",
        "TIME", "CPU%", "MEM%", "DISK%", "NET MB/s"
    );
    for (i, ts) in history.timestamps.iter().enumerate() {
        println!(
            "{:<26} {:>7} {:>7} {:>7} {:>12}",
            ts,
            cell(&history.cpu, i, 1),
            cell(&history.memory, i, 1),
            cell(&history.disk, i, 1),
            cell(&history.network, i, 4),
        );
    }
}

fn cell(series: &[f64], i: usize, precision: usize) -> String {
    series
        .get(i)
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

pub fn print_drives(drives: &[Drive]) {
    if drives.is_empty() {
        println!("{}", "no readable drives".dimmed());
        return;
    }
    println!(
        "{:<24} {:<8} {:>7} {:>12} {:>12} {:>12}",
        "MOUNT", "FS", "USE%", "TOTAL MB", "USED MB", "FREE MB"
    );
    for d in drives {
        let pct = format!("{:>7.1}", d.percent);
        let pct = if d.percent > 90.0 {
            pct.red()
        } else {
            pct.normal()
        };
        println!(
            "{:<24} {:<8} {} {:>12.2} {:>12.2} {:>12.2}",
            d.mount, d.fstype, pct, d.total_mb, d.used_mb, d.free_mb
        );
    }
}

pub fn print_interfaces(interfaces: &BTreeMap<String, Counters>) {
    println!("{:<16} {:>16} {:>16}", "IFACE", "SENT", "RECV");
    for (name, c) in interfaces {
        println!("{:<16} {:>16} {:>16}", name, c.bytes_sent, c.bytes_recv);
    }
}
