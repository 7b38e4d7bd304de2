use crate::types::Sample;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu: 85.0,
            memory: 85.0,
            disk: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy)]
enum Resource {
    Cpu,
    Memory,
    Disk,
}

impl Resource {
    fn reading(self, sample: &Sample) -> f64 {
        match self {
            Self::Cpu => sample.cpu_percent,
            Self::Memory => sample.memory_percent,
            Self::Disk => sample.disk_percent,
        }
    }

    fn limit(self, thresholds: &Thresholds) -> f64 {
        match self {
            Self::Cpu => thresholds.cpu,
            Self::Memory => thresholds.memory,
            Self::Disk => thresholds.disk,
        }
    }
}

struct Rule {
    resource: Resource,
    severity: Severity,
    message: &'static str,
}

/// Checked top to bottom; the first breach wins and the rest are not
/// reported. One alert per sample keeps a host that is hot everywhere from
/// flooding consumers, at the cost of hiding a concurrent memory or disk
/// breach while CPU is over its limit.
const RULES: [Rule; 3] = [
    Rule {
        resource: Resource::Cpu,
        severity: Severity::Critical,
        message: "High CPU usage",
    },
    Rule {
        resource: Resource::Memory,
        severity: Severity::Warning,
        message: "High memory usage",
    },
    Rule {
        resource: Resource::Disk,
        severity: Severity::Warning,
        message: "Disk nearly full",
    },
];

/// Strict `>`: a reading exactly at its limit does not alert.
pub fn evaluate(sample: &Sample, thresholds: &Thresholds) -> Option<Alert> {
    RULES.iter().find_map(|rule| {
        let value = rule.resource.reading(sample);
        (value > rule.resource.limit(thresholds)).then(|| Alert {
            message: format!("{}: {}%", rule.message, value),
            severity: rule.severity,
        })
    })
}
