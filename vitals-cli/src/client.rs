use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Drive {
    pub mount: String,
    pub fstype: String,
    pub percent: f64,
    pub total_mb: f64,
    pub used_mb: f64,
    pub free_mb: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct Counters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metrics {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub network: f64,
    #[serde(default)]
    pub per_interface: BTreeMap<String, Counters>,
    pub message: Option<String>,
    pub severity: Option<Severity>,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
    pub timestamps: Vec<String>,
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
    pub disk: Vec<f64>,
    pub network: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

#[derive(Debug, Deserialize)]
struct DiskReport {
    drives: Vec<Drive>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin typed wrapper over the vitalsd HTTP API.
pub struct VitalsClient {
    http: Client,
    base: String,
}

impl VitalsClient {
    pub fn new(base: &str) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("failed to reach {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => bail!("{url} returned {status}: {}", err.error),
                Err(_) => bail!("{url} returned {status}"),
            }
        }
        resp.json()
            .await
            .with_context(|| format!("invalid response from {url}"))
    }

    pub async fn metrics(&self) -> Result<Metrics> {
        self.get("/metrics", &[]).await
    }

    pub async fn history(&self, points: Option<i64>) -> Result<History> {
        let query: Vec<(&str, String)> = points
            .map(|p| vec![("points", p.to_string())])
            .unwrap_or_default();
        self.get("/metrics/history", &query).await
    }

    pub async fn processes(&self, sort: &str, n: usize) -> Result<Vec<ProcessInfo>> {
        self.get(
            "/processes",
            &[("sort", sort.to_string()), ("n", n.to_string())],
        )
        .await
    }

    pub async fn disk(&self) -> Result<Vec<Drive>> {
        let report: DiskReport = self.get("/disk", &[]).await?;
        Ok(report.drives)
    }

    pub async fn network(&self) -> Result<BTreeMap<String, Counters>> {
        self.get("/network", &[]).await
    }
}
