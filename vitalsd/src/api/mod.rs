//! JSON API over the sampling engine.

use crate::sampler::{Engine, ProcessSort, SampleError, Severity};
use crate::types::{DriveUsage, NetCounters, ProcessUsage, Sample};
use crate::ui;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::SecondsFormat;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const DEFAULT_TOP_PROCESSES: usize = 5;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub sample_interval_secs: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::dashboard_handler))
        .route("/metrics", get(metrics))
        .route("/metrics/history", get(history))
        .route("/processes", get(processes))
        .route("/disk", get(disk))
        .route("/network", get(network))
        .route("/healthz", get(healthz))
        .route("/status", get(status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct ApiError(SampleError);

impl From<SampleError> for ApiError {
    fn from(err: SampleError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("[api] request failed: {}", self.0);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub network: f64,
    pub per_drive: Vec<DriveUsage>,
    pub per_interface: BTreeMap<String, NetCounters>,
    pub message: Option<String>,
    pub severity: Option<Severity>,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
}

impl MetricsResponse {
    fn new(sample: Sample, engine: &Engine) -> Self {
        let alert = engine.evaluate(&sample);
        let timestamp = sample.timestamp.timestamp_micros() as f64 / 1_000_000.0;
        Self {
            cpu: sample.cpu_percent,
            memory: sample.memory_percent,
            disk: sample.disk_percent,
            network: sample.network_rate_mb_s,
            per_drive: sample.per_drive,
            per_interface: sample.per_interface,
            message: alert.as_ref().map(|a| a.message.clone()),
            severity: alert.map(|a| a.severity),
            timestamp,
        }
    }
}

async fn metrics(State(state): State<AppState>) -> Result<Json<MetricsResponse>, ApiError> {
    let sample = state.engine.run_blocking(|engine| engine.tick()).await?;
    Ok(Json(MetricsResponse::new(sample, &state.engine)))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    points: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub timestamps: Vec<String>,
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
    pub disk: Vec<f64>,
    pub network: Vec<f64>,
}

async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    let points = params
        .points
        .unwrap_or_else(|| state.engine.history_capacity() as i64);
    let history = state.engine.history(points);
    Json(HistoryResponse {
        timestamps: history
            .timestamps
            .iter()
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            .collect(),
        cpu: history.cpu,
        memory: history.memory,
        disk: history.disk,
        network: history.network,
    })
}

#[derive(Debug, Deserialize)]
pub struct ProcessParams {
    sort: Option<String>,
    n: Option<usize>,
}

async fn processes(
    State(state): State<AppState>,
    Query(params): Query<ProcessParams>,
) -> Result<Json<Vec<ProcessUsage>>, ApiError> {
    let sort = params
        .sort
        .as_deref()
        .map(ProcessSort::from)
        .unwrap_or_default();
    let n = params.n.unwrap_or(DEFAULT_TOP_PROCESSES);
    let procs = state
        .engine
        .run_blocking(move |engine| engine.processes(sort, n))
        .await?;
    Ok(Json(procs))
}

#[derive(Debug, Serialize)]
pub struct DiskResponse {
    pub drives: Vec<DriveUsage>,
}

async fn disk(State(state): State<AppState>) -> Result<Json<DiskResponse>, ApiError> {
    let drives = state.engine.run_blocking(|engine| engine.drives()).await?;
    Ok(Json(DiskResponse { drives }))
}

async fn network(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, NetCounters>>, ApiError> {
    let interfaces = state
        .engine
        .run_blocking(|engine| engine.interfaces())
        .await?;
    Ok(Json(interfaces))
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub uptime_s: u64,
    pub ticks_total: u64,
    pub tick_failures: u64,
    pub counter_rollbacks: u64,
    pub partitions_skipped: u64,
    pub last_tick_us: u64,
    pub history_len: usize,
    pub history_capacity: usize,
    pub sample_interval_secs: u64,
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snap = state.engine.metrics().snapshot();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        uptime_s: snap.uptime_s,
        ticks_total: snap.ticks_total,
        tick_failures: snap.tick_failures,
        counter_rollbacks: snap.counter_rollbacks,
        partitions_skipped: snap.partitions_skipped,
        last_tick_us: snap.last_tick_us,
        history_len: state.engine.history_len(),
        history_capacity: state.engine.history_capacity(),
        sample_interval_secs: state.sample_interval_secs,
    })
}
