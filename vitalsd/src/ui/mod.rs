//! Embedded dashboard.
//!
//! Single page that polls `/metrics` and `/metrics/history` and draws the
//! rolling series. Compiled into the binary so the daemon has no asset dir.
use axum::response::{Html, IntoResponse};

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

pub async fn dashboard_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}
