use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use vitalsd::api::{self, AppState};
use vitalsd::sampler::scheduler;
use vitalsd::{Config, Engine, Metrics, SysinfoSource};

#[derive(Parser, Debug)]
#[command(version, about = "Host vitals sampler")]
struct Args {
    /// Path to the TOML config (falls back to $VITALS_CONFIG, then /etc/vitals/vitals.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen address, e.g. 127.0.0.1:5000
    #[arg(long)]
    listen: Option<String>,

    /// Override the sampling interval in seconds
    #[arg(long)]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = Config::resolve_path(args.config.as_deref());
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.runtime.listen_addr = listen;
    }
    if let Some(interval) = args.interval {
        config.runtime.sample_interval_secs = interval;
    }
    config.validate()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if config_path.exists() {
        info!("[config] loaded {}", config_path.display());
    } else {
        info!("[config] {} not found, using defaults", config_path.display());
    }
    info!(
        "[config] thresholds cpu={} memory={} disk={}, history {} points",
        config.thresholds.cpu,
        config.thresholds.memory,
        config.thresholds.disk,
        config.runtime.history_max_points
    );

    let metrics = Arc::new(Metrics::new());
    let engine = Arc::new(Engine::new(
        Box::new(SysinfoSource::new()),
        config.runtime.history_max_points,
        config.thresholds,
        Arc::clone(&metrics),
    ));

    let sampler = tokio::spawn(scheduler::run(
        Arc::clone(&engine),
        config.runtime.sample_interval(),
    ));

    let app = api::router(AppState {
        engine,
        sample_interval_secs: config.runtime.sample_interval_secs,
    });
    let listener = tokio::net::TcpListener::bind(&config.runtime.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.runtime.listen_addr))?;
    info!("[api] listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sampler.abort();
    info!("vitalsd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
