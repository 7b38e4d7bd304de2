use super::Engine;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Drives periodic ticks. On-demand ticks from the API share the engine's
/// lock, so the two never overlap. A failed tick is logged and the next
/// interval tries again.
pub async fn run(engine: Arc<Engine>, period: Duration) {
    info!("[sampler] sampling every {}ms", period.as_millis());
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match engine.run_blocking(|engine| engine.tick()).await {
            Ok(sample) => {
                if let Some(alert) = engine.evaluate(&sample) {
                    warn!(
                        "[sampler] {:?} alert: {}",
                        alert.severity, alert.message
                    );
                }
            }
            Err(err) => warn!("[sampler] tick failed: {err}"),
        }
    }
}
