//! Periodic rate refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{error, info};

use super::engine::ConversionEngine;

/// Spawns a task that refreshes `base` immediately and then every `period`.
///
/// Failures are logged and the next tick retries. Ticks missed while a
/// refresh is slow are delayed, not bursted. Abort the handle to stop.
pub fn spawn_refresh_loop(
    engine: Arc<ConversionEngine>,
    base: String,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(base = %base, period_secs = period.as_secs(), "Starting rate refresh loop");
        run_refresh(&engine, &base).await;

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_refresh(&engine, &base).await;
        }
    })
}

async fn run_refresh(engine: &ConversionEngine, base: &str) {
    if let Err(e) = engine.refresh(base).await {
        error!(base = %base, error = %e, code = e.error_code(), "Scheduled rate refresh failed");
    }
}
