//! Casa - Home Automation Daemon
//!
//! Entry point: loads configuration, registers the built-in light
//! automations, and runs the scheduler until interrupted.

#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::{bail, Context, Result};
use casa_core::scheduler::SchedulerConfig;
use casa_core::sun::SunData;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod automations;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casa=info,casa_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting casa v{}", env!("CARGO_PKG_VERSION"));

    let app_config = config::load_config()?;

    let sun_data = SunData::load(&app_config.sun.data_path)
        .with_context(|| format!("Failed to load sun data from {}", app_config.sun.data_path))?;

    let scheduler_config = SchedulerConfig::new()
        .with_tick_interval(Duration::from_secs(app_config.scheduler.tick_interval_secs));
    let scheduler = automations::sunrise_sunset_scheduler(sun_data, scheduler_config).await?;

    scheduler.start().await?;
    info!("Scheduler running, press Ctrl-C to stop");

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            scheduler.stop().await;
        }
        // A loop that dies outside of stop() leaves registered schedules
        // silently unserved; refuse to linger in that state.
        _ = scheduler.terminated() => {
            bail!("scheduler loop exited unexpectedly");
        }
    }
    Ok(())
}
