//! Built-in light automations
//!
//! Wires the evening/morning light schedules to sunset and sunrise from the
//! bundled sun dataset. The actions only log for now; the device calls live
//! behind their own integration and are invoked from here once wired up.

use std::sync::Arc;

use anyhow::{Context, Result};
use casa_core::scheduler::{Action, Schedule, Scheduler, SchedulerConfig, Trigger};
use casa_core::sun::SunData;
use chrono::Local;
use tracing::info;

fn night_lights_on() -> Action {
    Arc::new(|_token| {
        Box::pin(async {
            info!("Evening lights turned ON");
        })
    })
}

fn night_lights_off() -> Action {
    Arc::new(|_token| {
        Box::pin(async {
            info!("Evening lights turned OFF");
        })
    })
}

/// Build a scheduler with the sunrise/sunset light automations registered.
///
/// Fails fast when the dataset has no usable entry for today: firing at a
/// silently defaulted time is worse than refusing to start.
pub async fn sunrise_sunset_scheduler(
    sun_data: SunData,
    config: SchedulerConfig,
) -> Result<Scheduler> {
    let sun = Arc::new(sun_data);

    let today = Local::now().date_naive();
    sun.sunrise_on(today)
        .context("sun dataset has no usable sunrise for today")?;
    sun.sunset_on(today)
        .context("sun dataset has no usable sunset for today")?;

    let scheduler = Scheduler::new().with_config(config);

    let sunset_sun = sun.clone();
    scheduler
        .add_schedule(Schedule::new(
            "Night Lights ON",
            // Looked up fresh on every tick so the target tracks the sun.
            Trigger::time(move || {
                sunset_sun
                    .sunset_today()
                    .expect("no sunset data for today")
            }),
            night_lights_on(),
        ))
        .await;

    scheduler
        .add_schedule(Schedule::new(
            "Night Lights OFF",
            Trigger::time(move || sun.sunrise_today().expect("no sunrise data for today")),
            night_lights_off(),
        ))
        .await;

    Ok(scheduler)
}
