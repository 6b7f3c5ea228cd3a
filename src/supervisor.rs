use std::sync::Arc;

use chrono_tz::Tz;
use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::capture::StateCapture;
use crate::model::team::TeamConfig;
use crate::scheduler::{Services, TeamScheduler};
use crate::timing::Timing;
use crate::watcher::flash;

/// Points flashed by the manual flash test, one touchdown.
pub const FLASH_TEST_POINTS: i64 = 6;

/// Run one scheduler per team on the current task. Never returns while any team is configured.
pub async fn run_all(teams: Vec<TeamConfig>, services: Services, timing: Timing, display_tz: Tz) {
    let schedulers = teams.into_iter().map(|team| {
        TeamScheduler::new(Arc::new(team), services.clone(), timing, display_tz).run()
    });
    join_all(schedulers).await;
    warn!("All team schedulers stopped");
}

/// Color the light for `team`, flash once for a touchdown, then put the light back.
#[instrument(level = "info", skip(team, services, timing), fields(team = %team.label))]
pub async fn flash_test(team: &TeamConfig, services: &Services, timing: &Timing) {
    let capture = StateCapture::new(Arc::clone(&services.light));
    let snapshot = capture.capture().await;

    if let Err(e) = services.light.set_hsv(team.color).await {
        warn!(error = %e, "Failed to set team color for flash test");
    }
    flash(services.light.as_ref(), team, FLASH_TEST_POINTS, timing.flash_pause()).await;

    capture.restore(snapshot).await;
    info!("Flash test finished");
}
