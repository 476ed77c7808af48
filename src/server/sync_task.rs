use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{error, info};

use crate::db::services::sync_service;
use crate::web::AppState;

/// Starts the periodic EPA sync. Returns `None` when the interval is zero.
pub fn spawn(app_state: Arc<AppState>) -> Option<JoinHandle<()>> {
    let every = app_state.config.sync_interval_secs;
    if every == 0 {
        info!("EPA sync task disabled.");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(every));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_seconds = every, "EPA sync task started.");

        loop {
            ticker.tick().await;
            info!("Performing scheduled EPA sync...");
            if let Err(e) =
                sync_service::sync_all(&app_state.db_pool, app_state.beach_source.as_ref()).await
            {
                error!(error = %e, "Scheduled EPA sync failed.");
            }
        }
    }))
}
