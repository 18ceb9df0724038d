//! Scheduler: the fixed-interval refresh loop.
//!
//! Sleep-first, so after a restart the first pass happens after one full fresh
//! interval. The period is re-read from the watch channel before each sleep:
//! an interval change never restarts an in-flight wait, it applies from the
//! next scheduled firing onward.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use storage::StorageError;

use crate::refresher::FeedRefresher;

/// Runs scheduled refresh passes until a storage failure, which is fatal and
/// returned to the runner.
pub async fn run_scheduler(
    refresher: Arc<FeedRefresher>,
    mut period_rx: watch::Receiver<Duration>,
) -> Result<(), StorageError> {
    loop {
        let period = *period_rx.borrow_and_update();
        info!(
            period_secs = period.as_secs(),
            "Scheduler waiting for next refresh pass"
        );
        tokio::time::sleep(period).await;

        let outcome = refresher.refresh().await?;
        info!(
            posted = outcome.posted,
            failed_feeds = outcome.failures.len(),
            "Scheduled refresh pass finished"
        );
    }
}
