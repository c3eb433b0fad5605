//! Periodic expiry and purge of agent records

use super::LifecycleManager;
use crate::config::LifecycleConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Start the sweeper background task.
///
/// Every `cleanup_interval_secs` it releases agents older than the TTL (when
/// one is configured), then purges inactive records past the retention window.
/// The task ends when `shutdown` is cancelled.
pub fn spawn_sweeper(
    manager: Arc<LifecycleManager>,
    config: LifecycleConfig,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let interval = config.cleanup_interval();
    info!(
        interval_secs = interval.as_secs(),
        retention_ms = config.retention_ms,
        "Agent sweeper started"
    );

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    let expired = config
                        .agent_ttl()
                        .map(|ttl| manager.expire_older_than(ttl))
                        .unwrap_or(0);
                    let purged = manager.cleanup_inactive(config.retention());
                    debug!(expired, purged, "Sweep finished");
                }
                _ = shutdown.cancelled() => {
                    info!("Agent sweeper shutting down");
                    break;
                }
            }
        }
    })
}
