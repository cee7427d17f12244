//! Background purge of idle conversations

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use hr_assistant_agent::DialogueController;

/// Periodically drop expired conversation records and idle per-user locks
pub fn spawn_sweeper(controller: Arc<DialogueController>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep(&controller).await;
        }
    })
}

async fn sweep(controller: &DialogueController) {
    match controller.store().purge_expired().await {
        Ok(0) => {}
        Ok(purged) => tracing::info!(purged, "Purged idle conversations"),
        Err(e) => tracing::warn!(error = %e, "Conversation purge failed"),
    }
    let pruned = controller.prune_locks();
    tracing::debug!(pruned, "Pruned idle user locks");
}
