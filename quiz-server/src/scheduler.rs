use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::game_manager::GameManager;

/// Spawn the clue-release scheduler task.
///
/// Due releases are applied on a fixed interval whether or not any
/// client is watching; manual admin release stays available alongside.
pub fn spawn_release_scheduler(
    game_manager: Arc<GameManager>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Some(clue_index) = game_manager.release_due_clue().await {
                info!("Scheduler released clue {}", clue_index);
            }
        }
    })
}
