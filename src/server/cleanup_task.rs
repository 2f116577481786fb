use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, instrument};

use super::game_server::GameServer;
use crate::config::CleanupConfig;

/// Starts the background task that periodically removes idle games
#[instrument(skip(game_server))]
pub async fn start_cleanup_task(game_server: Arc<GameServer>, config: CleanupConfig) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        idle_threshold_secs = config.idle_threshold.as_secs(),
        "Starting game cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);

    loop {
        cleanup_interval.tick().await;

        info!("Running game cleanup task");
        let removed = cleanup_idle_games(&game_server, config.idle_threshold).await;
        info!(removed_count = removed, "Game cleanup completed");
    }
}

/// Removes games idle for longer than the threshold, returning how many went
#[instrument(skip(game_server))]
pub async fn cleanup_idle_games(game_server: &GameServer, idle_threshold: Duration) -> usize {
    let removed = game_server.remove_idle_games(idle_threshold).await;

    if removed.is_empty() {
        info!("No idle games to clean up");
        return 0;
    }

    for game_id in &removed {
        info!(game_id = %game_id, "Deleted idle game");
    }
    removed.len()
}
