use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::game_server::GameSummary;
use crate::shared::{AppError, AppState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCreatedResponse {
    pub id: String,
}

/// HTTP handler for creating a new game
///
/// POST /game
/// Returns the id clients pass as `gameID` when joining
#[instrument(name = "create_game", skip(state))]
pub async fn create_game(
    State(state): State<AppState>,
) -> Result<Json<GameCreatedResponse>, AppError> {
    let id = state.game_server.create_game().await;
    info!(game_id = %id, "Game created over HTTP");
    Ok(Json(GameCreatedResponse { id }))
}

/// GET /game/:id
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameSummary>, AppError> {
    state
        .game_server
        .game_summary(&game_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Game {game_id} not found")))
}
