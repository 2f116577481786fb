use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::server::GameServer;
use crate::shared::AppState;

use super::socket::{Connection, MessageHandler};

/// Forwards inbound frames to the game server
pub struct GameMessageHandler {
    game_server: Arc<GameServer>,
}

impl GameMessageHandler {
    pub fn new(game_server: Arc<GameServer>) -> Self {
        Self { game_server }
    }
}

#[async_trait]
impl MessageHandler for GameMessageHandler {
    async fn handle_message(&self, session_id: &str, message: String) {
        debug!(
            session_id = %session_id,
            message = %message,
            "Received message"
        );
        self.game_server.handle_message(session_id, &message).await;
    }
}

/// GET /ws
///
/// Every upgrade gets a fresh session id. A session speaks for nobody until
/// it sends `join` or `reconnect`.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    let session_id = Uuid::new_v4().to_string();
    info!(session_id = %session_id, "WebSocket connection requested");

    ws.on_upgrade(move |socket| handle_websocket_connection(socket, session_id, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    session_id: String,
    app_state: AppState,
) {
    info!(session_id = %session_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();
    app_state
        .connection_manager
        .add_connection(session_id.clone(), outbound_sender)
        .await;

    let message_handler = Arc::new(GameMessageHandler::new(Arc::clone(&app_state.game_server)));
    let connection = Connection::new(
        session_id.clone(),
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    match connection.run().await {
        Ok(()) => {
            info!(session_id = %session_id, "WebSocket connection closed cleanly");
        }
        Err(e) => {
            warn!(session_id = %session_id, error = ?e, "WebSocket connection error");
        }
    }

    // Cleanup: stop delivery, then mark the seat as away
    app_state
        .connection_manager
        .remove_connection(&session_id)
        .await;
    app_state.game_server.disconnect(&session_id).await;
}
