use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tamalo::server::{handlers, start_cleanup_task, GameServer, PatternUsernameValidator};
use tamalo::websockets::{websocket_handler, ConnectionManager, InMemoryConnectionManager};
use tamalo::{AppState, ServerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tamalo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tamalo game server");

    let config = ServerConfig::from_env();
    info!(
        max_players = config.rules.max_players,
        min_players = config.rules.min_players,
        stop_min_loops = config.rules.stop_min_loops,
        "Loaded game rules"
    );

    let connection_manager: Arc<dyn ConnectionManager> = Arc::new(InMemoryConnectionManager::new());
    let game_server = Arc::new(
        GameServer::new(config.rules, Arc::clone(&connection_manager))
            .with_username_validator(Arc::new(PatternUsernameValidator::default())),
    );

    tokio::spawn(start_cleanup_task(
        Arc::clone(&game_server),
        config.cleanup.clone(),
    ));

    let app_state = AppState::new(game_server, connection_manager);

    let app = Router::new()
        .route("/", get(|| async { "Tamalo" }))
        .route("/game", post(handlers::create_game))
        .route("/game/:id", get(handlers::get_game))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        // Browser clients are served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Server running");
    axum::serve(listener, app).await
}
