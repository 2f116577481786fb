// Library crate for the Tamalo game server
// This file exposes the public API for integration tests

pub mod config;
pub mod game;
pub mod server;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::{CleanupConfig, GameRules, ServerConfig};
pub use game::{Game, GameError, GameState, Power, SyncData};
pub use server::{Command, GameServer};
pub use shared::{AppError, AppState};
pub use websockets::{ConnectionManager, EventType, InMemoryConnectionManager, OutboundMessage};
