pub mod connection_manager;
pub mod handler;
pub mod messages;
pub mod socket;

pub use connection_manager::{ConnectionManager, InMemoryConnectionManager};
pub use handler::{websocket_handler, GameMessageHandler};
pub use messages::{EventType, MessageMeta, OutboundMessage};
pub use socket::{Connection, MessageHandler, SocketError, SocketWrapper};
