pub mod cleanup_task;
pub mod commands;
pub mod game_server;
pub mod guards;
pub mod handlers;
pub mod validator;

pub use cleanup_task::start_cleanup_task;
pub use commands::{Command, CommandKind, InboundMessage, RawIndex};
pub use game_server::{GameServer, GameSummary};
pub use validator::{PatternUsernameValidator, UsernameValidator};
