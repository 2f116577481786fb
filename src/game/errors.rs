use thiserror::Error;

/// Recoverable, user-attributable failures raised while handling a command.
///
/// These never mutate state: every check runs before the mutation it guards.
/// The dispatcher reports them back to the offending session only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Wrong game state")]
    WrongState,
    #[error("Not joined game")]
    NotJoined,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Power not available")]
    PowerNotAvailable,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Index out of range")]
    IndexOutOfRange,
    #[error("No such game")]
    NoSuchGame,
    #[error("Cannot join game at this time")]
    GameNotJoinable,
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Already seen this card")]
    AlreadySeen,
    #[error("{0}")]
    IllegalAction(String),
}

impl GameError {
    /// Stable code sent alongside the message in `gameError` events
    pub fn code(&self) -> &'static str {
        match self {
            GameError::WrongState => "wrongState",
            GameError::NotJoined => "notJoined",
            GameError::NotYourTurn => "notYourTurn",
            GameError::PowerNotAvailable => "powerNotAvailable",
            GameError::InvalidArgument(_) => "invalidArgument",
            GameError::IndexOutOfRange => "indexOutOfRange",
            GameError::NoSuchGame => "noSuchGame",
            GameError::GameNotJoinable => "gameNotJoinable",
            GameError::InvalidUsername => "invalidUsername",
            GameError::AlreadySeen => "alreadySeen",
            GameError::IllegalAction(_) => "illegalAction",
        }
    }

    pub fn illegal(message: impl Into<String>) -> Self {
        GameError::IllegalAction(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        GameError::InvalidArgument(message.into())
    }
}
