use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Number, Value};
use strum_macros::{AsRefStr, EnumString};

use crate::game::GameError;

/// Largest integer a JSON client can represent exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Raw inbound frame: `{"type": "...", "payload": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub command: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum CommandKind {
    Join,
    Reconnect,
    SyncData,
    VoteReady,
    DrawCard,
    NextPlayer,
    CallStop,
    DropCard,
    DropDrawn,
    SwapDrawn,
    PowerViewSelf,
    PowerViewOther,
    PowerSwapOther,
}

/// An index exactly as the client sent it.
///
/// Type checks happen while parsing; range checks need the collection the
/// index points into, so they wait until the game is locked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawIndex(Number);

impl RawIndex {
    fn checked(self, field: &str) -> Result<Self, GameError> {
        let value = self.0.as_f64().unwrap_or(f64::NAN);
        if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER {
            return Err(GameError::invalid_argument(format!(
                "{field} must be an integer"
            )));
        }
        Ok(self)
    }

    /// Resolves against a collection of `len` items
    pub fn resolve(&self, len: usize) -> Result<usize, GameError> {
        let value = self.0.as_f64().unwrap_or(f64::NAN);
        if value < 0.0 || value >= len as f64 {
            return Err(GameError::IndexOutOfRange);
        }
        Ok(value as usize)
    }
}

impl From<i64> for RawIndex {
    fn from(value: i64) -> Self {
        Self(Number::from(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Join {
        game_id: String,
        username: String,
    },
    Reconnect {
        token: String,
    },
    SyncData,
    VoteReady {
        is_ready: bool,
    },
    DrawCard,
    NextPlayer,
    CallStop,
    DropCard {
        card: RawIndex,
    },
    DropDrawn,
    SwapDrawn {
        card: RawIndex,
    },
    PowerViewSelf {
        card: RawIndex,
    },
    PowerViewOther {
        player: RawIndex,
        card: RawIndex,
    },
    PowerSwapOther {
        own_card: RawIndex,
        other_player: RawIndex,
        other_card: RawIndex,
    },
}

#[derive(Deserialize)]
struct JoinPayload {
    #[serde(rename = "gameID")]
    game_id: String,
    username: String,
}

#[derive(Deserialize)]
struct ReconnectPayload {
    token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteReadyPayload {
    is_ready: bool,
}

#[derive(Deserialize)]
struct CardPayload {
    card: RawIndex,
}

#[derive(Deserialize)]
struct ViewOtherPayload {
    player: RawIndex,
    card: RawIndex,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwapOtherPayload {
    own_card: RawIndex,
    other_player: RawIndex,
    other_card: RawIndex,
}

fn payload<T: DeserializeOwned>(value: Value) -> Result<T, GameError> {
    // serde would happily read a struct out of a JSON array
    if !value.is_object() {
        return Err(GameError::invalid_argument("payload must be an object"));
    }
    serde_json::from_value(value).map_err(|e| GameError::invalid_argument(e.to_string()))
}

impl Command {
    /// Parses a raw text frame
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let message: InboundMessage = serde_json::from_str(text)
            .map_err(|e| GameError::invalid_argument(format!("malformed message: {e}")))?;
        Self::from_message(message)
    }

    pub fn from_message(message: InboundMessage) -> Result<Self, GameError> {
        let kind: CommandKind = message.command.parse().map_err(|_| {
            GameError::invalid_argument(format!("unknown command '{}'", message.command))
        })?;

        let command = match kind {
            CommandKind::Join => {
                let p: JoinPayload = payload(message.payload)?;
                Command::Join {
                    game_id: p.game_id,
                    username: p.username,
                }
            }
            CommandKind::Reconnect => {
                let p: ReconnectPayload = payload(message.payload)?;
                Command::Reconnect { token: p.token }
            }
            CommandKind::VoteReady => {
                let p: VoteReadyPayload = payload(message.payload)?;
                Command::VoteReady {
                    is_ready: p.is_ready,
                }
            }
            CommandKind::DropCard => {
                let p: CardPayload = payload(message.payload)?;
                Command::DropCard {
                    card: p.card.checked("card")?,
                }
            }
            CommandKind::SwapDrawn => {
                let p: CardPayload = payload(message.payload)?;
                Command::SwapDrawn {
                    card: p.card.checked("card")?,
                }
            }
            CommandKind::PowerViewSelf => {
                let p: CardPayload = payload(message.payload)?;
                Command::PowerViewSelf {
                    card: p.card.checked("card")?,
                }
            }
            CommandKind::PowerViewOther => {
                let p: ViewOtherPayload = payload(message.payload)?;
                Command::PowerViewOther {
                    player: p.player.checked("player")?,
                    card: p.card.checked("card")?,
                }
            }
            CommandKind::PowerSwapOther => {
                let p: SwapOtherPayload = payload(message.payload)?;
                Command::PowerSwapOther {
                    own_card: p.own_card.checked("ownCard")?,
                    other_player: p.other_player.checked("otherPlayer")?,
                    other_card: p.other_card.checked("otherCard")?,
                }
            }
            // Payload is ignored for the rest
            CommandKind::SyncData => Command::SyncData,
            CommandKind::DrawCard => Command::DrawCard,
            CommandKind::NextPlayer => Command::NextPlayer,
            CommandKind::CallStop => Command::CallStop,
            CommandKind::DropDrawn => Command::DropDrawn,
        };

        Ok(command)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Join { .. } => CommandKind::Join,
            Command::Reconnect { .. } => CommandKind::Reconnect,
            Command::SyncData => CommandKind::SyncData,
            Command::VoteReady { .. } => CommandKind::VoteReady,
            Command::DrawCard => CommandKind::DrawCard,
            Command::NextPlayer => CommandKind::NextPlayer,
            Command::CallStop => CommandKind::CallStop,
            Command::DropCard { .. } => CommandKind::DropCard,
            Command::DropDrawn => CommandKind::DropDrawn,
            Command::SwapDrawn { .. } => CommandKind::SwapDrawn,
            Command::PowerViewSelf { .. } => CommandKind::PowerViewSelf,
            Command::PowerViewOther { .. } => CommandKind::PowerViewOther,
            Command::PowerSwapOther { .. } => CommandKind::PowerSwapOther,
        }
    }
}
