use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::game::{GameError, GameState, Power, SyncData};

/// Event types sent from server to client
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    GameError,
    Joined,
    PlayerJoined,
    PlayerConnection,
    VoteReady,
    GameStateChanged,
    DrawnCard,
    NextPlayer,
    CallStop,
    PlayerDroppedCard,
    PlayerDroppedDrawn,
    PlayerSwappedDrawn,
    PlayerViewSelf,
    PlayerViewOther,
    PlayerSwapOther,
    SyncData,
}

/// Metadata for outbound messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Envelope for every server -> client message.
///
/// `sync_data` is filled in per recipient just before sending, so two players
/// receiving the same event see different snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub event: EventType,
    pub payload: Value,
    #[serde(rename = "syncData")]
    pub sync_data: Option<SyncData>,
    pub meta: Option<MessageMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameErrorPayload {
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinedPayload {
    pub index: usize,
    /// Secret used to reclaim the seat after a dropped connection
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexPayload {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConnectionPayload {
    pub player: usize,
    pub connected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteReadyPayload {
    pub player: usize,
    pub state: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateChangedPayload {
    pub state: GameState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyPayload {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedCardPayload {
    pub player: usize,
    pub card: usize,
    pub points: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroppedDrawnPayload {
    pub points: u8,
    pub power: Option<Power>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayload {
    pub card: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCardPayload {
    pub player: usize,
    pub card: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOtherPayload {
    pub own_card: usize,
    pub other_player: usize,
    pub other_card: usize,
}

fn to_payload<T: Serialize>(payload: T) -> Value {
    // Plain structs of numbers and strings always serialize
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

/// Helper functions for creating messages
impl OutboundMessage {
    pub fn new(event: EventType, payload: Value) -> Self {
        Self {
            event,
            payload,
            sync_data: None,
            meta: Some(MessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Stamps the recipient's own view of the game onto the message
    pub fn with_sync_data(mut self, sync_data: SyncData) -> Self {
        self.sync_data = Some(sync_data);
        self
    }

    pub fn game_error(error: &GameError) -> Self {
        let payload = GameErrorPayload {
            message: error.to_string(),
            code: error.code().to_string(),
        };
        Self::new(EventType::GameError, to_payload(payload))
    }

    pub fn joined(index: usize, token: String) -> Self {
        Self::new(EventType::Joined, to_payload(JoinedPayload { index, token }))
    }

    pub fn player_joined(index: usize) -> Self {
        Self::new(EventType::PlayerJoined, to_payload(IndexPayload { index }))
    }

    pub fn player_connection(player: usize, connected: bool) -> Self {
        let payload = PlayerConnectionPayload { player, connected };
        Self::new(EventType::PlayerConnection, to_payload(payload))
    }

    pub fn vote_ready(player: usize, state: bool) -> Self {
        Self::new(
            EventType::VoteReady,
            to_payload(VoteReadyPayload { player, state }),
        )
    }

    pub fn game_state_changed(state: GameState) -> Self {
        Self::new(
            EventType::GameStateChanged,
            to_payload(GameStateChangedPayload { state }),
        )
    }

    /// Announces a draw without revealing the card
    pub fn drawn_card() -> Self {
        Self::new(EventType::DrawnCard, to_payload(EmptyPayload {}))
    }

    pub fn next_player(index: usize) -> Self {
        Self::new(EventType::NextPlayer, to_payload(IndexPayload { index }))
    }

    pub fn call_stop(index: usize) -> Self {
        Self::new(EventType::CallStop, to_payload(IndexPayload { index }))
    }

    pub fn player_dropped_card(player: usize, card: usize, points: u8) -> Self {
        let payload = DroppedCardPayload {
            player,
            card,
            points,
        };
        Self::new(EventType::PlayerDroppedCard, to_payload(payload))
    }

    pub fn player_dropped_drawn(points: u8, power: Option<Power>) -> Self {
        let payload = DroppedDrawnPayload { points, power };
        Self::new(EventType::PlayerDroppedDrawn, to_payload(payload))
    }

    pub fn player_swapped_drawn(card: usize) -> Self {
        Self::new(EventType::PlayerSwappedDrawn, to_payload(CardPayload { card }))
    }

    pub fn player_view_self(card: usize) -> Self {
        Self::new(EventType::PlayerViewSelf, to_payload(CardPayload { card }))
    }

    pub fn player_view_other(player: usize, card: usize) -> Self {
        Self::new(
            EventType::PlayerViewOther,
            to_payload(PlayerCardPayload { player, card }),
        )
    }

    pub fn player_swap_other(own_card: usize, other_player: usize, other_card: usize) -> Self {
        let payload = SwapOtherPayload {
            own_card,
            other_player,
            other_card,
        };
        Self::new(EventType::PlayerSwapOther, to_payload(payload))
    }

    pub fn sync_data() -> Self {
        Self::new(EventType::SyncData, to_payload(EmptyPayload {}))
    }
}
