use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::card::Card;
use super::logic::{Game, GameState, Power};

/// Stable identity of a seated player. Seat indices change every round when the
/// turn order is reshuffled; this id does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    token: String,
    session_id: Option<String>,
    pub(crate) score: i32,
    pub(crate) cards: Vec<Card>,
    pub is_connected: bool,
    pub is_ready: bool,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            id: PlayerId::new(),
            name,
            token: Uuid::new_v4().simple().to_string(),
            session_id: None,
            score: 0,
            cards: Vec::new(),
            is_connected: true,
            is_ready: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Secret handed to the player on join, used to reclaim the seat later
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Session currently bound to this seat
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn bind_session(&mut self, session_id: String) {
        self.session_id = Some(session_id);
        self.is_connected = true;
    }

    /// Keeps the seat but marks it as away until a reconnect
    pub fn unbind_session(&mut self) {
        self.session_id = None;
        self.is_connected = false;
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Sum of the points in hand
    pub fn points(&self) -> i32 {
        self.cards.iter().map(|card| card.points() as i32).sum()
    }

    /// Game state as this player is allowed to see it.
    ///
    /// Card faces stay hidden unless this player has seen them, viewers are
    /// reported by seat index, and a pending drawn card is only shown to the
    /// player whose turn it is.
    pub fn sync_data(&self, game: &Game) -> SyncData {
        let self_index = game.seat_of(self.id);
        let is_turn = game.state() == GameState::InGame
            && self_index.is_some_and(|seat| seat == game.player_turn_index());

        let players = game
            .players()
            .iter()
            .map(|player| PlayerView {
                name: player.name.clone(),
                score: player.score,
                connected: player.is_connected,
                ready: player.is_ready,
                cards: player
                    .cards
                    .iter()
                    .map(|card| self.card_view(card, game))
                    .collect(),
            })
            .collect();

        SyncData {
            id: game.id().to_string(),
            state: game.state(),
            round: game.round(),
            loops: game.loops(),
            self_index,
            players,
            player_turn: game.player_turn_index(),
            player_stop: game.player_stop_index(),
            top_card: game.top_card(),
            powers: game.powers().iter().copied().collect(),
            drawable: game.drawable(),
            droppable: game.droppable(),
            is_drawn: game.drawn().is_some(),
            drawn: if is_turn { game.drawn() } else { None },
        }
    }

    fn card_view(&self, card: &Card, game: &Game) -> CardView {
        let mut seen_by: Vec<usize> = card
            .seen_by()
            .filter_map(|viewer| game.seat_of(viewer))
            .collect();
        seen_by.sort_unstable();

        CardView {
            points: card.is_seen_by(self.id).then(|| card.points()),
            seen_by,
        }
    }
}

/// Per-player redacted snapshot attached to every outbound message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncData {
    pub id: String,
    pub state: GameState,
    pub round: u32,
    pub loops: u32,
    #[serde(rename = "self")]
    pub self_index: Option<usize>,
    pub players: Vec<PlayerView>,
    pub player_turn: usize,
    pub player_stop: Option<usize>,
    pub top_card: u8,
    pub powers: Vec<Power>,
    pub drawable: bool,
    pub droppable: bool,
    pub is_drawn: bool,
    pub drawn: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub score: i32,
    pub connected: bool,
    pub ready: bool,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    /// None unless the requesting player has seen this card
    pub points: Option<u8>,
    pub seen_by: Vec<usize>,
}
