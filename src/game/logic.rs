// A Game is one table of Tamalo. It owns the deck, the seats and all turn and
// round bookkeeping; nothing outside this file moves the deck, the turn
// pointer or the active powers.
//
// Rounds go NOT_STARTED -> IN_GAME -> ROUND_ENDED -> IN_GAME -> ...
// A round ends when play comes back around to the player who called stop.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use uuid::Uuid;

use super::card::Card;
use super::deck::{Deck, DECK_SIZE};
use super::errors::GameError;
use super::player::{Player, PlayerId};
use crate::config::GameRules;

/// Cards dealt to each player per round
pub const HAND_SIZE: usize = 4;
/// Dealt cards the owner gets to look at
pub const INITIALLY_SEEN: usize = 2;
/// Most seats a single deck can deal, keeping one card for the discard pile
pub const MAX_SEATS: usize = (DECK_SIZE - 1) / HAND_SIZE;

const STOP_BONUS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[serde(rename = "not-started")]
    NotStarted,
    #[serde(rename = "in-game")]
    InGame,
    #[serde(rename = "round-end")]
    RoundEnded,
}

/// One-shot abilities available to the current player
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum Power {
    ViewSelf,
    ViewOther,
    SwapOther,
}

impl Power {
    /// Power unlocked by discarding a freshly drawn card of this value
    pub fn granted_by(points: u8) -> Option<Power> {
        match points {
            7 | 8 => Some(Power::ViewSelf),
            9 | 10 => Some(Power::ViewOther),
            11 | 12 => Some(Power::SwapOther),
            _ => None,
        }
    }
}

/// Where play went after a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    /// Seat index of the new current player
    NextTurn(usize),
    /// Play reached the stop caller and the round was scored
    RoundEnded,
}

#[derive(Debug, Clone)]
pub struct Game {
    id: String,
    rules: GameRules,
    state: GameState,
    round: u32,
    loops: u32,
    players: Vec<Player>, // Seat order is turn order
    deck: Deck,
    top_card: u8,
    player_turn_index: usize,
    player_stop_index: Option<usize>,
    powers: BTreeSet<Power>,
    drawable: bool,
    drawn: Option<u8>,
    droppable: bool,
    rng: StdRng,
    last_activity: Instant,
}

impl Game {
    pub fn new(rules: GameRules) -> Self {
        Self::from_rng(rules, StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic shuffles, for tests and replays
    pub fn with_seed(rules: GameRules, seed: u64) -> Self {
        Self::from_rng(rules, StdRng::seed_from_u64(seed))
    }

    fn from_rng(rules: GameRules, rng: StdRng) -> Self {
        let mut game = Self {
            id: Uuid::new_v4().simple().to_string(),
            rules,
            state: GameState::RoundEnded,
            round: 0,
            loops: 0,
            players: Vec::new(),
            deck: Deck::standard(),
            top_card: 0,
            player_turn_index: 0,
            player_stop_index: None,
            powers: BTreeSet::new(),
            drawable: true,
            drawn: None,
            droppable: true,
            rng,
            last_activity: Instant::now(),
        };

        // Reuse the round reset to lay out the deck and discard pile
        game.reset_round();
        game.round = 0;
        game.state = GameState::NotStarted;
        game
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    /// Connection and readiness flags only; hands and scores belong to the game
    pub fn player_mut(&mut self, seat: usize) -> Option<&mut Player> {
        self.players.get_mut(seat)
    }

    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == player)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn top_card(&self) -> u8 {
        self.top_card
    }

    pub fn player_turn_index(&self) -> usize {
        self.player_turn_index
    }

    pub fn player_stop_index(&self) -> Option<usize> {
        self.player_stop_index
    }

    pub fn player_turn(&self) -> Option<&Player> {
        self.players.get(self.player_turn_index)
    }

    pub fn powers(&self) -> &BTreeSet<Power> {
        &self.powers
    }

    pub fn drawable(&self) -> bool {
        self.drawable
    }

    pub fn drawn(&self) -> Option<u8> {
        self.drawn
    }

    pub fn droppable(&self) -> bool {
        self.droppable
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    pub fn require_state(&self, expected: GameState) -> Result<(), GameError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GameError::WrongState)
        }
    }

    /// Returns the player's seat
    pub fn require_joined(&self, player: PlayerId) -> Result<usize, GameError> {
        self.seat_of(player).ok_or(GameError::NotJoined)
    }

    /// Returns the player's seat if it is their turn in a running round
    pub fn require_turn(&self, player: PlayerId) -> Result<usize, GameError> {
        self.require_state(GameState::InGame)?;
        let seat = self.require_joined(player)?;
        if seat == self.player_turn_index {
            Ok(seat)
        } else {
            Err(GameError::NotYourTurn)
        }
    }

    pub fn require_power(&self, power: Power) -> Result<(), GameError> {
        if self.powers.contains(&power) {
            Ok(())
        } else {
            Err(GameError::PowerNotAvailable)
        }
    }

    /// Seats a new player and returns their seat index
    pub fn add_player(&mut self, name: String) -> Result<usize, GameError> {
        if self.state != GameState::NotStarted
            || self.players.len() >= self.rules.max_players.min(MAX_SEATS)
        {
            return Err(GameError::GameNotJoinable);
        }

        self.players.push(Player::new(name));
        Ok(self.players.len() - 1)
    }

    pub fn everyone_ready(&self) -> bool {
        self.players.len() >= self.rules.min_players.max(1)
            && self.players.iter().all(|p| p.is_ready)
    }

    /// Deals the first round
    pub fn start(&mut self) -> Result<(), GameError> {
        self.require_state(GameState::NotStarted)?;
        if self.players.is_empty() {
            return Err(GameError::illegal("Nobody has joined this game"));
        }
        self.reset_round();
        Ok(())
    }

    pub fn next_round(&mut self) -> Result<(), GameError> {
        self.require_state(GameState::RoundEnded)?;
        self.reset_round();
        Ok(())
    }

    fn reset_round(&mut self) {
        self.deck = Deck::standard();
        self.deck.shuffle(&mut self.rng);
        self.players.shuffle(&mut self.rng);

        self.round += 1;
        self.loops = 0;
        self.droppable = true;
        // A fresh deck always has a card for the discard pile
        self.top_card = self.deck.draw(&mut self.rng).unwrap_or_default();
        self.player_turn_index = 0;
        self.player_stop_index = None;
        self.powers.clear();
        self.drawable = true;
        self.drawn = None;

        // Seats are capped at MAX_SEATS, so every hand is dealt in full
        for player in self.players.iter_mut() {
            let owner = player.id();
            player.cards = (0..HAND_SIZE)
                .filter_map(|_| self.deck.draw(&mut self.rng))
                .map(Card::new)
                .collect();
            for card in player.cards.iter_mut().take(INITIALLY_SEEN) {
                card.reveal_to(owner);
            }
            player.is_ready = false;
        }

        self.state = GameState::InGame;
    }

    /// Takes the next card off the deck for the current player
    pub fn draw_card(&mut self) -> Result<u8, GameError> {
        self.require_state(GameState::InGame)?;
        if !self.drawable {
            return Err(GameError::illegal("Cannot draw anymore"));
        }

        let points = self
            .deck
            .draw(&mut self.rng)
            .ok_or_else(|| GameError::illegal("The deck is empty"))?;
        self.drawn = Some(points);
        self.drawable = false;
        Ok(points)
    }

    /// Moves the current discard into the deck and puts `points` on top
    pub fn push_card(&mut self, points: u8) {
        self.deck.push(self.top_card);
        self.top_card = points;
    }

    /// Discards a card from any seat's hand onto the pile
    pub fn drop_card(&mut self, seat: usize, card: usize) -> Result<u8, GameError> {
        self.require_state(GameState::InGame)?;
        if !self.droppable {
            return Err(GameError::illegal("Cannot drop cards at this time"));
        }
        let player = self
            .players
            .get_mut(seat)
            .ok_or(GameError::IndexOutOfRange)?;
        if card >= player.cards.len() {
            return Err(GameError::IndexOutOfRange);
        }

        let points = player.cards.remove(card).points();
        self.push_card(points);
        self.droppable = false;
        Ok(points)
    }

    /// Discards the drawn card, unlocking the power it carries
    pub fn drop_drawn(&mut self) -> Result<(u8, Option<Power>), GameError> {
        self.require_state(GameState::InGame)?;
        let points = self
            .drawn
            .take()
            .ok_or_else(|| GameError::illegal("No card drawn"))?;

        self.push_card(points);
        self.droppable = true;
        let power = Power::granted_by(points);
        self.powers.extend(power);
        Ok((points, power))
    }

    /// Keeps the drawn card in place of a hand card, discarding the latter.
    /// Returns the discarded value.
    pub fn swap_drawn(&mut self, card: usize) -> Result<u8, GameError> {
        self.require_state(GameState::InGame)?;
        let points = self
            .drawn
            .ok_or_else(|| GameError::illegal("No card drawn"))?;
        let player = self
            .players
            .get_mut(self.player_turn_index)
            .ok_or(GameError::IndexOutOfRange)?;
        if card >= player.cards.len() {
            return Err(GameError::IndexOutOfRange);
        }

        let mut kept = Card::new(points);
        kept.reveal_to(player.id());
        let discarded = std::mem::replace(&mut player.cards[card], kept).points();

        self.drawn = None;
        self.push_card(discarded);
        self.droppable = true;
        Ok(discarded)
    }

    /// Current player looks at one of their own cards
    pub fn view_own_card(&mut self, card: usize) -> Result<(), GameError> {
        self.require_state(GameState::InGame)?;
        self.require_power(Power::ViewSelf)?;
        let player = self
            .players
            .get_mut(self.player_turn_index)
            .ok_or(GameError::IndexOutOfRange)?;
        let viewer = player.id();
        let target = player
            .cards
            .get_mut(card)
            .ok_or(GameError::IndexOutOfRange)?;

        if !target.reveal_to(viewer) {
            return Err(GameError::AlreadySeen);
        }
        self.powers.remove(&Power::ViewSelf);
        Ok(())
    }

    /// Current player looks at a card in another seat's hand
    pub fn view_other_card(&mut self, other: usize, card: usize) -> Result<(), GameError> {
        self.require_state(GameState::InGame)?;
        self.require_power(Power::ViewOther)?;
        let viewer = self.current_player_id()?;
        self.require_other_seat(other)?;

        let target = self.players[other]
            .cards
            .get_mut(card)
            .ok_or(GameError::IndexOutOfRange)?;
        if !target.reveal_to(viewer) {
            return Err(GameError::AlreadySeen);
        }
        self.powers.remove(&Power::ViewOther);
        Ok(())
    }

    /// Current player exchanges one of their cards with another seat's card.
    /// Cards keep their viewers as they change hands.
    pub fn swap_with_other(
        &mut self,
        own_card: usize,
        other: usize,
        other_card: usize,
    ) -> Result<(), GameError> {
        self.require_state(GameState::InGame)?;
        self.require_power(Power::SwapOther)?;
        self.current_player_id()?;
        self.require_other_seat(other)?;

        let turn = self.player_turn_index;
        if own_card >= self.players[turn].cards.len()
            || other_card >= self.players[other].cards.len()
        {
            return Err(GameError::IndexOutOfRange);
        }

        let (low, high) = self.players.split_at_mut(turn.max(other));
        let (own, theirs) = if turn < other {
            (&mut low[turn], &mut high[0])
        } else {
            (&mut high[0], &mut low[other])
        };
        std::mem::swap(&mut own.cards[own_card], &mut theirs.cards[other_card]);

        self.powers.remove(&Power::SwapOther);
        Ok(())
    }

    /// Current player calls stop before drawing; their turn ends immediately
    pub fn call_stop(&mut self) -> Result<TurnAdvance, GameError> {
        self.require_state(GameState::InGame)?;
        if self.player_stop_index.is_some() {
            return Err(GameError::illegal("Stop has already been called"));
        }
        if self.loops < self.rules.stop_min_loops {
            return Err(GameError::illegal("Cannot call stop yet"));
        }
        if !self.drawable || self.drawn.is_some() {
            return Err(GameError::illegal("Cannot call stop after drawing"));
        }

        self.player_stop_index = Some(self.player_turn_index);
        self.next_player()
    }

    /// Ends the current turn. Scores the round if play reaches the stop caller.
    pub fn next_player(&mut self) -> Result<TurnAdvance, GameError> {
        self.require_state(GameState::InGame)?;
        if self.players.is_empty() {
            return Err(GameError::illegal("Nobody is seated"));
        }

        self.powers.clear();
        self.drawable = true;
        self.drawn = None;
        self.player_turn_index = (self.player_turn_index + 1) % self.players.len();
        if self.player_turn_index == 0 {
            self.loops += 1;
        }

        match self.player_stop_index {
            Some(stop) if stop == self.player_turn_index => {
                self.state = GameState::RoundEnded;
                self.score_round(stop);
                Ok(TurnAdvance::RoundEnded)
            }
            _ => Ok(TurnAdvance::NextTurn(self.player_turn_index)),
        }
    }

    /// The stop caller wins only if every other hand is strictly higher
    fn score_round(&mut self, stop: usize) {
        let stop_total = self.players[stop].points();
        let mut stop_won = true;

        for (seat, player) in self.players.iter_mut().enumerate() {
            if seat == stop {
                continue;
            }
            let total = player.points();
            if total <= stop_total {
                stop_won = false;
            }
            player.score -= total;
        }

        let stop_player = &mut self.players[stop];
        if stop_won {
            stop_player.score += STOP_BONUS;
        } else {
            stop_player.score -= STOP_BONUS + stop_total;
        }
    }

    fn current_player_id(&self) -> Result<PlayerId, GameError> {
        self.player_turn()
            .map(Player::id)
            .ok_or(GameError::IndexOutOfRange)
    }

    fn require_other_seat(&self, other: usize) -> Result<(), GameError> {
        if other >= self.players.len() {
            return Err(GameError::IndexOutOfRange);
        }
        if other == self.player_turn_index {
            return Err(GameError::illegal("Choose another player's card"));
        }
        Ok(())
    }
}
