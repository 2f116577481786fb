use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument};

use crate::config::GameRules;
use crate::game::{Game, GameError, GameState, PlayerId, SyncData, TurnAdvance};
use crate::websockets::{ConnectionManager, OutboundMessage};

use super::commands::Command;
use super::guards::{admit, guards_for};
use super::validator::UsernameValidator;

/// Which seat a session or a reconnect token speaks for
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlayerHandle {
    game_id: String,
    player: PlayerId,
}

/// Public facts about a hosted game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub id: String,
    pub state: GameState,
    pub player_count: usize,
}

/// Hosts games and routes session commands to them.
///
/// Every command runs under its game's lock from the first guard to the last
/// broadcast, so all players observe events in one order. Registry locks are
/// never held while waiting for a game lock.
pub struct GameServer {
    rules: GameRules,
    games: RwLock<HashMap<String, Arc<Mutex<Game>>>>,
    sessions: RwLock<HashMap<String, PlayerHandle>>,
    tokens: RwLock<HashMap<String, PlayerHandle>>,
    connection_manager: Arc<dyn ConnectionManager>,
    username_validator: Option<Arc<dyn UsernameValidator>>,
}

impl GameServer {
    pub fn new(rules: GameRules, connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            rules,
            games: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            tokens: RwLock::new(HashMap::new()),
            connection_manager,
            username_validator: None,
        }
    }

    pub fn with_username_validator(mut self, validator: Arc<dyn UsernameValidator>) -> Self {
        self.username_validator = Some(validator);
        self
    }

    #[instrument(skip(self))]
    pub async fn create_game(&self) -> String {
        self.insert_game(Game::new(self.rules)).await
    }

    /// Hosts an already built game, e.g. one with a seeded shuffle
    pub async fn insert_game(&self, game: Game) -> String {
        let id = game.id().to_string();
        self.games
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(game)));
        info!(game_id = %id, "Game created");
        id
    }

    async fn game_handle(&self, game_id: &str) -> Option<Arc<Mutex<Game>>> {
        self.games.read().await.get(game_id).cloned()
    }

    pub async fn game_summary(&self, game_id: &str) -> Option<GameSummary> {
        let game = self.game_handle(game_id).await?;
        let game = game.lock().await;
        Some(GameSummary {
            id: game.id().to_string(),
            state: game.state(),
            player_count: game.players().len(),
        })
    }

    /// Copy of a game's full, unredacted state
    pub async fn game_snapshot(&self, game_id: &str) -> Option<Game> {
        let game = self.game_handle(game_id).await?;
        let snapshot = game.lock().await.clone();
        Some(snapshot)
    }

    pub async fn game_count(&self) -> usize {
        self.games.read().await.len()
    }

    /// Game id and current seat of the player bound to a session
    pub async fn seat_of_session(&self, session_id: &str) -> Option<(String, usize)> {
        let handle = self.sessions.read().await.get(session_id).cloned()?;
        let game = self.game_handle(&handle.game_id).await?;
        let seat = game.lock().await.seat_of(handle.player)?;
        Some((handle.game_id, seat))
    }

    /// Entry point for raw text frames from a transport session
    pub async fn handle_message(&self, session_id: &str, text: &str) {
        match Command::parse(text) {
            Ok(command) => self.dispatch(session_id, command).await,
            Err(e) => {
                debug!(session_id = %session_id, error = %e, "Rejected inbound message");
                self.report_error(session_id, &e).await;
            }
        }
    }

    /// Runs a command, reporting any game error back to the sender only
    pub async fn dispatch(&self, session_id: &str, command: Command) {
        let kind = command.kind();
        if let Err(e) = self.execute(session_id, command).await {
            debug!(
                session_id = %session_id,
                command = kind.as_ref(),
                error = %e,
                "Command rejected"
            );
            self.report_error(session_id, &e).await;
        }
    }

    /// Runs a command and returns its outcome instead of reporting it
    pub async fn execute(&self, session_id: &str, command: Command) -> Result<(), GameError> {
        match command {
            Command::Join { game_id, username } => self.join(session_id, &game_id, username).await,
            Command::Reconnect { token } => self.reconnect(session_id, &token).await,
            command => {
                let handle = self
                    .sessions
                    .read()
                    .await
                    .get(session_id)
                    .cloned()
                    .ok_or(GameError::NotJoined)?;
                let game = self
                    .game_handle(&handle.game_id)
                    .await
                    .ok_or(GameError::NoSuchGame)?;

                let mut game = game.lock().await;
                game.touch();
                let seat = admit(&game, handle.player, guards_for(command.kind()))?;
                self.apply(&mut game, seat, command).await
            }
        }
    }

    /// Performs an admitted command. Argument checks all run before the
    /// first mutation.
    async fn apply(&self, game: &mut Game, seat: usize, command: Command) -> Result<(), GameError> {
        match command {
            Command::SyncData => {
                self.send_to_seat(game, seat, OutboundMessage::sync_data())
                    .await;
            }
            Command::VoteReady { is_ready } => {
                if let Some(player) = game.player_mut(seat) {
                    player.is_ready = is_ready;
                }
                self.broadcast(game, OutboundMessage::vote_ready(seat, is_ready))
                    .await;

                if game.everyone_ready() {
                    match game.state() {
                        GameState::NotStarted => game.start()?,
                        _ => game.next_round()?,
                    }
                    info!(game_id = %game.id(), round = game.round(), "Round started");
                    self.broadcast(game, OutboundMessage::game_state_changed(game.state()))
                        .await;
                }
            }
            Command::DrawCard => {
                if !game.drawable() || game.drawn().is_some() {
                    return Err(GameError::illegal("Cannot draw anymore"));
                }
                game.draw_card()?;
                self.broadcast(game, OutboundMessage::drawn_card()).await;
            }
            Command::NextPlayer => {
                if game.drawable() || game.drawn().is_some() {
                    return Err(GameError::illegal("Finish your turn first"));
                }
                let advance = game.next_player()?;
                self.announce_advance(game, advance).await;
            }
            Command::CallStop => {
                let advance = game.call_stop()?;
                info!(game_id = %game.id(), seat, "Stop called");
                self.broadcast(game, OutboundMessage::call_stop(seat)).await;
                self.announce_advance(game, advance).await;
            }
            Command::DropCard { card } => {
                let card = card.resolve(hand_len(game, seat))?;
                let points = game.drop_card(seat, card)?;
                self.broadcast(game, OutboundMessage::player_dropped_card(seat, card, points))
                    .await;
            }
            Command::DropDrawn => {
                let (points, power) = game.drop_drawn()?;
                self.broadcast(game, OutboundMessage::player_dropped_drawn(points, power))
                    .await;
            }
            Command::SwapDrawn { card } => {
                let card = card.resolve(hand_len(game, seat))?;
                game.swap_drawn(card)?;
                self.broadcast(game, OutboundMessage::player_swapped_drawn(card))
                    .await;
            }
            Command::PowerViewSelf { card } => {
                let card = card.resolve(hand_len(game, seat))?;
                game.view_own_card(card)?;
                self.broadcast(game, OutboundMessage::player_view_self(card))
                    .await;
            }
            Command::PowerViewOther { player, card } => {
                let other = player.resolve(game.players().len())?;
                let card = card.resolve(hand_len(game, other))?;
                game.view_other_card(other, card)?;
                self.broadcast(game, OutboundMessage::player_view_other(other, card))
                    .await;
            }
            Command::PowerSwapOther {
                own_card,
                other_player,
                other_card,
            } => {
                let own_card = own_card.resolve(hand_len(game, seat))?;
                let other = other_player.resolve(game.players().len())?;
                let other_card = other_card.resolve(hand_len(game, other))?;
                game.swap_with_other(own_card, other, other_card)?;
                self.broadcast(
                    game,
                    OutboundMessage::player_swap_other(own_card, other, other_card),
                )
                .await;
            }
            Command::Join { .. } | Command::Reconnect { .. } => {
                return Err(GameError::illegal("Already joined a game"));
            }
        }
        Ok(())
    }

    async fn announce_advance(&self, game: &Game, advance: TurnAdvance) {
        match advance {
            TurnAdvance::NextTurn(index) => {
                self.broadcast(game, OutboundMessage::next_player(index))
                    .await
            }
            TurnAdvance::RoundEnded => {
                info!(game_id = %game.id(), round = game.round(), "Round ended");
                self.broadcast(game, OutboundMessage::game_state_changed(game.state()))
                    .await
            }
        }
    }

    #[instrument(skip(self, username))]
    async fn join(&self, session_id: &str, game_id: &str, username: String) -> Result<(), GameError> {
        let game = self
            .game_handle(game_id)
            .await
            .ok_or(GameError::NoSuchGame)?;
        let mut game = game.lock().await;

        if game.state() != GameState::NotStarted {
            return Err(GameError::GameNotJoinable);
        }
        if let Some(validator) = &self.username_validator {
            if !validator.validate(&username) {
                return Err(GameError::InvalidUsername);
            }
        }
        if self.sessions.read().await.contains_key(session_id) {
            return Err(GameError::illegal("Already joined a game"));
        }

        let seat = game.add_player(username)?;
        let (player, token) = match game.player_mut(seat) {
            Some(player) => {
                player.bind_session(session_id.to_string());
                (player.id(), player.token().to_string())
            }
            None => return Err(GameError::IndexOutOfRange),
        };

        let handle = PlayerHandle {
            game_id: game_id.to_string(),
            player,
        };
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), handle.clone());
        self.tokens.write().await.insert(token.clone(), handle);
        game.touch();

        info!(game_id = %game_id, session_id = %session_id, seat, "Player joined");
        self.send_to_seat(&game, seat, OutboundMessage::joined(seat, token))
            .await;
        self.broadcast(&game, OutboundMessage::player_joined(seat))
            .await;
        Ok(())
    }

    /// Rebinds a seat to a new session using the token handed out on join
    #[instrument(skip(self, token))]
    async fn reconnect(&self, session_id: &str, token: &str) -> Result<(), GameError> {
        let handle = self
            .tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(GameError::NotJoined)?;
        let bound = self.sessions.read().await.get(session_id).cloned();
        if bound.is_some_and(|current| current != handle) {
            return Err(GameError::illegal("Already joined a game"));
        }

        let game = self
            .game_handle(&handle.game_id)
            .await
            .ok_or(GameError::NoSuchGame)?;
        let mut game = game.lock().await;
        let seat = game.require_joined(handle.player)?;

        let previous = game
            .player(seat)
            .and_then(|player| player.session_id())
            .map(str::to_string);
        if let Some(player) = game.player_mut(seat) {
            player.bind_session(session_id.to_string());
        }
        {
            let mut sessions = self.sessions.write().await;
            if let Some(previous) = previous.filter(|previous| previous != session_id) {
                sessions.remove(&previous);
            }
            sessions.insert(session_id.to_string(), handle);
        }
        game.touch();

        info!(game_id = %game.id(), session_id = %session_id, seat, "Player reconnected");
        self.broadcast(&game, OutboundMessage::player_connection(seat, true))
            .await;
        Ok(())
    }

    /// Called when a transport session closes. The seat is kept.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, session_id: &str) {
        let Some(handle) = self.sessions.write().await.remove(session_id) else {
            return;
        };
        let Some(game) = self.game_handle(&handle.game_id).await else {
            return;
        };

        let mut game = game.lock().await;
        let Some(seat) = game.seat_of(handle.player) else {
            return;
        };
        if let Some(player) = game.player_mut(seat) {
            player.unbind_session();
        }

        info!(game_id = %game.id(), seat, "Player disconnected");
        self.broadcast(&game, OutboundMessage::player_connection(seat, false))
            .await;
    }

    /// Drops a game along with every session and token bound to it
    pub async fn remove_game(&self, game_id: &str) -> bool {
        let removed = self.games.write().await.remove(game_id).is_some();
        if removed {
            self.sessions
                .write()
                .await
                .retain(|_, handle| handle.game_id != game_id);
            self.tokens
                .write()
                .await
                .retain(|_, handle| handle.game_id != game_id);
        }
        removed
    }

    /// Removes games with no activity for at least `threshold` and returns
    /// their ids
    pub async fn remove_idle_games(&self, threshold: Duration) -> Vec<String> {
        let games: Vec<(String, Arc<Mutex<Game>>)> = self
            .games
            .read()
            .await
            .iter()
            .map(|(id, game)| (id.clone(), Arc::clone(game)))
            .collect();

        let mut idle = Vec::new();
        for (id, game) in games {
            if game.lock().await.idle_for() >= threshold {
                idle.push(id);
            }
        }

        for id in &idle {
            self.remove_game(id).await;
        }
        idle
    }

    async fn report_error(&self, session_id: &str, error: &GameError) {
        let mut message = OutboundMessage::game_error(error);
        if let Some(sync_data) = self.sync_data_for_session(session_id).await {
            message = message.with_sync_data(sync_data);
        }
        self.send(session_id, &message).await;
    }

    async fn sync_data_for_session(&self, session_id: &str) -> Option<SyncData> {
        let handle = self.sessions.read().await.get(session_id).cloned()?;
        let game = self.game_handle(&handle.game_id).await?;
        let game = game.lock().await;
        let seat = game.seat_of(handle.player)?;
        game.player(seat).map(|player| player.sync_data(&game))
    }

    /// Sends to every connected seat, each with its own sync data
    async fn broadcast(&self, game: &Game, message: OutboundMessage) {
        for player in game.players() {
            if let Some(session_id) = player.session_id() {
                let personal = message.clone().with_sync_data(player.sync_data(game));
                self.send(session_id, &personal).await;
            }
        }
    }

    async fn send_to_seat(&self, game: &Game, seat: usize, message: OutboundMessage) {
        let Some(player) = game.player(seat) else {
            return;
        };
        if let Some(session_id) = player.session_id() {
            let message = message.with_sync_data(player.sync_data(game));
            self.send(session_id, &message).await;
        }
    }

    async fn send(&self, session_id: &str, message: &OutboundMessage) {
        match serde_json::to_string(message) {
            Ok(json) => {
                if !self
                    .connection_manager
                    .send_to_session(session_id, &json)
                    .await
                {
                    debug!(session_id = %session_id, "Session has no live socket, message dropped");
                }
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to serialize message");
            }
        }
    }
}

fn hand_len(game: &Game, seat: usize) -> usize {
    game.player(seat).map_or(0, |player| player.cards().len())
}
