#![allow(dead_code)]

use std::sync::Arc;

use tamalo::{
    game::{Game, GameState},
    server::{GameServer, PatternUsernameValidator},
    GameRules,
};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub game_server: Arc<GameServer>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub game_id: String,
    /// Player names in join order
    pub players: Vec<String>,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    rules: GameRules,
    seed: u64,
    start: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            rules: GameRules::default(),
            seed: 42,
            start: false,
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "charlie"])
    }

    pub fn with_rules(mut self, rules: GameRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Have every player vote ready so the first round is dealt
    pub fn started(mut self) -> Self {
        self.start = true;
        self
    }

    pub async fn build(self) -> TestSetup {
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let game_server = Arc::new(
            GameServer::new(self.rules, mock_conn_manager.clone())
                .with_username_validator(Arc::new(PatternUsernameValidator::default())),
        );
        let game_id = game_server
            .insert_game(Game::with_seed(self.rules, self.seed))
            .await;

        let setup = TestSetup {
            game_server,
            mock_conn_manager,
            game_id,
            players: self.players,
        };

        for player in &setup.players {
            setup.join(player, player).await;
        }
        if self.start {
            for player in &setup.players {
                setup.vote_ready(player, true).await;
            }
            assert_eq!(setup.snapshot().await.state(), GameState::InGame);
        }

        setup.clear_messages().await;
        setup
    }
}

impl TestSetup {
    /// Every player in these tests uses a session named after them
    pub fn session(&self, player: &str) -> String {
        format!("session-{player}")
    }

    pub async fn snapshot(&self) -> Game {
        self.game_server
            .game_snapshot(&self.game_id)
            .await
            .expect("game should exist")
    }

    pub async fn seat_of(&self, player: &str) -> usize {
        let game = self.snapshot().await;
        game.players()
            .iter()
            .position(|p| p.name() == player)
            .unwrap_or_else(|| panic!("{player} is not seated"))
    }

    /// Name of the player whose turn it is
    pub async fn current_player(&self) -> String {
        let game = self.snapshot().await;
        game.player_turn().expect("someone has the turn").name().to_string()
    }

    /// Name of the player seated at `seat`
    pub async fn player_at(&self, seat: usize) -> String {
        let game = self.snapshot().await;
        game.players()[seat].name().to_string()
    }
}
