#![allow(dead_code)]

use serde_json::{json, Value};

use tamalo::game::{GameState, Power};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a raw frame from a player's session
    pub async fn send_raw(&self, player: &str, text: &str) {
        self.game_server
            .handle_message(&self.session(player), text)
            .await;
    }

    /// Send a command with a payload
    pub async fn send(&self, player: &str, command: &str, payload: Value) {
        let frame = json!({ "type": command, "payload": payload }).to_string();
        self.send_raw(player, &frame).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn join(&self, player: &str, username: &str) {
        self.send(
            player,
            "join",
            json!({ "gameID": self.game_id, "username": username }),
        )
        .await;
    }

    pub async fn vote_ready(&self, player: &str, is_ready: bool) {
        self.send(player, "voteReady", json!({ "isReady": is_ready }))
            .await;
    }

    pub async fn draw_card(&self, player: &str) {
        self.send(player, "drawCard", json!({})).await;
    }

    pub async fn next_player(&self, player: &str) {
        self.send(player, "nextPlayer", json!({})).await;
    }

    pub async fn drop_drawn(&self, player: &str) {
        self.send(player, "dropDrawn", json!({})).await;
    }

    pub async fn swap_drawn(&self, player: &str, card: i64) {
        self.send(player, "swapDrawn", json!({ "card": card })).await;
    }

    pub async fn drop_card(&self, player: &str, card: i64) {
        self.send(player, "dropCard", json!({ "card": card })).await;
    }

    pub async fn call_stop(&self, player: &str) {
        self.send(player, "callStop", json!({})).await;
    }

    pub async fn power_view_self(&self, player: &str, card: i64) {
        self.send(player, "powerViewSelf", json!({ "card": card }))
            .await;
    }

    pub async fn power_view_other(&self, player: &str, other: i64, card: i64) {
        self.send(
            player,
            "powerViewOther",
            json!({ "player": other, "card": card }),
        )
        .await;
    }

    pub async fn power_swap_other(&self, player: &str, own: i64, other: i64, other_card: i64) {
        self.send(
            player,
            "powerSwapOther",
            json!({ "ownCard": own, "otherPlayer": other, "otherCard": other_card }),
        )
        .await;
    }

    /// Current player draws and discards, then passes the turn
    pub async fn play_quiet_turn(&self) {
        let player = self.current_player().await;
        self.draw_card(&player).await;
        self.drop_drawn(&player).await;
        self.next_player(&player).await;
    }

    /// Plays quiet turns until the current player draws a card granting
    /// `power`, discards it and holds the power. Returns that player's name.
    pub async fn play_until_power(&self, power: Power) -> String {
        for _ in 0..500 {
            let player = self.current_player().await;
            self.draw_card(&player).await;
            let drawn = self.snapshot().await.drawn().expect("card was drawn");
            self.drop_drawn(&player).await;
            if Power::granted_by(drawn) == Some(power) {
                self.clear_messages().await;
                return player;
            }
            self.next_player(&player).await;
            assert_eq!(self.snapshot().await.state(), GameState::InGame);
        }
        panic!("never drew a card granting {power:?}");
    }
}
