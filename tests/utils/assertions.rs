//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::Value;

use tamalo::{
    game::SyncData,
    websockets::{EventType, OutboundMessage},
};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    players: Vec<String>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for all players in the setup
    pub fn for_all_players(setup: &'a TestSetup) -> Self {
        let players = setup.players.clone();
        Self { setup, players }
    }

    /// Create an assertion for specific players
    pub fn for_players(setup: &'a TestSetup, players: Vec<&str>) -> Self {
        let players = players.into_iter().map(str::to_string).collect();
        Self { setup, players }
    }

    /// Assert that players received a specific event type (consumes the message from queue).
    /// Payloads must match across recipients; sync data is per player.
    pub async fn received_message_type(self, expected_type: EventType) -> MessageContent {
        let mut messages = vec![];

        for player in &self.players {
            let session = self.setup.session(player);
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(&session)
                .await
                .unwrap_or_else(|| panic!("{player} should have received a message"));

            let msg: OutboundMessage = serde_json::from_str(&message).unwrap();
            assert_eq!(
                msg.event, expected_type,
                "{player} received wrong message type: {}",
                msg.payload
            );
            messages.push(msg);
        }

        for (i, msg) in messages.iter().enumerate().skip(1) {
            assert_eq!(
                msg.payload, messages[0].payload,
                "{} payload differs from {}",
                self.players[i], self.players[0]
            );
        }

        let first = messages.remove(0);
        MessageContent {
            payload: first.payload,
            sync_data: first.sync_data,
        }
    }

    /// Assert that players have no unread messages
    pub async fn received_no_messages(self) {
        for player in &self.players {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(&self.setup.session(player))
                .await;
            assert!(
                messages.is_empty(),
                "{player} should not have received any messages, got {messages:?}"
            );
        }
    }

    /// Assert the single player received a game error with this code
    pub async fn received_error(self, expected_code: &str) -> MessageContent {
        let content = self.received_message_type(EventType::GameError).await;
        assert_eq!(content.payload["code"], expected_code, "{}", content.payload);
        content
    }

    /// Consume each player's unread messages and return them in order
    pub async fn drain(self) -> Vec<Vec<OutboundMessage>> {
        let mut all = vec![];
        for player in &self.players {
            let session = self.setup.session(player);
            let mut messages = vec![];
            while let Some(raw) = self
                .setup
                .mock_conn_manager
                .consume_message_for(&session)
                .await
            {
                messages.push(serde_json::from_str(&raw).unwrap());
            }
            all.push(messages);
        }
        all
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    pub payload: Value,
    pub sync_data: Option<SyncData>,
}

impl MessageContent {
    /// Assert a payload field has a specific value
    pub fn with_field(self, key: &str, expected: impl Into<Value>) -> Self {
        assert_eq!(self.payload[key], expected.into(), "payload: {}", self.payload);
        self
    }

    pub fn sync_data(&self) -> &SyncData {
        self.sync_data
            .as_ref()
            .expect("message should carry sync data")
    }
}
