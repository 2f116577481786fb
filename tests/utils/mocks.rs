use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use tamalo::websockets::ConnectionManager;

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every frame sent to a session instead of delivering it
#[derive(Clone)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<String, VecDeque<String>>>>,
    connected_sessions: Arc<RwLock<Vec<String>>>,
}

#[allow(dead_code)]
impl MockConnectionManager {
    pub fn new() -> Self {
        Self {
            sent_messages: Arc::new(RwLock::new(HashMap::new())),
            connected_sessions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn get_messages_for(&self, session_id: &str) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(session_id)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pops the oldest unread frame for a session
    pub async fn consume_message_for(&self, session_id: &str) -> Option<String> {
        self.sent_messages
            .write()
            .await
            .get_mut(session_id)
            .and_then(|queue| queue.pop_front())
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }

    pub async fn is_connected(&self, session_id: &str) -> bool {
        self.connected_sessions
            .read()
            .await
            .iter()
            .any(|s| s == session_id)
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(&self, session_id: String, _sender: mpsc::UnboundedSender<String>) {
        self.connected_sessions.write().await.push(session_id);
    }

    async fn remove_connection(&self, session_id: &str) {
        self.connected_sessions
            .write()
            .await
            .retain(|s| s != session_id);
    }

    async fn send_to_session(&self, session_id: &str, message: &str) -> bool {
        self.sent_messages
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .push_back(message.to_string());
        true
    }
}
