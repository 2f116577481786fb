use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Outbound delivery to live transport sessions
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn add_connection(&self, session_id: String, sender: mpsc::UnboundedSender<String>);

    async fn remove_connection(&self, session_id: &str);

    /// Queues a frame for one session. Returns false when the session has no
    /// live socket, in which case the frame is dropped.
    async fn send_to_session(&self, session_id: &str, message: &str) -> bool;
}

pub struct InMemoryConnectionManager {
    // session_id -> sender
    connections: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl InMemoryConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for InMemoryConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionManager for InMemoryConnectionManager {
    async fn add_connection(&self, session_id: String, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        if connections.insert(session_id.clone(), sender).is_some() {
            debug!(session_id = %session_id, "Replaced existing connection");
        }
    }

    async fn remove_connection(&self, session_id: &str) {
        let mut connections = self.connections.write().await;
        connections.remove(session_id);
    }

    async fn send_to_session(&self, session_id: &str, message: &str) -> bool {
        let delivered = {
            let connections = self.connections.read().await;
            match connections.get(session_id) {
                Some(sender) => sender.send(message.to_string()).is_ok(),
                None => return false,
            }
        };

        if !delivered {
            // The socket task is gone but has not deregistered yet
            let mut connections = self.connections.write().await;
            if connections
                .get(session_id)
                .is_some_and(|sender| sender.is_closed())
            {
                connections.remove(session_id);
                debug!(session_id = %session_id, "Pruned closed connection");
            }
        }
        delivered
    }
}
