//! Connection management for WebSocket clients.
//!
//! Every connection receives every roll, so there is no grouping beyond the
//! set of open sockets.

use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use jojo_shared::ServerMessage;

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    /// Map of connection_id -> sender channel
    connections: RwLock<HashMap<Uuid, mpsc::Sender<ServerMessage>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register(&self, connection_id: Uuid, sender: mpsc::Sender<ServerMessage>) {
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, sender);
        tracing::debug!(connection_id = %connection_id, "Connection registered");
    }

    pub async fn unregister(&self, connection_id: Uuid) {
        let mut connections = self.connections.write().await;
        if connections.remove(&connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Broadcast a message to every connection.
    pub async fn broadcast(&self, message: ServerMessage) {
        let connections = self.connections.read().await;
        for (connection_id, sender) in connections.iter() {
            if let Err(e) = sender.try_send(message.clone()) {
                tracing::warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to broadcast message"
                );
            }
        }
    }

    /// Send a message to one connection. Returns false if it is gone or full.
    pub async fn send_to(&self, connection_id: Uuid, message: ServerMessage) -> bool {
        let connections = self.connections.read().await;
        match connections.get(&connection_id) {
            Some(sender) => sender.try_send(message).is_ok(),
            None => false,
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle used by the socket handlers.
pub type SharedConnectionManager = std::sync::Arc<ConnectionManager>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_every_connection() {
        let manager = ConnectionManager::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), tx_a).await;
        manager.register(Uuid::new_v4(), tx_b).await;

        manager.broadcast(ServerMessage::Pong).await;

        assert_eq!(rx_a.recv().await, Some(ServerMessage::Pong));
        assert_eq!(rx_b.recv().await, Some(ServerMessage::Pong));
    }

    #[tokio::test]
    async fn unregistered_connection_gets_nothing() {
        let manager = ConnectionManager::new();
        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::channel(4);
        manager.register(id, tx).await;
        assert_eq!(manager.count().await, 1);

        manager.unregister(id).await;
        assert_eq!(manager.count().await, 0);
        assert!(!manager.send_to(id, ServerMessage::Pong).await);
        manager.broadcast(ServerMessage::Pong).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_to_targets_one_connection() {
        let manager = ConnectionManager::new();
        let (id_a, id_b) = (Uuid::new_v4(), Uuid::new_v4());
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        manager.register(id_a, tx_a).await;
        manager.register(id_b, tx_b).await;

        assert!(manager.send_to(id_a, ServerMessage::Pong).await);
        assert_eq!(rx_a.recv().await, Some(ServerMessage::Pong));
        assert!(rx_b.try_recv().is_err());
    }
}
