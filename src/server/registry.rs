use chrono::{ DateTime, Utc };
use log::{ debug, warn };
use thiserror::Error;
use tokio::sync::{ mpsc, RwLock };
use uuid::Uuid;

use crate::models::websocket::ServerMessage;

pub type ConnectionId = Uuid;
pub type EventSender = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
    #[error("connection {0} is closed")]
    Closed(ConnectionId),
}

#[derive(Debug)]
struct Subscriber {
    id: ConnectionId,
    sender: EventSender,
    joined_at: DateTime<Utc>,
}

/// Open connections, kept in registration order.
///
/// Every connection is an unbounded channel drained by its own writer task,
/// so sends never wait on the peer. A send fails only once that writer has
/// gone away.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<Vec<Subscriber>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, id: ConnectionId, sender: EventSender) {
        self.connections.write().await.push(Subscriber {
            id,
            sender,
            joined_at: Utc::now(),
        });
        debug!("Registered connection {}", id);
    }

    /// Returns `false` when `id` was not registered.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        let Some(pos) = connections.iter().position(|c| c.id == id) else {
            return false;
        };
        let removed = connections.remove(pos);
        debug!(
            "Unregistered connection {} after {}s",
            id,
            (Utc::now() - removed.joined_at).num_seconds()
        );
        true
    }

    pub async fn unicast(&self, id: ConnectionId, event: ServerMessage) -> Result<(), RegistryError> {
        let connections = self.connections.read().await;
        let subscriber = connections
            .iter()
            .find(|c| c.id == id)
            .ok_or(RegistryError::UnknownConnection(id))?;
        subscriber.sender.send(event).map_err(|_| RegistryError::Closed(id))
    }

    /// Sends `event` to every connection and returns how many accepted it.
    /// A closed connection is skipped; the others still receive the event.
    pub async fn broadcast(&self, event: ServerMessage) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;
        for subscriber in connections.iter() {
            match subscriber.sender.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                }
                Err(_) => warn!("Skipping closed connection {} during broadcast", subscriber.id),
            }
        }
        delivered
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
