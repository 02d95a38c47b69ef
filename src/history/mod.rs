mod memory;

use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use crate::models::chat::ChatMessage;

pub use memory::MemoryHistoryStore;

/// Append-only conversation shared by every connection.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends `message` and returns the new length of the conversation.
    async fn append(&self, message: ChatMessage) -> usize;

    /// Copy of the conversation in append order.
    async fn snapshot(&self) -> Vec<ChatMessage>;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

pub fn initialize_history_store() -> Arc<dyn HistoryStore> {
    info!("Chat history is kept in memory for the lifetime of the process");
    Arc::new(MemoryHistoryStore::new())
}
