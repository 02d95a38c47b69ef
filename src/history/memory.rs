use async_trait::async_trait;
use tokio::sync::RwLock;

use super::HistoryStore;
use crate::models::chat::ChatMessage;

#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, message: ChatMessage) -> usize {
        let mut messages = self.messages.write().await;
        messages.push(message);
        messages.len()
    }

    async fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    async fn len(&self) -> usize {
        self.messages.read().await.len()
    }
}
