use log::{ debug, info, warn };
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::history::HistoryStore;
use crate::llm::chat::{ generate_reply, ChatClient };
use crate::models::chat::ChatMessage;
use crate::models::websocket::{ ClientMessage, ServerMessage };
use crate::prompt::build_prompt;
use crate::server::registry::{ ConnectionId, ConnectionRegistry, EventSender };

/// Shared conversation plus everyone listening to it.
///
/// Appends and their broadcasts go through `publish_lock`, as does the
/// replay a new connection receives, so every client observes events in
/// store order and never misses or duplicates a message around its join.
pub struct ChatRelay {
    history: Arc<dyn HistoryStore>,
    registry: Arc<ConnectionRegistry>,
    chat_client: Arc<dyn ChatClient>,
    completion_timeout: Option<Duration>,
    publish_lock: Mutex<()>,
}

impl ChatRelay {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        registry: Arc<ConnectionRegistry>,
        chat_client: Arc<dyn ChatClient>,
        completion_timeout: Option<Duration>
    ) -> Self {
        Self {
            history,
            registry,
            chat_client,
            completion_timeout,
            publish_lock: Mutex::new(()),
        }
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Registers a freshly accepted connection and replays the conversation to it.
    pub async fn connect(&self, sender: EventSender) -> ConnectionId {
        let id = Uuid::new_v4();
        let _guard = self.publish_lock.lock().await;

        self.registry.register(id, sender).await;
        let backlog = self.history.snapshot().await;
        let replayed = backlog.len();
        for message in &backlog {
            if let Err(e) = self.registry.unicast(id, ServerMessage::from(message)).await {
                warn!("Replay to {} stopped early: {}", id, e);
                break;
            }
        }
        info!("Connection {} joined; replayed {} messages", id, replayed);
        id
    }

    pub async fn disconnect(&self, id: ConnectionId) {
        if self.registry.unregister(id).await {
            info!("Connection {} left", id);
        }
    }

    /// Parses one inbound text frame and handles it.
    pub async fn handle_frame(&self, id: ConnectionId, frame: &str) -> Result<(), serde_json::Error> {
        let inbound: ClientMessage = serde_json::from_str(frame)?;
        self.handle_inbound(id, inbound).await;
        Ok(())
    }

    /// Stores and broadcasts the message, then answers it unless it came from the bot.
    pub async fn handle_inbound(&self, id: ConnectionId, inbound: ClientMessage) {
        let (message, chart_option) = inbound.into_parts();
        debug!("Message from {} (sender {:?}, role {:?})", id, message.sender, message.role);

        self.publish(message.clone()).await;
        if !message.is_from_user() {
            return;
        }

        self.broadcast(ServerMessage::thinking()).await;
        let reply = self.generate(&message, chart_option.as_ref()).await;
        self.broadcast(ServerMessage::idle()).await;

        self.publish(ChatMessage::assistant_reply(reply, &message)).await;
    }

    async fn generate(&self, trigger: &ChatMessage, chart_option: Option<&Value>) -> String {
        let history = self.history.snapshot().await;
        let request = chart_option.map(|_| trigger.text.as_str());
        let prompt = build_prompt(&history, chart_option, request);
        generate_reply(self.chat_client.as_ref(), &prompt, self.completion_timeout).await
    }

    async fn publish(&self, message: ChatMessage) {
        let _guard = self.publish_lock.lock().await;
        let event = ServerMessage::from(&message);
        self.history.append(message).await;
        self.registry.broadcast(event).await;
    }

    async fn broadcast(&self, event: ServerMessage) {
        let _guard = self.publish_lock.lock().await;
        self.registry.broadcast(event).await;
    }
}
