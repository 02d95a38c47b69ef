pub mod openai;

use async_trait::async_trait;
use log::{ error, info, warn };
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::LlmConfig;
use self::openai::OpenAIChatClient;
use crate::models::chat::PromptSegment;

/// Reply broadcast in place of a real answer when generation fails.
pub const APOLOGY_REPLY: &str = "I'm sorry, I encountered an error while processing your message.";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Status {
        status: u16,
        body: String,
    },
    #[error("failed to decode completion response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("completion response contained no text")]
    EmptyResponse,
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid API key format: {0}")]
    InvalidApiKey(String),
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends the ordered prompt to the model and returns the trimmed text of
    /// the first choice.
    async fn complete(&self, prompt: &[PromptSegment]) -> Result<String, LlmError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    if config.api_key.is_none() {
        warn!("No chat API key configured; completion calls will be rejected upstream.");
    }
    let client = OpenAIChatClient::from_config(config)?;
    info!(
        "Chat client configured: Model={}, BaseURL={}",
        client.get_model(),
        client.base_url()
    );
    Ok(Arc::new(client))
}

/// Runs one completion, degrading every failure to [`APOLOGY_REPLY`].
pub async fn generate_reply(
    client: &dyn ChatClient,
    prompt: &[PromptSegment],
    timeout: Option<Duration>
) -> String {
    let result = match timeout {
        Some(limit) =>
            match tokio::time::timeout(limit, client.complete(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout(limit)),
            }
        None => client.complete(prompt).await,
    };

    match result {
        Ok(text) => text,
        Err(e) => {
            error!("Error generating response: {}", e);
            APOLOGY_REPLY.to_string()
        }
    }
}
