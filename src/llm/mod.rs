pub mod chat;

use std::time::Duration;
use crate::cli::Args;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-5";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
    /// Upper bound on one completion call, enforced by the relay around
    /// `generate_reply`; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl From<&Args> for LlmConfig {
    fn from(args: &Args) -> Self {
        Self {
            api_key: Some(args.chat_api_key.clone()).filter(|k| !k.trim().is_empty()),
            completion_model: Some(args.chat_model.clone()).filter(|m| !m.trim().is_empty()),
            base_url: args.chat_base_url.clone().filter(|u| !u.trim().is_empty()),
            timeout: args.completion_timeout(),
        }
    }
}
