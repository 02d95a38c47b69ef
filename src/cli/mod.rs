use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the websocket server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8080")]
    pub server_addr: String,

    /// Path clients connect to for the shared conversation.
    #[arg(long, env = "WS_PATH", default_value = "/ws")]
    pub ws_path: String,

    /// Browser origin allowed to open the websocket and call the HTTP API.
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:5173")]
    pub allowed_origin: String,

    /// Optional port for the HTTP side API (health and message history).
    #[arg(long, env = "HTTP_PORT")]
    pub http_port: Option<u16>,

    // --- Chat LLM Provider Args ---
    /// API Key for the OpenAI-compatible completion endpoint.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name used for every completion call.
    #[arg(long, env = "CHAT_MODEL", default_value = "gpt-5")]
    pub chat_model: String,

    /// Base URL of the completion API (e.g., https://api.openai.com or http://localhost:8000/v1)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, the client falls back to api.openai.com
    pub chat_base_url: Option<String>,

    /// Seconds to wait for one completion before replying with an apology. 0 waits forever.
    #[arg(long, env = "COMPLETION_TIMEOUT_SECS", default_value = "120")]
    pub completion_timeout_secs: u64,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}

impl Args {
    pub fn completion_timeout(&self) -> Option<Duration> {
        match self.completion_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
