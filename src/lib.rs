pub mod models;
pub mod server;
pub mod relay;
pub mod prompt;
pub mod llm;
pub mod cli;
pub mod history;

use cli::Args;
use history::initialize_history_store;
use llm::LlmConfig;
use llm::chat::new_client as new_chat_client;
use log::info;
use relay::ChatRelay;
use server::Server;
use server::registry::ConnectionRegistry;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("WebSocket Path: {}", args.ws_path);
    info!("Allowed Origin: {}", args.allowed_origin);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url.as_deref().unwrap_or("default"));
    info!("Chat API Key Set: {}", !args.chat_api_key.trim().is_empty());
    match args.completion_timeout() {
        Some(timeout) => info!("Completion Timeout: {}s", timeout.as_secs()),
        None => info!("Completion Timeout: disabled"),
    }
    if let Some(port) = args.http_port {
        info!("HTTP API Port: {}", port);
    }
    info!("-------------------------");

    let llm_config = LlmConfig::from(&args);
    let chat_client = new_chat_client(&llm_config)?;
    let relay = Arc::new(
        ChatRelay::new(
            initialize_history_store(),
            Arc::new(ConnectionRegistry::new()),
            chat_client,
            llm_config.timeout
        )
    );

    let server = Server::new(relay, args);
    server.run().await?;

    Ok(())
}
