pub mod api;
pub mod registry;
pub mod websocket;

use crate::cli::Args;
use crate::relay::ChatRelay;
use self::websocket::HandshakePolicy;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    relay: Arc<ChatRelay>,
    args: Args,
}

impl Server {
    pub fn new(relay: Arc<ChatRelay>, args: Args) -> Self {
        Self { relay, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(http_port) = self.args.http_port {
            self.start_http_server(http_port).await?;
        }

        self.start_ws_server().await?;

        Ok(())
    }

    async fn start_http_server(&self, http_port: u16) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(http_port, self.relay.clone(), &self.args.allowed_origin).await
    }

    async fn start_ws_server(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let policy = HandshakePolicy {
            path: self.args.ws_path.clone(),
            allowed_origin: self.args.allowed_origin.clone(),
        };
        websocket::start_ws_server(&self.args.server_addr, self.relay.clone(), policy).await
    }
}
