#![allow(dead_code)]

use async_trait::async_trait;
use chart_relay::history::MemoryHistoryStore;
use chart_relay::llm::chat::{ ChatClient, LlmError };
use chart_relay::models::chat::PromptSegment;
use chart_relay::models::websocket::ServerMessage;
use chart_relay::relay::ChatRelay;
use chart_relay::server::registry::ConnectionRegistry;
use chart_relay::server::websocket::{ serve, HandshakePolicy };
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::net::{ TcpListener, TcpStream };
use tokio_tungstenite::{ connect_async, MaybeTlsStream, WebSocketStream };
use tokio_tungstenite::tungstenite::Message;

pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Answers completions from a queue; `Err(())` simulates an API failure.
pub struct ScriptedClient {
    replies: Mutex<Vec<Result<String, ()>>>,
    pub prompts: Mutex<Vec<Vec<PromptSegment>>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<&str, ()>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .rev()
                    .map(|r| r.map(str::to_string))
                    .collect()
            ),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(&self, prompt: &[PromptSegment]) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_vec());
        match self.replies.lock().unwrap().pop() {
            Some(Ok(text)) => Ok(text),
            _ => Err(LlmError::Status { status: 503, body: "unavailable".into() }),
        }
    }

    fn get_model(&self) -> String {
        "scripted".into()
    }
}

pub async fn start_relay(client: Arc<ScriptedClient>) -> (SocketAddr, Arc<ChatRelay>) {
    let relay = Arc::new(
        ChatRelay::new(
            Arc::new(MemoryHistoryStore::new()),
            Arc::new(ConnectionRegistry::new()),
            client,
            Some(Duration::from_secs(5))
        )
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let policy = HandshakePolicy {
        path: "/ws".into(),
        allowed_origin: ALLOWED_ORIGIN.into(),
    };
    tokio::spawn(serve(listener, relay.clone(), policy));
    (addr, relay)
}

pub async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{}/ws", addr)).await.expect("websocket connect");
    ws
}

/// Polls until the relay has registered exactly `n` connections.
pub async fn wait_for_connections(relay: &ChatRelay, n: usize) {
    for _ in 0..200 {
        if relay.registry().len().await == n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("relay never reached {} connections", n);
}

pub async fn next_event(ws: &mut Client) -> ServerMessage {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next()).await
            .expect("timed out waiting for event")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("server sent invalid JSON");
        }
    }
}

pub async fn next_events(ws: &mut Client, n: usize) -> Vec<ServerMessage> {
    let mut events = Vec::with_capacity(n);
    for _ in 0..n {
        events.push(next_event(ws).await);
    }
    events
}

pub fn message(sender: &str, text: &str, timestamp: Option<i64>) -> ServerMessage {
    ServerMessage::Message { sender: sender.into(), text: text.into(), timestamp }
}
