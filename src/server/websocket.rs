use crate::models::websocket::ServerMessage;
use crate::relay::ChatRelay;

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::io::{ AsyncRead, AsyncWrite };
use tokio::sync::mpsc;

use tokio_tungstenite::{ accept_hdr_async, WebSocketStream };
use tokio_tungstenite::tungstenite::handshake::server::{ Request, Response, ErrorResponse };
use tokio_tungstenite::tungstenite::http::{ header::ORIGIN, StatusCode };
use tokio_tungstenite::tungstenite::protocol::Message;

use log::{ info, warn, error, debug };
use futures::{ SinkExt, StreamExt };

/// What a websocket handshake must satisfy before the upgrade is accepted.
#[derive(Debug, Clone)]
pub struct HandshakePolicy {
    pub path: String,
    pub allowed_origin: String,
}

impl HandshakePolicy {
    /// Wrong paths get a 404. Browsers always send `Origin`, so a mismatching
    /// one gets a 403; requests without it (CLI tools, tests) pass.
    pub fn check(&self, req: &Request) -> Result<(), ErrorResponse> {
        if req.uri().path() != self.path {
            return Err(reject(StatusCode::NOT_FOUND, "Not Found"));
        }

        match req.headers().get(ORIGIN) {
            None => Ok(()),
            Some(origin) if origin.as_bytes() == self.allowed_origin.as_bytes() => Ok(()),
            Some(origin) => {
                warn!("Rejecting websocket from disallowed origin {:?}", origin);
                Err(reject(StatusCode::FORBIDDEN, "Origin not allowed"))
            }
        }
    }
}

fn reject(status: StatusCode, reason: &str) -> ErrorResponse {
    let mut response = ErrorResponse::new(Some(reason.to_string()));
    *response.status_mut() = status;
    response
}

pub async fn start_ws_server(
    addr: &str,
    relay: Arc<ChatRelay>,
    policy: HandshakePolicy
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("WS server listening on: ws://{}{}", listener.local_addr()?, policy.path);
    serve(listener, relay, policy).await
}

/// Accept loop over an already bound listener.
pub async fn serve(
    listener: TcpListener,
    relay: Arc<ChatRelay>,
    policy: HandshakePolicy
) -> Result<(), Box<dyn Error + Send + Sync>> {
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("Incoming connection from: {}", peer);

        let relay_clone = Arc::clone(&relay);
        let policy_clone = policy.clone();

        tokio::spawn(async move {
            if let Err(e) = process_connection(peer, stream, relay_clone, policy_clone).await {
                error!("Failed to process connection for {}: {}", peer, e);
            }
        });
    }
}

async fn process_connection<S>(
    peer: SocketAddr,
    stream: S,
    relay: Arc<ChatRelay>,
    policy: HandshakePolicy
) -> Result<(), Box<dyn Error + Send + Sync>>
    where S: AsyncRead + AsyncWrite + Unpin + Send + 'static
{
    let handshake_callback = |req: &Request, response: Response| -> Result<Response, ErrorResponse> {
        debug!("Handshake from {} for {}", peer, req.uri());
        policy.check(req)?;
        Ok(response)
    };

    match accept_hdr_async(stream, handshake_callback).await {
        Ok(ws) => {
            handle_connection(peer, ws, relay).await;
            Ok(())
        }
        Err(e) => Err(format!("handshake failed: {}", e).into()),
    }
}

pub async fn handle_connection<S>(
    peer: SocketAddr,
    websocket: WebSocketStream<S>,
    relay: Arc<ChatRelay>
)
    where S: AsyncRead + AsyncWrite + Unpin + Send + 'static
{
    let (mut sink, mut stream) = websocket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to encode event for {}: {}", peer, e);
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(json)).await {
                warn!("Error sending to {}: {}", peer, e);
                break;
            }
        }
        let _ = sink.close().await;
    });

    let connection_id = relay.connect(tx).await;
    info!("New WebSocket connection: {} (Conn ID: {})", peer, connection_id);

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = relay.handle_frame(connection_id, &text).await {
                    warn!("Rejected malformed frame from {}: {}", peer, e);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Received close frame from {}", peer);
                break;
            }
            Ok(Message::Binary(_)) => {
                warn!("Ignoring binary message from {}", peer);
            }
            Ok(_) => {/* ping/pong are answered by tungstenite */}
            Err(e) => {
                match e {
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::Protocol(_)
                    | tokio_tungstenite::tungstenite::Error::Utf8 => {
                        info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                    }
                    tokio_tungstenite::tungstenite::Error::Io(ref io_err) if
                        io_err.kind() == std::io::ErrorKind::ConnectionReset
                    => {
                        info!("WebSocket connection reset by peer {}", peer);
                    }
                    _ => {
                        error!("Error receiving message from {}: {}", peer, e);
                    }
                }
                break;
            }
        }
    }

    relay.disconnect(connection_id).await;
    if let Err(e) = writer.await {
        error!("Writer task for {} failed: {}", peer, e);
    }
    info!("WebSocket connection closed for {} (Conn ID: {})", peer, connection_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> HandshakePolicy {
        HandshakePolicy {
            path: "/ws".into(),
            allowed_origin: "http://localhost:5173".into(),
        }
    }

    fn request(path: &str, origin: Option<&str>) -> Request {
        let mut builder = Request::builder().uri(path);
        if let Some(origin) = origin {
            builder = builder.header(ORIGIN, origin);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn accepts_allowed_origin_and_originless_clients() {
        assert!(policy().check(&request("/ws", Some("http://localhost:5173"))).is_ok());
        assert!(policy().check(&request("/ws", None)).is_ok());
        assert!(policy().check(&request("/ws?client=1", None)).is_ok());
    }

    #[test]
    fn rejects_foreign_origin() {
        let err = policy().check(&request("/ws", Some("http://evil.example"))).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn rejects_other_paths() {
        let err = policy().check(&request("/chat", None)).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
