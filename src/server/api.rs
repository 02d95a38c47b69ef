use crate::models::websocket::ServerMessage;
use crate::relay::ChatRelay;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::get,
    Router,
    Json,
    extract::State,
    http::{ header::CONTENT_TYPE, HeaderValue, Method },
};
use chrono::{ DateTime, Utc };
use serde::Serialize;
use tower_http::cors::CorsLayer;
use log::{ info, error };

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    connections: usize,
    messages: usize,
    started_at: DateTime<Utc>,
}

#[derive(Clone)]
struct AppState {
    relay: Arc<ChatRelay>,
    started_at: DateTime<Utc>,
}

/// Routes of the side API, with CORS limited to `allowed_origin`.
pub fn router(relay: Arc<ChatRelay>, allowed_origin: &str) -> Result<Router, Box<dyn Error + Send + Sync>> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| format!("Invalid allowed origin '{}': {}", allowed_origin, e))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    let app_state = AppState {
        relay,
        started_at: Utc::now(),
    };

    Ok(
        Router::new()
            .route("/health", get(health_handler))
            .route("/api/messages", get(messages_handler))
            .layer(cors)
            .with_state(app_state)
    )
}

pub async fn start_http_server(
    http_port: u16,
    relay: Arc<ChatRelay>,
    allowed_origin: &str
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = format!("0.0.0.0:{}", http_port).parse::<SocketAddr>()?;
    info!("Starting HTTP API server on: http://{}", addr);

    let app = router(relay, allowed_origin)?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e|
        format!("Failed to bind HTTP server to {}: {}", addr, e)
    )?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app.into_make_service()).await {
            error!("HTTP server error: {}", e);
        }
    });

    info!("HTTP server started");
    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        connections: state.relay.registry().len().await,
        messages: state.relay.history().len().await,
        started_at: state.started_at,
    })
}

async fn messages_handler(State(state): State<AppState>) -> Json<Vec<ServerMessage>> {
    let messages = state.relay.history().snapshot().await;
    Json(messages.iter().map(ServerMessage::from).collect())
}
