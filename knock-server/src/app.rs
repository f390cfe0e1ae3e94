use crate::config::{HeartbeatConfig, RelayConfig};
use crate::error::RelayError;
use crate::persistence::{VisitQueue, VisitRecorder};
use crate::relay::{Relay, RelayHandle};
use crate::room::InMemoryRoomRegistry;
use crate::signaling::{SignalingPeers, SignalingService, ws_handler};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Starts the relay event loop and the visit writer, and returns the
/// transport service that feeds them plus the relay task. The relay stops
/// once every clone of the service is dropped.
pub fn spawn_relay(
    config: &RelayConfig,
    recorder: Arc<dyn VisitRecorder>,
) -> Result<(SignalingService, JoinHandle<()>), RelayError> {
    config.validate()?;

    let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
    let peers = Arc::new(SignalingPeers::new());
    let signaling = SignalingService::new(
        RelayHandle::new(command_tx),
        Arc::clone(&peers),
        HeartbeatConfig::from(config),
    );
    let visits = VisitQueue::spawn(recorder);

    let relay = Relay::new(
        Box::new(InMemoryRoomRegistry::new()),
        command_rx,
        peers,
        visits,
        config.sweep_interval,
    );
    let relay_task = tokio::spawn(relay.run());

    info!("Relay spawned");
    Ok((signaling, relay_task))
}

pub fn router(signaling: SignalingService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/healthz", get(health_handler))
        .layer(cors)
        .with_state(signaling)
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub rooms: usize,
    pub joined_connections: usize,
    pub connections: usize,
}

async fn health_handler(
    State(signaling): State<SignalingService>,
) -> Result<Json<HealthReport>, StatusCode> {
    let stats = signaling.relay().stats().await.map_err(|e| {
        error!("Health check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(HealthReport {
        status: "ok",
        rooms: stats.rooms,
        joined_connections: stats.joined_connections,
        connections: signaling.connection_count(),
    }))
}
