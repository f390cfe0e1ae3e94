use crate::config::HeartbeatConfig;
use crate::error::RelayError;
use crate::relay::RelayHandle;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use knock_core::{ConnectionId, ServerSignal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Outbound queues of every open socket. This is what the relay writes to;
/// it holds no handle back to the relay.
#[derive(Default)]
pub struct SignalingPeers {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

impl SignalingPeers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.insert(conn, tx);
    }

    pub fn remove(&self, conn: &ConnectionId) {
        self.peers.remove(conn);
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn send_signal(&self, conn: ConnectionId, msg: &ServerSignal) -> Result<(), RelayError> {
        let Some(peer) = self.peers.get(&conn) else {
            return Err(RelayError::StaleRelayTarget(conn));
        };

        let json = match serde_json::to_string(msg) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize {} frame: {}", msg.event_name(), e);
                return Ok(());
            }
        };

        if let Err(e) = peer.send(Message::Text(json.into())) {
            error!("Failed to queue WS message for {}: {}", conn, e);
            return Err(RelayError::StaleRelayTarget(conn));
        }

        debug!("Queued {} for {}", msg.event_name(), conn);
        Ok(())
    }
}

#[async_trait]
impl SignalingOutput for SignalingPeers {
    async fn send(&self, conn: ConnectionId, signal: ServerSignal) -> Result<(), RelayError> {
        self.send_signal(conn, &signal)
    }

    async fn is_live(&self, conn: ConnectionId) -> bool {
        self.peers
            .get(&conn)
            .is_some_and(|peer| !peer.is_closed())
    }
}

/// Transport state shared by every socket task.
#[derive(Clone)]
pub struct SignalingService {
    peers: Arc<SignalingPeers>,
    heartbeat: HeartbeatConfig,
    relay: RelayHandle,
}

impl SignalingService {
    pub fn new(relay: RelayHandle, peers: Arc<SignalingPeers>, heartbeat: HeartbeatConfig) -> Self {
        Self {
            peers,
            heartbeat,
            relay,
        }
    }

    pub fn relay(&self) -> &RelayHandle {
        &self.relay
    }

    pub fn peers(&self) -> &Arc<SignalingPeers> {
        &self.peers
    }

    pub fn heartbeat(&self) -> HeartbeatConfig {
        self.heartbeat
    }

    pub fn add_peer(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.peers.add(conn, tx);
    }

    pub fn remove_peer(&self, conn: &ConnectionId) {
        self.peers.remove(conn);
    }

    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }

    pub fn send_signal(&self, conn: ConnectionId, msg: &ServerSignal) -> Result<(), RelayError> {
        self.peers.send_signal(conn, msg)
    }
}
