use crate::error::RelayError;
use async_trait::async_trait;
use knock_core::{ConnectionId, ServerSignal};

/// Outbound side of the transport, so the relay can reach clients without
/// holding any socket itself.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Queue a frame for one connection. Fails with `StaleRelayTarget` when the
    /// connection is gone.
    async fn send(&self, conn: ConnectionId, signal: ServerSignal) -> Result<(), RelayError>;

    /// Whether the transport still holds an open session for `conn`.
    async fn is_live(&self, conn: ConnectionId) -> bool;
}
