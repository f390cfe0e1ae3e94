use async_trait::async_trait;
use knock_core::{ConnectionId, ServerSignal};
use knock_server::{RelayError, SignalingOutput};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock SignalingOutput that captures every outgoing frame and lets a test
/// declare connections dead.
#[derive(Clone, Default)]
pub struct MockSignalingOutput {
    sent: Arc<Mutex<Vec<(ConnectionId, ServerSignal)>>>,
    dead: Arc<Mutex<HashSet<ConnectionId>>>,
}

impl MockSignalingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the transport losing `conn` without a disconnect event.
    pub async fn kill(&self, conn: ConnectionId) {
        self.dead.lock().await.insert(conn);
    }

    /// All frames delivered to `conn`, in order.
    pub async fn signals_for(&self, conn: ConnectionId) -> Vec<ServerSignal> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| *to == conn)
            .map(|(_, signal)| signal.clone())
            .collect()
    }

    /// How many `event` frames were delivered to `conn`.
    pub async fn count_for(&self, conn: ConnectionId, event: &str) -> usize {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, signal)| *to == conn && signal.event_name() == event)
            .count()
    }

    pub async fn total(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send(&self, conn: ConnectionId, signal: ServerSignal) -> Result<(), RelayError> {
        if self.dead.lock().await.contains(&conn) {
            return Err(RelayError::StaleRelayTarget(conn));
        }

        tracing::debug!("[MockSignaling] {} to {}", signal.event_name(), conn);
        self.sent.lock().await.push((conn, signal));
        Ok(())
    }

    async fn is_live(&self, conn: ConnectionId) -> bool {
        !self.dead.lock().await.contains(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_captures_frames() {
        let output = MockSignalingOutput::new();
        let conn = ConnectionId::new();

        output.send(conn, ServerSignal::CallEnded).await.unwrap();

        assert_eq!(output.signals_for(conn).await, vec![ServerSignal::CallEnded]);
        assert_eq!(output.count_for(conn, "call-ended").await, 1);
    }

    #[tokio::test]
    async fn test_mock_signaling_rejects_dead_connections() {
        let output = MockSignalingOutput::new();
        let conn = ConnectionId::new();
        output.kill(conn).await;

        let result = output.send(conn, ServerSignal::CallEnded).await;

        assert!(matches!(result, Err(RelayError::StaleRelayTarget(id)) if id == conn));
        assert!(!output.is_live(conn).await);
        assert_eq!(output.total().await, 0);
    }
}
