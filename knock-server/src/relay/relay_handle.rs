use crate::error::RelayError;
use crate::relay::{RelayCommand, RelayStats};
use crate::room::Room;
use knock_core::{ClientSignal, ConnectionId, RoomToken};
use tokio::sync::{mpsc, oneshot};

/// Cloneable sender side of the relay event loop.
#[derive(Clone, Debug)]
pub struct RelayHandle {
    tx: mpsc::Sender<RelayCommand>,
}

impl RelayHandle {
    pub fn new(tx: mpsc::Sender<RelayCommand>) -> Self {
        Self { tx }
    }

    pub async fn signal(&self, conn: ConnectionId, signal: ClientSignal) -> Result<(), RelayError> {
        self.submit(RelayCommand::Signal { conn, signal }).await
    }

    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), RelayError> {
        self.submit(RelayCommand::Disconnect { conn }).await
    }

    pub async fn inspect(&self, room: RoomToken) -> Result<Option<Room>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.submit(RelayCommand::Inspect { room, reply }).await?;
        rx.await.map_err(|_| RelayError::RelayUnavailable)
    }

    pub async fn stats(&self) -> Result<RelayStats, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.submit(RelayCommand::Stats { reply }).await?;
        rx.await.map_err(|_| RelayError::RelayUnavailable)
    }

    async fn submit(&self, cmd: RelayCommand) -> Result<(), RelayError> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| RelayError::RelayUnavailable)
    }
}
