use crate::room::Room;
use knock_core::{ClientSignal, ConnectionId, RoomToken};
use serde::Serialize;
use tokio::sync::oneshot;

/// Commands fed into the relay event loop by the transport layer.
#[derive(Debug)]
pub enum RelayCommand {
    /// A parsed frame from a connected client.
    Signal {
        conn: ConnectionId,
        signal: ClientSignal,
    },

    /// The transport lost the session (close frame, socket error, idle timeout).
    Disconnect { conn: ConnectionId },

    /// Snapshot of one room.
    Inspect {
        room: RoomToken,
        reply: oneshot::Sender<Option<Room>>,
    },

    Stats { reply: oneshot::Sender<RelayStats> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub rooms: usize,
    pub joined_connections: usize,
}
