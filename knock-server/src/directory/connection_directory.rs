use crate::error::RelayError;
use crate::room::Room;
use crate::signaling::SignalingOutput;
use knock_core::{ConnectionId, Profile, Role, RoomToken, ServerSignal};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// What a connection declared when it joined.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionEntry {
    pub room: RoomToken,
    pub role: Role,
    pub profile: Profile,
}

/// Maps live connections to their room association and reaches them through
/// the transport's [`SignalingOutput`].
pub struct ConnectionDirectory {
    entries: HashMap<ConnectionId, ConnectionEntry>,
    output: Arc<dyn SignalingOutput>,
}

impl ConnectionDirectory {
    pub fn new(output: Arc<dyn SignalingOutput>) -> Self {
        Self {
            entries: HashMap::new(),
            output,
        }
    }

    /// Returns the entry this one replaced, if the connection had joined before.
    pub fn record(&mut self, conn: ConnectionId, entry: ConnectionEntry) -> Option<ConnectionEntry> {
        self.entries.insert(conn, entry)
    }

    pub fn forget(&mut self, conn: ConnectionId) -> Option<ConnectionEntry> {
        self.entries.remove(&conn)
    }

    pub fn get(&self, conn: ConnectionId) -> Option<&ConnectionEntry> {
        self.entries.get(&conn)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub async fn send(&self, conn: ConnectionId, signal: ServerSignal) -> Result<(), RelayError> {
        self.output.send(conn, signal).await
    }

    /// Sends to every connection bound to `room`. Returns how many were reached.
    pub async fn broadcast(&self, room: &Room, signal: ServerSignal) -> usize {
        let mut delivered = 0;
        for conn in std::iter::once(room.host).chain(room.guest) {
            match self.output.send(conn, signal.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(
                    "Dropped {} for room {}: {}",
                    signal.event_name(),
                    room.token,
                    e
                ),
            }
        }
        delivered
    }

    pub async fn is_live(&self, conn: ConnectionId) -> bool {
        self.output.is_live(conn).await
    }
}
