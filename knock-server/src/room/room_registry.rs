use crate::error::RelayError;
use crate::room::{CallStatus, Room};
use chrono::Utc;
use knock_core::{ConnectionId, Profile, RoomToken};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Authoritative map of room token to call state.
///
/// Owned by the relay event loop, so implementations need no interior locking.
/// A shared-store backend only has to honour the same operations.
pub trait RoomRegistry: Send + Sync + 'static {
    /// Binds `host` to `token`, discarding any previous guest and status.
    /// Returns the room that was replaced, if any.
    fn create_or_replace_host(
        &mut self,
        token: RoomToken,
        host: ConnectionId,
        host_profile: Profile,
    ) -> Option<Room>;

    /// Binds a guest and moves the room to `ringing`. An already bound guest is overwritten.
    fn attach_guest(
        &mut self,
        token: &RoomToken,
        guest: ConnectionId,
        guest_profile: Profile,
    ) -> Result<&Room, RelayError>;

    /// Only `ringing -> connected` is a valid in-place transition.
    fn transition(&mut self, token: &RoomToken, status: CallStatus) -> Result<&Room, RelayError>;

    fn remove(&mut self, token: &RoomToken) -> Option<Room>;

    fn get(&self, token: &RoomToken) -> Option<&Room>;

    /// Room where `conn` is bound as host or guest.
    fn find_by_connection(&self, conn: ConnectionId) -> Option<&Room>;

    fn host_bindings(&self) -> Vec<(RoomToken, ConnectionId)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRoomRegistry {
    rooms: HashMap<RoomToken, Room>,
}

impl InMemoryRoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomRegistry for InMemoryRoomRegistry {
    fn create_or_replace_host(
        &mut self,
        token: RoomToken,
        host: ConnectionId,
        host_profile: Profile,
    ) -> Option<Room> {
        let room = Room::new(token.clone(), host, host_profile);
        let replaced = self.rooms.insert(token, room);

        if let Some(old) = &replaced {
            if old.guest.is_some() {
                warn!(
                    "Room {} re-opened by host {} while {}; previous call state discarded",
                    old.token, host, old.status
                );
            }
        }
        replaced
    }

    fn attach_guest(
        &mut self,
        token: &RoomToken,
        guest: ConnectionId,
        guest_profile: Profile,
    ) -> Result<&Room, RelayError> {
        let room = self
            .rooms
            .get_mut(token)
            .ok_or_else(|| RelayError::RoomNotFound(token.clone()))?;

        if let Some(previous) = room.guest {
            warn!(
                "Guest {} replaces guest {} in room {} ({})",
                guest, previous, token, room.status
            );
        }

        room.guest = Some(guest);
        room.guest_profile = Some(guest_profile);
        if room.status == CallStatus::Waiting {
            room.status = CallStatus::Ringing;
        }
        Ok(&*room)
    }

    fn transition(&mut self, token: &RoomToken, status: CallStatus) -> Result<&Room, RelayError> {
        let room = self
            .rooms
            .get_mut(token)
            .ok_or_else(|| RelayError::RoomNotFound(token.clone()))?;

        match (room.status, status) {
            (CallStatus::Ringing, CallStatus::Connected) if room.guest.is_some() => {
                room.status = CallStatus::Connected;
                room.connected_at = Some(Utc::now());
                Ok(&*room)
            }
            (from, to) => Err(RelayError::InvalidTransition {
                room: token.clone(),
                from,
                to,
            }),
        }
    }

    fn remove(&mut self, token: &RoomToken) -> Option<Room> {
        let removed = self.rooms.remove(token);
        if removed.is_none() {
            debug!("Room {} already absent", token);
        }
        removed
    }

    fn get(&self, token: &RoomToken) -> Option<&Room> {
        self.rooms.get(token)
    }

    fn find_by_connection(&self, conn: ConnectionId) -> Option<&Room> {
        self.rooms.values().find(|room| room.involves(conn))
    }

    fn host_bindings(&self) -> Vec<(RoomToken, ConnectionId)> {
        self.rooms
            .values()
            .map(|room| (room.token.clone(), room.host))
            .collect()
    }

    fn len(&self) -> usize {
        self.rooms.len()
    }
}
