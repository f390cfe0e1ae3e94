use chrono::{DateTime, Utc};
use knock_core::{ConnectionId, Profile, Role, RoomToken};
use serde::Serialize;
use std::fmt;

/// Call progress of a room. Only ever moves forward; a terminal event deletes the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Waiting,
    Ringing,
    Connected,
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStatus::Waiting => f.write_str("waiting"),
            CallStatus::Ringing => f.write_str("ringing"),
            CallStatus::Connected => f.write_str("connected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub token: RoomToken,
    pub host: ConnectionId,
    pub host_profile: Profile,
    pub guest: Option<ConnectionId>,
    pub guest_profile: Option<Profile>,
    pub status: CallStatus,
    pub connected_at: Option<DateTime<Utc>>,
}

impl Room {
    pub fn new(token: RoomToken, host: ConnectionId, host_profile: Profile) -> Self {
        Self {
            token,
            host,
            host_profile,
            guest: None,
            guest_profile: None,
            status: CallStatus::Waiting,
            connected_at: None,
        }
    }

    pub fn involves(&self, conn: ConnectionId) -> bool {
        self.host == conn || self.guest == Some(conn)
    }

    pub fn role_of(&self, conn: ConnectionId) -> Option<Role> {
        if self.host == conn {
            Some(Role::Host)
        } else if self.guest == Some(conn) {
            Some(Role::Guest)
        } else {
            None
        }
    }

    pub fn connection_for(&self, role: Role) -> Option<ConnectionId> {
        match role {
            Role::Host => Some(self.host),
            Role::Guest => self.guest,
        }
    }

    /// The other bound party, if `conn` is bound and the other side is present.
    pub fn counterpart(&self, conn: ConnectionId) -> Option<ConnectionId> {
        self.role_of(conn)
            .and_then(|role| self.connection_for(role.opposite()))
    }

    pub fn guest_profile_or_default(&self) -> Profile {
        self.guest_profile.clone().unwrap_or_default()
    }
}
