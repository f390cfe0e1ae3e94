use crate::model::connection::{ConnectionId, Role};
use crate::model::profile::Profile;
use crate::model::room::RoomToken;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames a client sends to the relay.
///
/// Negotiation payloads (`offer`, `answer`, `candidate`) are opaque JSON and are
/// never inspected by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientSignal {
    Join {
        room_id: RoomToken,
        role: Role,
        #[serde(default)]
        profile: Profile,
    },
    Offer {
        room_id: RoomToken,
        offer: Value,
    },
    /// `to` falls back to the sender's counterpart in its joined room.
    Answer {
        answer: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<ConnectionId>,
    },
    IceCandidate {
        candidate: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<ConnectionId>,
    },
    AcceptCall {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomToken>,
    },
    RejectCall {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomToken>,
    },
    EndCall {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomToken>,
    },
    LeaveMessage {
        room_id: RoomToken,
        name: String,
        message: String,
    },
    ToggleCamera {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomToken>,
        enabled: bool,
    },
}

/// Frames the relay pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerSignal {
    Welcome {
        connection_id: ConnectionId,
    },
    Ring {
        guest_profile: Profile,
        room_id: RoomToken,
        timestamp: DateTime<Utc>,
    },
    Offer {
        offer: Value,
        from: ConnectionId,
        guest_profile: Profile,
    },
    Answer {
        answer: Value,
    },
    IceCandidate {
        candidate: Value,
        from: ConnectionId,
    },
    CallAccepted,
    CallRejected,
    CallEnded,
    NewMessage {
        name: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
    CameraToggled {
        enabled: bool,
    },
    Error {
        message: String,
    },
}

impl ServerSignal {
    pub fn error(message: impl Into<String>) -> Self {
        ServerSignal::Error {
            message: message.into(),
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            ServerSignal::Welcome { .. } => "welcome",
            ServerSignal::Ring { .. } => "ring",
            ServerSignal::Offer { .. } => "offer",
            ServerSignal::Answer { .. } => "answer",
            ServerSignal::IceCandidate { .. } => "ice-candidate",
            ServerSignal::CallAccepted => "call-accepted",
            ServerSignal::CallRejected => "call-rejected",
            ServerSignal::CallEnded => "call-ended",
            ServerSignal::NewMessage { .. } => "new-message",
            ServerSignal::CameraToggled { .. } => "camera-toggled",
            ServerSignal::Error { .. } => "error",
        }
    }
}
