use chrono::{DateTime, Utc};
use knock_core::{Profile, RoomToken};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitKind {
    VideoCall,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitOutcome {
    Accepted,
    Rejected,
    MessageLeft,
}

/// Summary of one visit, handed to the visit-history collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub room_id: RoomToken,
    pub guest_profile: Profile,
    pub kind: VisitKind,
    pub outcome: VisitOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl VisitRecord {
    pub fn call(
        room_id: RoomToken,
        guest_profile: Profile,
        outcome: VisitOutcome,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            room_id,
            guest_profile,
            kind: VisitKind::VideoCall,
            outcome,
            message: None,
            timestamp,
        }
    }

    pub fn message_left(
        room_id: RoomToken,
        guest_profile: Profile,
        message: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            room_id,
            guest_profile,
            kind: VisitKind::Message,
            outcome: VisitOutcome::MessageLeft,
            message: Some(message),
            timestamp,
        }
    }
}
