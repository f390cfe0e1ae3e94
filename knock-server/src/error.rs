use crate::room::CallStatus;
use knock_core::{ConnectionId, RoomToken};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("room {0} not found")]
    RoomNotFound(RoomToken),

    #[error("connection {0} is no longer registered")]
    StaleRelayTarget(ConnectionId),

    #[error("visit record was not persisted: {0}")]
    PersistenceFailure(String),

    #[error("room {room} cannot move from {from} to {to}")]
    InvalidTransition {
        room: RoomToken,
        from: CallStatus,
        to: CallStatus,
    },

    #[error("room {0} has no guest bound")]
    NoGuestBound(RoomToken),

    #[error("connection {0} has not joined a room")]
    NotJoined(ConnectionId),

    #[error("relay event loop is not running")]
    RelayUnavailable,

    #[error("invalid relay config: {0}")]
    InvalidConfig(String),
}
