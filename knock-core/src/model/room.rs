use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, externally generated room capability (the token encoded in the QR code).
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct RoomToken(pub String);

impl RoomToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomToken {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
