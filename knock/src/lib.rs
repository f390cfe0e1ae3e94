pub use knock_core::model::{ConnectionId, RoomToken};

pub mod model {
    pub use knock_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use knock_server::*;
}
