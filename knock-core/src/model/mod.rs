mod connection;
mod profile;
mod room;
mod signaling;

pub use connection::{ConnectionId, Role};
pub use profile::Profile;
pub use room::RoomToken;
pub use signaling::{ClientSignal, ServerSignal};
