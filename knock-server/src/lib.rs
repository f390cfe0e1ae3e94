mod app;
mod config;
mod directory;
mod error;
mod persistence;
mod relay;
mod room;
mod signaling;

pub use app::*;
pub use config::*;
pub use directory::*;
pub use error::*;
pub use persistence::*;
pub use relay::*;
pub use room::*;
pub use signaling::*;
