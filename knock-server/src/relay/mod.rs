mod lifecycle;
mod relay;
mod relay_command;
mod relay_handle;
mod signal_relay;
mod sweeper;

pub use relay::*;
pub use relay_command::*;
pub use relay_handle::*;
