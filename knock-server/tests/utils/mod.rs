pub mod mock_signaling;

pub use mock_recorder::*;
pub use mock_signaling::*;
pub use relay_harness::*;
pub use ws_client::*;
