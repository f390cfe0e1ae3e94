mod connection_directory;

pub use connection_directory::*;
