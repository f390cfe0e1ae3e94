use crate::error::RelayError;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Runtime settings for one relay instance.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// How often rooms are checked for a dead host connection.
    pub sweep_interval: Duration,
    /// Ping cadence on every signaling socket.
    pub heartbeat_interval: Duration,
    /// A socket that sends nothing (not even a pong) for this long is closed.
    pub idle_timeout: Duration,
    pub command_buffer: usize,
    /// When set, visit records are POSTed here instead of only being logged.
    pub visit_webhook: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 5000)),
            sweep_interval: Duration::from_secs(600),
            heartbeat_interval: Duration::from_secs(25),
            idle_timeout: Duration::from_secs(60),
            command_buffer: 256,
            visit_webhook: None,
        }
    }
}

impl RelayConfig {
    /// Rejects settings the timers and channels cannot run with.
    pub fn validate(&self) -> Result<(), RelayError> {
        let invalid = |msg: &str| Err(RelayError::InvalidConfig(msg.to_owned()));

        if self.sweep_interval.is_zero() {
            return invalid("sweep interval must be positive");
        }
        if self.heartbeat_interval.is_zero() {
            return invalid("heartbeat interval must be positive");
        }
        if self.idle_timeout <= self.heartbeat_interval {
            return invalid("idle timeout must exceed the heartbeat interval");
        }
        if self.command_buffer == 0 {
            return invalid("command buffer must hold at least one command");
        }
        Ok(())
    }
}

/// Liveness settings handed to each WebSocket session.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    pub interval: Duration,
    pub idle_timeout: Duration,
}

impl From<&RelayConfig> for HeartbeatConfig {
    fn from(config: &RelayConfig) -> Self {
        Self {
            interval: config.heartbeat_interval,
            idle_timeout: config.idle_timeout,
        }
    }
}
