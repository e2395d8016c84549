//! Server configuration

use std::time::Duration;

/// Default listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:9000";

/// Default outbound queue capacity per session
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default time allowed for the JOIN line
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default time a closing session may spend flushing its queue
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Default longest accepted input line, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Runtime settings shared by the acceptor and every session
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: String,
    /// Outbound queue capacity; messages beyond it are dropped (minimum 1)
    pub queue_capacity: usize,
    /// How long a new connection may take to send JOIN
    pub handshake_timeout: Duration,
    /// How long teardown waits for queued output before closing anyway
    pub drain_timeout: Duration,
    /// Longest accepted input line; longer lines end the session
    pub max_line_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}
