//! Error types for the chat relay
//!
//! Defines session-level errors and handshake failures.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Session-level errors
///
/// Covers both fatal errors (connection termination) and
/// recoverable errors (reported to the client, session continues).
#[derive(Debug, Error)]
pub enum ChatError {
    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input line over the configured limit (fatal)
    #[error("line too long: {actual} bytes (limit {limit})")]
    LineTooLong { actual: usize, limit: usize },

    /// JOIN handshake failed; the session never joined a room
    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    /// Slash-command with no handler (recoverable)
    #[error("Unknown command '/{0}'")]
    UnknownCommand(String),
}

/// Reasons the JOIN handshake can fail
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandshakeError {
    /// No line arrived within the handshake timeout
    #[error("handshake timed out")]
    Timeout,

    /// Peer closed the connection before sending JOIN
    #[error("client disconnected before joining")]
    Disconnected,

    /// First line was not `JOIN <room> <nick>`
    #[error("expected: JOIN <room> <nick>")]
    Malformed,
}
