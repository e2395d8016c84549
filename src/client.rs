//! Client struct definition
//!
//! Represents a joined session as seen by its room: identity, nickname and
//! the producer side of its outbound queue.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use crate::message::ServerMessage;
use crate::types::SessionId;

/// Joined client information
///
/// Shared between the session that owns it and the room it joined.
/// The session's write loop holds the receiving end of `sender`.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Nickname chosen at JOIN
    pub nick: String,
    /// Server → Client outbound queue
    sender: mpsc::Sender<ServerMessage>,
}

impl Client {
    /// Create a new client with the given ID, nickname and queue sender
    pub fn new(id: SessionId, nick: String, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self { id, nick, sender }
    }

    /// Queue a message for this client without waiting
    ///
    /// Returns false when the message was dropped because the queue is full
    /// or the write loop has already gone away.
    pub fn enqueue(&self, msg: ServerMessage) -> bool {
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Outbound queue full for {} ({}), dropping message", self.nick, self.id);
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_delivers_in_order() {
        let (tx, mut rx) = mpsc::channel(4);
        let client = Client::new(SessionId::new(), "alice".to_string(), tx);

        assert!(client.enqueue(ServerMessage::Welcome));
        assert!(client.enqueue(ServerMessage::Help));

        assert_eq!(rx.recv().await, Some(ServerMessage::Welcome));
        assert_eq!(rx.recv().await, Some(ServerMessage::Help));
    }

    #[tokio::test]
    async fn test_enqueue_drops_newest_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let client = Client::new(SessionId::new(), "alice".to_string(), tx);

        assert!(client.enqueue(ServerMessage::Welcome));
        assert!(!client.enqueue(ServerMessage::Help));

        assert_eq!(rx.recv().await, Some(ServerMessage::Welcome));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_enqueue_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let client = Client::new(SessionId::new(), "alice".to_string(), tx);
        drop(rx);

        assert!(!client.enqueue(ServerMessage::Welcome));
    }
}
