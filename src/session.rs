//! Per-connection session state
//!
//! A `Session` exists from the moment a connection completes its JOIN
//! handshake until it is dropped. It owns the session's handle on its
//! `Client` (and therefore the producer side of the outbound queue) and the
//! room it joined.

use std::sync::Arc;

use tracing::debug;

use crate::client::Client;
use crate::command::{self, Flow, COMMAND_PREFIX};
use crate::message::ServerMessage;
use crate::room::Room;

/// Lifecycle of a joined session
///
/// A connection still waiting for JOIN has no `Session` yet, and a closed one
/// no longer has one: both ends of the lifecycle are the value's absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// In a room, read and write loops running
    Joined,
    /// Left the room, outbound queue about to close
    Closing,
}

/// A joined connection
///
/// Dropping a session leaves its room (if it has not already) and then
/// releases the last sender of its outbound queue, which lets the write
/// loop drain and finish.
#[derive(Debug)]
pub struct Session {
    client: Arc<Client>,
    room: Arc<Room>,
    peer: String,
    state: SessionState,
}

impl Session {
    /// Complete the handshake: confirm, enter the room, send the help text
    pub fn join(client: Arc<Client>, room: Arc<Room>, peer: String) -> Self {
        client.enqueue(ServerMessage::Joined {
            room: room.name().to_string(),
            nick: client.nick.clone(),
        });
        room.join(Arc::clone(&client));
        client.enqueue(ServerMessage::Help);

        Self {
            client,
            room,
            peer,
            state: SessionState::Joined,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Handle one inbound line from the read loop
    ///
    /// Blank lines are ignored, command lines are dispatched and everything
    /// else is relayed to the other members of the room.
    pub fn handle_line(&self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        if line.starts_with(COMMAND_PREFIX) {
            return command::dispatch(self, line);
        }

        let msg = ServerMessage::chat(&self.client.nick, line);
        self.room.broadcast_except(self.client.id, msg);
        Flow::Continue
    }

    /// Leave the room once; later calls do nothing
    ///
    /// Returns true on the call that actually left.
    pub fn leave(&mut self) -> bool {
        if self.state != SessionState::Joined {
            return false;
        }
        self.state = SessionState::Closing;
        self.room.leave(self.client.id);
        debug!(
            "Session {} ({}) left room {}",
            self.client.id,
            self.peer,
            self.room.name()
        );
        true
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.leave();
    }
}
