//! Line protocol definitions
//!
//! Everything the server writes to a client is a `ServerMessage`. The
//! outbound queues carry these values; the write loop renders each one with
//! its `Display` impl and frames it as a line.

use std::fmt;

use chrono::{Local, NaiveTime};

use crate::command::Command;
use crate::error::ChatError;

/// Greeting sent as soon as a connection is accepted
pub const WELCOME: &str = "Welcome! Please enter JOIN <room> <nick>";

/// Server → Client line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Handshake prompt
    Welcome,
    /// Confirmation sent to a session that just completed JOIN
    Joined { room: String, nick: String },
    /// A member entered the room (joiner included)
    MemberJoined { nick: String },
    /// A member left the room
    MemberLeft { nick: String },
    /// Chat line relayed from another member
    Chat {
        time: NaiveTime,
        nick: String,
        text: String,
    },
    /// Reply to `/list`
    UserList { room: String, nicks: Vec<String> },
    /// Reply to `/help` and part of the join greeting
    Help,
    /// Protocol or command error
    Error { message: String },
}

impl ServerMessage {
    /// Build a chat line stamped with the current local time
    pub fn chat(nick: &str, text: &str) -> Self {
        ServerMessage::Chat {
            time: Local::now().time(),
            nick: nick.to_string(),
            text: text.to_string(),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Welcome => f.write_str(WELCOME),
            ServerMessage::Joined { room, nick } => {
                write!(f, "*** Joined room '{}' as '{}'", room, nick)
            }
            ServerMessage::MemberJoined { nick } => write!(f, "*** {} joined the room.", nick),
            ServerMessage::MemberLeft { nick } => write!(f, "*** {} left the room.", nick),
            ServerMessage::Chat { time, nick, text } => {
                write!(f, "[{}] {}: {}", time.format("%H:%M:%S"), nick, text)
            }
            ServerMessage::UserList { room, nicks } => {
                write!(f, "*** Users in {}: {}", room, nicks.join(", "))
            }
            ServerMessage::Help => {
                f.write_str("*** Available commands:")?;
                for cmd in Command::ALL {
                    write!(f, "\n    /{} - {}", cmd.keyword(), cmd.description())?;
                }
                Ok(())
            }
            ServerMessage::Error { message } => write!(f, "ERR: {}", message),
        }
    }
}

/// Convert a ChatError into the error line shown to the client
impl From<&ChatError> for ServerMessage {
    fn from(err: &ChatError) -> Self {
        ServerMessage::Error {
            message: err.to_string(),
        }
    }
}
