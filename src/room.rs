//! Room struct definition
//!
//! Represents one named chat channel and the clients currently in it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::client::Client;
use crate::message::ServerMessage;
use crate::types::SessionId;

/// Named chat room
///
/// Membership changes take the write lock; broadcasts and listings share the
/// read lock, so any number of them can run at once.
#[derive(Debug)]
pub struct Room {
    /// Room name, the registry key
    name: String,
    /// Joined clients: SessionId -> Client
    members: RwLock<HashMap<SessionId, Arc<Client>>>,
}

impl Room {
    /// Create a new empty room
    pub fn new(name: String) -> Self {
        Self {
            name,
            members: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a client and announce it to everyone, the joiner included
    pub fn join(&self, client: Arc<Client>) {
        let nick = client.nick.clone();
        self.members.write().insert(client.id, client);
        debug!("{} joined room {}", nick, self.name);

        self.broadcast(ServerMessage::MemberJoined { nick });
    }

    /// Remove a client and announce the departure to those who remain
    ///
    /// Returns false (and announces nothing) if the client was not a member.
    pub fn leave(&self, id: SessionId) -> bool {
        let removed = self.members.write().remove(&id);

        match removed {
            Some(client) => {
                debug!("{} left room {}", client.nick, self.name);
                self.broadcast(ServerMessage::MemberLeft {
                    nick: client.nick.clone(),
                });
                true
            }
            None => false,
        }
    }

    /// Deliver a message to every member without blocking
    ///
    /// Returns the number of members whose queue accepted it.
    pub fn broadcast(&self, msg: ServerMessage) -> usize {
        let members = self.members.read();
        members
            .values()
            .filter(|client| client.enqueue(msg.clone()))
            .count()
    }

    /// Deliver a message to every member except `sender`
    pub fn broadcast_except(&self, sender: SessionId, msg: ServerMessage) -> usize {
        let members = self.members.read();
        members
            .values()
            .filter(|client| client.id != sender)
            .filter(|client| client.enqueue(msg.clone()))
            .count()
    }

    /// Snapshot of member nicknames, sorted
    pub fn nicknames(&self) -> Vec<String> {
        let mut nicks: Vec<String> = self
            .members
            .read()
            .values()
            .map(|client| client.nick.clone())
            .collect();
        nicks.sort();
        nicks
    }

    /// Check if a session is in this room
    pub fn contains(&self, id: SessionId) -> bool {
        self.members.read().contains_key(&id)
    }

    /// Number of joined clients
    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn member(nick: &str, capacity: usize) -> (Arc<Client>, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        let client = Arc::new(Client::new(SessionId::new(), nick.to_string(), tx));
        (client, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[test]
    fn test_room_creation() {
        let room = Room::new("general".to_string());

        assert_eq!(room.name(), "general");
        assert!(room.is_empty());
        assert_eq!(room.len(), 0);
        assert!(room.nicknames().is_empty());
    }

    #[test]
    fn test_joiner_receives_own_notice() {
        let room = Room::new("general".to_string());
        let (alice, mut alice_rx) = member("alice", 8);

        room.join(alice.clone());

        assert!(room.contains(alice.id));
        assert_eq!(
            drain(&mut alice_rx),
            vec![ServerMessage::MemberJoined {
                nick: "alice".to_string()
            }]
        );
    }

    #[test]
    fn test_leaver_never_receives_own_notice() {
        let room = Room::new("general".to_string());
        let (alice, mut alice_rx) = member("alice", 8);
        let (bob, mut bob_rx) = member("bob", 8);
        room.join(alice.clone());
        room.join(bob.clone());
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        assert!(room.leave(alice.id));

        assert!(drain(&mut alice_rx).is_empty());
        assert_eq!(
            drain(&mut bob_rx),
            vec![ServerMessage::MemberLeft {
                nick: "alice".to_string()
            }]
        );
    }

    #[test]
    fn test_leave_absent_is_silent() {
        let room = Room::new("general".to_string());
        let (bob, mut bob_rx) = member("bob", 8);
        room.join(bob);
        drain(&mut bob_rx);

        assert!(!room.leave(SessionId::new()));
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[test]
    fn test_membership_tracks_joins_and_leaves() {
        let room = Room::new("general".to_string());
        let (alice, _a) = member("alice", 8);
        let (bob, _b) = member("bob", 8);
        let (carol, _c) = member("carol", 8);

        room.join(alice.clone());
        room.join(bob.clone());
        assert_eq!(room.nicknames(), vec!["alice", "bob"]);

        room.leave(alice.id);
        assert_eq!(room.nicknames(), vec!["bob"]);

        room.join(carol.clone());
        assert_eq!(room.nicknames(), vec!["bob", "carol"]);

        room.leave(bob.id);
        room.leave(bob.id);
        room.leave(carol.id);
        assert!(room.is_empty());
    }

    #[test]
    fn test_broadcast_reaches_all_members() {
        let room = Room::new("general".to_string());
        let mut receivers = Vec::new();
        for nick in ["alice", "bob", "carol"] {
            let (client, rx) = member(nick, 8);
            room.join(client);
            receivers.push(rx);
        }
        for rx in receivers.iter_mut() {
            drain(rx);
        }

        let delivered = room.broadcast(ServerMessage::Help);

        assert_eq!(delivered, 3);
        for rx in receivers.iter_mut() {
            assert_eq!(drain(rx), vec![ServerMessage::Help]);
        }
    }

    #[test]
    fn test_full_queue_only_affects_that_member() {
        let room = Room::new("general".to_string());
        // capacity 1: the join notice fills alice's queue
        let (alice, mut alice_rx) = member("alice", 1);
        room.join(alice);
        let (bob, mut bob_rx) = member("bob", 8);
        room.join(bob);
        drain(&mut bob_rx);

        let delivered = room.broadcast(ServerMessage::Help);

        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut bob_rx), vec![ServerMessage::Help]);
        assert_eq!(
            drain(&mut alice_rx),
            vec![ServerMessage::MemberJoined {
                nick: "alice".to_string()
            }]
        );
    }

    #[test]
    fn test_broadcast_except_skips_sender() {
        let room = Room::new("general".to_string());
        let (alice, mut alice_rx) = member("alice", 8);
        let (bob, mut bob_rx) = member("bob", 8);
        room.join(alice.clone());
        room.join(bob);
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        let msg = ServerMessage::chat("alice", "hello");
        let delivered = room.broadcast_except(alice.id, msg.clone());

        assert_eq!(delivered, 1);
        assert!(drain(&mut alice_rx).is_empty());
        assert_eq!(drain(&mut bob_rx), vec![msg]);
    }
}
