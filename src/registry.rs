//! Room registry
//!
//! Process-wide map from room name to `Room`. Rooms are created on first
//! reference and are never removed.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::room::Room;

/// Shared room directory
///
/// Cheap to share behind an `Arc`; every session resolves its room here.
#[derive(Debug, Default)]
pub struct Registry {
    /// All rooms: name -> Room (case-sensitive)
    rooms: RwLock<HashMap<String, Arc<Room>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the room called `name`, creating it if needed
    ///
    /// Concurrent callers asking for the same name always get the same
    /// instance: the existence check is repeated under the write lock.
    pub fn get_or_create_room(&self, name: &str) -> Arc<Room> {
        if let Some(room) = self.rooms.read().get(name) {
            return Arc::clone(room);
        }

        let mut rooms = self.rooms.write();
        let room = rooms.entry(name.to_string()).or_insert_with(|| {
            info!("Room {} created", name);
            Arc::new(Room::new(name.to_string()))
        });
        Arc::clone(room)
    }

    /// Look up a room without creating it
    pub fn room(&self, name: &str) -> Option<Arc<Room>> {
        self.rooms.read().get(name).cloned()
    }

    /// Number of registered rooms
    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }

    /// Names of all registered rooms, sorted
    pub fn room_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rooms.read().keys().cloned().collect();
        names.sort();
        names
    }
}
