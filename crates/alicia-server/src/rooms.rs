//! Race rooms: allocated out of the Lobby's `MakeRoom`, then joined by
//! presenting the room's uid plus an OTP to the Race service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use alicia_protocol::model::Uid;

#[derive(Debug, Clone)]
pub struct Room {
    pub uid: Uid,
    pub name: String,
    pub password: String,
    pub map: u32,
    pub race_kind: u8,
    pub max_racers: u8,
    pub races_hosted: u32,
}

/// Rooms are monotonically allocated and explicitly deleted; there is
/// no background reaper, matching the reference (a room's lifetime is
/// tied to whoever still has a reference to its uid).
#[derive(Default)]
pub struct RoomSystem {
    next_uid: AtomicU32,
    rooms: Mutex<HashMap<Uid, Room>>,
}

impl RoomSystem {
    pub fn new() -> Self {
        Self { next_uid: AtomicU32::new(1), rooms: Mutex::new(HashMap::new()) }
    }

    pub fn create(&self, name: String, password: String, map: u32, race_kind: u8, max_racers: u8) -> Room {
        let uid = Uid(self.next_uid.fetch_add(1, Ordering::Relaxed));
        let room = Room { uid, name, password, map, race_kind, max_racers, races_hosted: 0 };
        self.rooms.lock().insert(uid, room.clone());
        room
    }

    pub fn get(&self, uid: Uid) -> Option<Room> {
        self.rooms.lock().get(&uid).cloned()
    }

    pub fn delete(&self, uid: Uid) {
        self.rooms.lock().remove(&uid);
    }

    pub fn record_race_hosted(&self, uid: Uid) {
        if let Some(room) = self.rooms.lock().get_mut(&uid) {
            room.races_hosted += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uids_are_monotonic_and_not_reused() {
        let rooms = RoomSystem::new();
        let a = rooms.create("a".into(), "".into(), 0, 0, 8);
        let b = rooms.create("b".into(), "".into(), 0, 0, 8);
        assert_ne!(a.uid, b.uid);
        rooms.delete(a.uid);
        assert!(rooms.get(a.uid).is_none());
        assert!(rooms.get(b.uid).is_some());
    }
}
