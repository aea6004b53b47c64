//! Per-instance UID↔OID tracking for the occupants of one ranch or
//! race room. Two disjoint namespaces (characters, horses) share one
//! monotonic counter, mirroring the reference's world tracker.

use std::collections::HashMap;

use alicia_protocol::model::{Oid, Uid};

#[derive(Default)]
struct Namespace {
    uid_to_oid: HashMap<Uid, Oid>,
    oid_to_uid: HashMap<Oid, Uid>,
}

impl Namespace {
    fn add(&mut self, uid: Uid, next_oid: &mut u16) -> Oid {
        if let Some(&existing) = self.uid_to_oid.get(&uid) {
            return existing;
        }
        let oid = Oid(*next_oid);
        *next_oid += 1;
        self.uid_to_oid.insert(uid, oid);
        self.oid_to_uid.insert(oid, uid);
        oid
    }

    fn remove(&mut self, uid: Uid) {
        if let Some(oid) = self.uid_to_oid.remove(&uid) {
            self.oid_to_uid.remove(&oid);
        }
    }

    fn get(&self, uid: Uid) -> Oid {
        self.uid_to_oid.get(&uid).copied().unwrap_or(Oid::INVALID)
    }
}

/// Scoped to one ranch/race instance; dropped entirely when that
/// instance is torn down, so OIDs are never reused across instances
/// but always restart from 1 within a fresh one.
pub struct WorldTracker {
    characters: Namespace,
    horses: Namespace,
    next_oid: u16,
}

impl Default for WorldTracker {
    fn default() -> Self {
        Self { characters: Namespace::default(), horses: Namespace::default(), next_oid: 1 }
    }
}

impl WorldTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_character(&mut self, uid: Uid) -> Oid {
        self.characters.add(uid, &mut self.next_oid)
    }

    pub fn remove_character(&mut self, uid: Uid) {
        self.characters.remove(uid);
    }

    pub fn character_oid(&self, uid: Uid) -> Oid {
        self.characters.get(uid)
    }

    pub fn character_uids(&self) -> impl Iterator<Item = Uid> + '_ {
        self.characters.uid_to_oid.keys().copied()
    }

    pub fn add_horse(&mut self, uid: Uid) -> Oid {
        self.horses.add(uid, &mut self.next_oid)
    }

    pub fn remove_horse(&mut self, uid: Uid) {
        self.horses.remove(uid);
    }

    pub fn horse_oid(&self, uid: Uid) -> Oid {
        self.horses.get(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oids_are_never_reused_within_one_tracker() {
        let mut tracker = WorldTracker::new();
        let a = tracker.add_character(Uid(1));
        let b = tracker.add_character(Uid(2));
        assert_ne!(a, b);
        tracker.remove_character(Uid(1));
        let c = tracker.add_character(Uid(3));
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn characters_and_horses_are_disjoint_namespaces() {
        let mut tracker = WorldTracker::new();
        let char_oid = tracker.add_character(Uid(1));
        let horse_oid = tracker.add_horse(Uid(1));
        assert_ne!(char_oid, horse_oid);
    }

    #[test]
    fn missing_uid_reports_invalid_oid() {
        let tracker = WorldTracker::new();
        assert!(!tracker.character_oid(Uid(99)).is_valid());
    }
}
