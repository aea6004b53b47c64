//! Login-time evaluation of a user's outstanding infractions against
//! the ban/mute policy.

use alicia_data::{Cache, DataDirector};
use alicia_protocol::model::Uid;
use alicia_protocol::time::PackedDateTime;

/// What the infractions on record say about a login attempt. Returned
/// to the lobby login flow, never enforced here directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verdict {
    pub prevent_server_joining: bool,
    pub prevent_chatting: bool,
}

#[derive(Default)]
pub struct InfractionSystem;

impl InfractionSystem {
    pub fn new() -> Self {
        Self
    }

    /// Walks `user_infraction_uids` through the infraction cache,
    /// skipping any whose (createdAt + duration) has already elapsed.
    /// Entries not yet available in the cache are treated as
    /// not-yet-contributing (evaluated again on the next login since
    /// the cache will have filled in by then).
    pub fn evaluate(&self, director: &DataDirector, user_infraction_uids: &[Uid], now: PackedDateTime) -> Verdict {
        evaluate_against(&director.infractions, user_infraction_uids, now)
    }
}

fn evaluate_against(
    infractions: &Cache<alicia_data::entity::InfractionEntity>,
    uids: &[Uid],
    now: PackedDateTime,
) -> Verdict {
    let mut verdict = Verdict::default();
    for &uid in uids {
        let Some(record) = infractions.get(uid) else { continue };
        record.immutable(|infraction| {
            if infraction.has_expired(now) {
                return;
            }
            match infraction.punishment {
                alicia_protocol::model::Punishment::Ban => verdict.prevent_server_joining = true,
                alicia_protocol::model::Punishment::Mute => verdict.prevent_chatting = true,
                alicia_protocol::model::Punishment::None => {}
            }
        });
    }
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use alicia_data::entity::InfractionEntity;
    use alicia_protocol::model::Punishment;

    fn infraction(uid: Uid, punishment: Punishment, created_at: PackedDateTime, duration_minutes: u32) -> InfractionEntity {
        InfractionEntity { uid, punishment, duration_minutes, created_at, description: String::new() }
    }

    #[test]
    fn expired_ban_does_not_prevent_joining() {
        let cache: Cache<InfractionEntity> = Cache::new();
        let created = PackedDateTime::new(2020, 1, 1, 0, 0);
        let record = cache.create(infraction(Uid(1), Punishment::Ban, created, 1)).unwrap();
        let _ = record;
        let now = PackedDateTime::new(2024, 1, 1, 0, 0);
        let verdict = evaluate_against(&cache, &[Uid(1)], now);
        assert!(!verdict.prevent_server_joining);
    }

    #[test]
    fn active_ban_prevents_joining() {
        let cache: Cache<InfractionEntity> = Cache::new();
        let created = PackedDateTime::new(2024, 1, 1, 0, 0);
        cache.create(infraction(Uid(1), Punishment::Ban, created, u32::MAX)).unwrap();
        let now = PackedDateTime::new(2024, 1, 2, 0, 0);
        let verdict = evaluate_against(&cache, &[Uid(1)], now);
        assert!(verdict.prevent_server_joining);
    }

    #[test]
    fn active_mute_prevents_chatting_only() {
        let cache: Cache<InfractionEntity> = Cache::new();
        let created = PackedDateTime::new(2024, 1, 1, 0, 0);
        cache.create(infraction(Uid(1), Punishment::Mute, created, u32::MAX)).unwrap();
        let now = PackedDateTime::new(2024, 1, 2, 0, 0);
        let verdict = evaluate_against(&cache, &[Uid(1)], now);
        assert!(verdict.prevent_chatting);
        assert!(!verdict.prevent_server_joining);
    }
}
