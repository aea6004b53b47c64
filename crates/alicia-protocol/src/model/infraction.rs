use std::io::Write;

use super::ids::Uid;
use crate::error::{CodecError, CodecResult};
use crate::time::PackedDateTime;
use crate::wire::{WireCodec, WireString};

/// The punishment an infraction carries. `None` is a retained record
/// with no active effect (e.g. a mute that has since expired but is
/// kept for history).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Punishment {
    #[default]
    None = 0,
    Mute = 1,
    Ban = 2,
}

impl WireCodec for Punishment {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        (*self as u8).write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        match u8::read_from(r)? {
            0 => Ok(Punishment::None),
            1 => Ok(Punishment::Mute),
            2 => Ok(Punishment::Ban),
            other => Err(CodecError::FieldOutOfRange { field: "Punishment", value: other as i64 }),
        }
    }
}

/// A disciplinary record against a user. The infraction system (see
/// `alicia-server`) evaluates every held infraction on login and folds
/// the still-active ones into a login verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Infraction {
    pub uid: Uid,
    pub punishment: Punishment,
    pub duration_minutes: u32,
    pub created_at: PackedDateTime,
    pub description: WireString,
}

impl Infraction {
    /// Whether this infraction's window has lapsed as of `now`. A
    /// `duration_minutes` of `u32::MAX` marks a permanent ban.
    pub fn has_expired(&self, now: PackedDateTime) -> bool {
        if self.duration_minutes == u32::MAX {
            return false;
        }
        let created_minutes = packed_to_minutes(self.created_at);
        let now_minutes = packed_to_minutes(now);
        now_minutes.saturating_sub(created_minutes) >= self.duration_minutes as i64
    }
}

fn packed_to_minutes(dt: PackedDateTime) -> i64 {
    let days_since_epoch = (dt.years as i64) * 365 + (dt.months as i64) * 30 + dt.days as i64;
    days_since_epoch * 24 * 60 + (dt.hours as i64) * 60 + dt.minutes as i64
}

impl WireCodec for Infraction {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.punishment.write_to(w)?;
        self.duration_minutes.write_to(w)?;
        self.created_at.to_u32().write_to(w)?;
        self.description.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            punishment: Punishment::read_from(r)?,
            duration_minutes: u32::read_from(r)?,
            created_at: PackedDateTime::from_u32(u32::read_from(r)?),
            description: WireString::read_from(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infraction_round_trip() {
        let original = Infraction {
            uid: Uid(1),
            punishment: Punishment::Mute,
            duration_minutes: 60,
            created_at: PackedDateTime::new(2024, 3, 1, 10, 0),
            description: "spam".into(),
        };
        let mut buf = Vec::new();
        original.write_to(&mut buf).unwrap();
        let mut cursor = &buf[..];
        assert_eq!(Infraction::read_from(&mut cursor).unwrap(), original);
    }

    #[test]
    fn expiry_respects_duration() {
        let infraction = Infraction {
            uid: Uid(1),
            punishment: Punishment::Mute,
            duration_minutes: 30,
            created_at: PackedDateTime::new(2024, 3, 1, 10, 0),
            description: "".into(),
        };
        assert!(!infraction.has_expired(PackedDateTime::new(2024, 3, 1, 10, 15)));
        assert!(infraction.has_expired(PackedDateTime::new(2024, 3, 1, 10, 45)));
    }

    #[test]
    fn permanent_ban_never_expires() {
        let infraction = Infraction {
            uid: Uid(1),
            punishment: Punishment::Ban,
            duration_minutes: u32::MAX,
            created_at: PackedDateTime::new(2000, 1, 1, 0, 0),
            description: "".into(),
        };
        assert!(!infraction.has_expired(PackedDateTime::new(2999, 1, 1, 0, 0)));
    }
}
