use std::io::Write;

use super::ids::{Tid, Uid};
use crate::error::CodecResult;
use crate::time::PackedDateTime;
use crate::wire::{WireCodec, WireString};

macro_rules! plain_struct_codec {
    ($name:ident { $($field:ident: $ty:ty),+ $(,)? }) => {
        impl WireCodec for $name {
            fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
                $(self.$field.write_to(w)?;)+
                Ok(())
            }

            fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
                Ok(Self { $($field: <$ty>::read_from(r)?,)+ })
            }
        }
    };
}

/// Skin/mane/tail/face TIDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HorseParts {
    pub skin: Tid,
    pub mane: Tid,
    pub tail: Tid,
    pub face: Tid,
}

plain_struct_codec!(HorseParts { skin: Tid, mane: Tid, tail: Tid, face: Tid });

/// Agility/control/speed/strength/spirit, each accumulated through
/// training and capped by the horse's grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HorseStats {
    pub agility: u32,
    pub control: u32,
    pub speed: u32,
    pub strength: u32,
    pub spirit: u32,
}

plain_struct_codec!(HorseStats {
    agility: u32,
    control: u32,
    speed: u32,
    strength: u32,
    spirit: u32,
});

/// Four cumulative mastery counters, incremented by race/training use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HorseMastery {
    pub magic: u32,
    pub jump: u32,
    pub medley: u32,
    pub combo: u32,
}

plain_struct_codec!(HorseMastery { magic: u32, jump: u32, medley: u32, combo: u32 });

/// The rating/class/grade tuple and the growth points accrued toward
/// the next grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HorseRating {
    pub rating: u32,
    pub class: u8,
    pub grade: u8,
    pub growth_points: u32,
}

plain_struct_codec!(HorseRating {
    rating: u32,
    class: u8,
    grade: u8,
    growth_points: u32,
});

/// The mount-condition block: care meters decayed over time by the
/// ranch tick and restored by feeding/brushing/washing interactions
/// (see the Ranch director's stuff handler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountCondition {
    pub stamina: u16,
    pub charm: u16,
    pub friendliness: u16,
    pub injury: u16,
    pub plenitude: u16,
    pub dirtiness: [u16; 3],
    pub polish: [u16; 3],
    pub attachment: u16,
    pub boredom: u16,
    pub stop_amends: u16,
}

impl WireCodec for MountCondition {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.stamina.write_to(w)?;
        self.charm.write_to(w)?;
        self.friendliness.write_to(w)?;
        self.injury.write_to(w)?;
        self.plenitude.write_to(w)?;
        for v in self.dirtiness {
            v.write_to(w)?;
        }
        for v in self.polish {
            v.write_to(w)?;
        }
        self.attachment.write_to(w)?;
        self.boredom.write_to(w)?;
        self.stop_amends.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            stamina: u16::read_from(r)?,
            charm: u16::read_from(r)?,
            friendliness: u16::read_from(r)?,
            injury: u16::read_from(r)?,
            plenitude: u16::read_from(r)?,
            dirtiness: [u16::read_from(r)?, u16::read_from(r)?, u16::read_from(r)?],
            polish: [u16::read_from(r)?, u16::read_from(r)?, u16::read_from(r)?],
            attachment: u16::read_from(r)?,
            boredom: u16::read_from(r)?,
            stop_amends: u16::read_from(r)?,
        })
    }
}

/// A horse: the game's second playable-adjacent entity, always owned by
/// exactly one character and ridden by at most one at a time (the
/// rider relationship lives on [`super::Character::mount_uid`], not
/// here).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horse {
    pub uid: Uid,
    pub tid: Tid,
    pub parts: HorseParts,
    pub stats: HorseStats,
    pub mastery: HorseMastery,
    pub rating: HorseRating,
    pub condition: MountCondition,
    pub potential_type: u8,
    pub potential_level: u8,
    pub luck_state: u8,
    pub emblem: u32,
    pub date_of_birth: PackedDateTime,
}

impl WireCodec for Horse {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.tid.write_to(w)?;
        self.parts.write_to(w)?;
        self.stats.write_to(w)?;
        self.mastery.write_to(w)?;
        self.rating.write_to(w)?;
        self.condition.write_to(w)?;
        self.potential_type.write_to(w)?;
        self.potential_level.write_to(w)?;
        self.luck_state.write_to(w)?;
        self.emblem.write_to(w)?;
        self.date_of_birth.to_u32().write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            tid: Tid::read_from(r)?,
            parts: HorseParts::read_from(r)?,
            stats: HorseStats::read_from(r)?,
            mastery: HorseMastery::read_from(r)?,
            rating: HorseRating::read_from(r)?,
            condition: MountCondition::read_from(r)?,
            potential_type: u8::read_from(r)?,
            potential_level: u8::read_from(r)?,
            luck_state: u8::read_from(r)?,
            emblem: u32::read_from(r)?,
            date_of_birth: PackedDateTime::from_u32(u32::read_from(r)?),
        })
    }
}

/// A horse name is stored separately from the fixed-shape [`Horse`]
/// record because it is user-editable independent of the rest, unlike
/// a character's nickname which gates creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorseName(pub WireString);

impl WireCodec for HorseName {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.0.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self(WireString::read_from(r)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horse_round_trip() {
        let original = Horse {
            uid: Uid(9),
            tid: Tid(2001),
            parts: HorseParts { skin: Tid(1), mane: Tid(2), tail: Tid(3), face: Tid(4) },
            stats: HorseStats { agility: 10, control: 11, speed: 12, strength: 13, spirit: 14 },
            mastery: HorseMastery { magic: 1, jump: 2, medley: 3, combo: 4 },
            rating: HorseRating { rating: 1200, class: 3, grade: 2, growth_points: 500 },
            condition: MountCondition {
                stamina: 80,
                charm: 70,
                friendliness: 60,
                injury: 0,
                plenitude: 90,
                dirtiness: [1, 2, 3],
                polish: [4, 5, 6],
                attachment: 50,
                boredom: 10,
                stop_amends: 0,
            },
            potential_type: 1,
            potential_level: 2,
            luck_state: 0,
            emblem: 77,
            date_of_birth: PackedDateTime::new(2022, 4, 1, 0, 0),
        };

        let mut buf = Vec::new();
        original.write_to(&mut buf).unwrap();
        let mut cursor = &buf[..];
        assert_eq!(Horse::read_from(&mut cursor).unwrap(), original);
        assert!(cursor.is_empty());
    }
}
