use alicia_protocol::model::{Horse, HorseMastery, HorseParts, HorseRating, HorseStats, MountCondition, Tid, Uid};
use alicia_protocol::time::PackedDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;
use crate::field::Field;

/// The cached, field-tracked counterpart of `alicia_protocol::model::Horse`.
#[derive(Debug, Clone)]
pub struct HorseEntity {
    pub uid: Uid,
    pub tid: Tid,
    pub parts: Field<HorseParts>,
    pub stats: Field<HorseStats>,
    pub mastery: Field<HorseMastery>,
    pub rating: Field<HorseRating>,
    pub condition: Field<MountCondition>,
    pub potential_type: Field<u8>,
    pub potential_level: Field<u8>,
    pub luck_state: Field<u8>,
    pub emblem: Field<u32>,
    pub date_of_birth: PackedDateTime,
}

impl HorseEntity {
    pub fn new(uid: Uid, tid: Tid, date_of_birth: PackedDateTime) -> Self {
        Self {
            uid,
            tid,
            parts: Field::new(HorseParts::default()),
            stats: Field::new(HorseStats::default()),
            mastery: Field::new(HorseMastery::default()),
            rating: Field::new(HorseRating::default()),
            condition: Field::new(MountCondition::default()),
            potential_type: Field::new(0),
            potential_level: Field::new(0),
            luck_state: Field::new(0),
            emblem: Field::new(0),
            date_of_birth,
        }
    }

    pub fn to_wire(&self) -> Horse {
        Horse {
            uid: self.uid,
            tid: self.tid,
            parts: *self.parts.get(),
            stats: *self.stats.get(),
            mastery: *self.mastery.get(),
            rating: *self.rating.get(),
            condition: *self.condition.get(),
            potential_type: *self.potential_type.get(),
            potential_level: *self.potential_level.get(),
            luck_state: *self.luck_state.get(),
            emblem: *self.emblem.get(),
            date_of_birth: self.date_of_birth,
        }
    }
}

impl DataEntity for HorseEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HorseRow {
    pub uid: u32,
    pub tid: u32,
    pub parts: (u32, u32, u32, u32),
    pub stats: (u32, u32, u32, u32, u32),
    pub mastery: (u32, u32, u32, u32),
    pub rating: (u32, u8, u8, u32),
    pub condition: HorseConditionRow,
    pub potential_type: u8,
    pub potential_level: u8,
    pub luck_state: u8,
    pub emblem: u32,
    pub date_of_birth: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HorseConditionRow {
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

impl From<&HorseEntity> for HorseRow {
    fn from(e: &HorseEntity) -> Self {
        let parts = *e.parts.get();
        let stats = *e.stats.get();
        let mastery = *e.mastery.get();
        let rating = *e.rating.get();
        let c = *e.condition.get();
        Self {
            uid: e.uid.0,
            tid: e.tid.0,
            parts: (parts.skin.0, parts.mane.0, parts.tail.0, parts.face.0),
            stats: (stats.agility, stats.control, stats.speed, stats.strength, stats.spirit),
            mastery: (mastery.magic, mastery.jump, mastery.medley, mastery.combo),
            rating: (rating.rating, rating.class, rating.grade, rating.growth_points),
            condition: HorseConditionRow {
                stamina: c.stamina,
                charm: c.charm,
                friendliness: c.friendliness,
                injury: c.injury,
                plenitude: c.plenitude,
                dirtiness: c.dirtiness,
                polish: c.polish,
                attachment: c.attachment,
                boredom: c.boredom,
                stop_amends: c.stop_amends,
            },
            potential_type: *e.potential_type.get(),
            potential_level: *e.potential_level.get(),
            luck_state: *e.luck_state.get(),
            emblem: *e.emblem.get(),
            date_of_birth: e.date_of_birth.to_u32(),
        }
    }
}

impl From<HorseRow> for HorseEntity {
    fn from(row: HorseRow) -> Self {
        let c = row.condition;
        Self {
            uid: Uid(row.uid),
            tid: Tid(row.tid),
            parts: Field::new(HorseParts {
                skin: row.parts.0.into(),
                mane: row.parts.1.into(),
                tail: row.parts.2.into(),
                face: row.parts.3.into(),
            }),
            stats: Field::new(HorseStats {
                agility: row.stats.0,
                control: row.stats.1,
                speed: row.stats.2,
                strength: row.stats.3,
                spirit: row.stats.4,
            }),
            mastery: Field::new(HorseMastery {
                magic: row.mastery.0,
                jump: row.mastery.1,
                medley: row.mastery.2,
                combo: row.mastery.3,
            }),
            rating: Field::new(HorseRating {
                rating: row.rating.0,
                class: row.rating.1,
                grade: row.rating.2,
                growth_points: row.rating.3,
            }),
            condition: Field::new(MountCondition {
                stamina: c.stamina,
                charm: c.charm,
                friendliness: c.friendliness,
                injury: c.injury,
                plenitude: c.plenitude,
                dirtiness: c.dirtiness,
                polish: c.polish,
                attachment: c.attachment,
                boredom: c.boredom,
                stop_amends: c.stop_amends,
            }),
            potential_type: Field::new(row.potential_type),
            potential_level: Field::new(row.potential_level),
            luck_state: Field::new(row.luck_state),
            emblem: Field::new(row.emblem),
            date_of_birth: PackedDateTime::from_u32(row.date_of_birth),
        }
    }
}
