use alicia_protocol::model::{Infraction, Punishment, Uid};
use alicia_protocol::time::PackedDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;

#[derive(Debug, Clone)]
pub struct InfractionEntity {
    pub uid: Uid,
    pub punishment: Punishment,
    pub duration_minutes: u32,
    pub created_at: PackedDateTime,
    pub description: String,
}

impl InfractionEntity {
    pub fn to_wire(&self) -> Infraction {
        Infraction {
            uid: self.uid,
            punishment: self.punishment,
            duration_minutes: self.duration_minutes,
            created_at: self.created_at,
            description: self.description.as_str().into(),
        }
    }

    pub fn has_expired(&self, now: PackedDateTime) -> bool {
        self.to_wire().has_expired(now)
    }
}

impl DataEntity for InfractionEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfractionRow {
    pub uid: u32,
    pub punishment: u8,
    pub duration_minutes: u32,
    pub created_at: u32,
    pub description: String,
}

impl From<&InfractionEntity> for InfractionRow {
    fn from(e: &InfractionEntity) -> Self {
        Self {
            uid: e.uid.0,
            punishment: e.punishment as u8,
            duration_minutes: e.duration_minutes,
            created_at: e.created_at.to_u32(),
            description: e.description.clone(),
        }
    }
}

impl From<InfractionRow> for InfractionEntity {
    fn from(row: InfractionRow) -> Self {
        let punishment = match row.punishment {
            1 => Punishment::Mute,
            2 => Punishment::Ban,
            _ => Punishment::None,
        };
        Self {
            uid: Uid(row.uid),
            punishment,
            duration_minutes: row.duration_minutes,
            created_at: PackedDateTime::from_u32(row.created_at),
            description: row.description,
        }
    }
}
