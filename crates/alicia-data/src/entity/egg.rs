use alicia_protocol::model::{Egg, Tid, Uid};
use alicia_protocol::time::PackedDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;

#[derive(Debug, Clone, Copy)]
pub struct EggEntity {
    pub uid: Uid,
    pub tid: Tid,
    pub hatch_at: PackedDateTime,
}

impl EggEntity {
    pub fn to_wire(&self) -> Egg {
        Egg { uid: self.uid, tid: self.tid, hatch_at: self.hatch_at }
    }

    pub fn has_hatched(&self, now: PackedDateTime) -> bool {
        now.to_u32() >= self.hatch_at.to_u32()
    }
}

impl DataEntity for EggEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EggRow {
    pub uid: u32,
    pub tid: u32,
    pub hatch_at: u32,
}

impl From<&EggEntity> for EggRow {
    fn from(e: &EggEntity) -> Self {
        Self { uid: e.uid.0, tid: e.tid.0, hatch_at: e.hatch_at.to_u32() }
    }
}

impl From<EggRow> for EggEntity {
    fn from(row: EggRow) -> Self {
        Self { uid: Uid(row.uid), tid: Tid(row.tid), hatch_at: PackedDateTime::from_u32(row.hatch_at) }
    }
}
