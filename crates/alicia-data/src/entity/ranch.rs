use alicia_protocol::model::{Housing, Ranch, Tid, Uid};
use alicia_protocol::time::PackedDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;

/// A character's persistent world location. Housing is small enough
/// (a handful of placed decorations per ranch) that the whole
/// collection is replaced on write rather than tracked per-element;
/// the cache's entry-level dirty flag covers this fine.
#[derive(Debug, Clone)]
pub struct RanchEntity {
    pub uid: Uid,
    pub name: String,
    pub housing: Vec<Housing>,
}

impl RanchEntity {
    pub fn new(uid: Uid, name: String) -> Self {
        Self { uid, name, housing: Vec::new() }
    }

    pub fn to_wire(&self) -> Ranch {
        Ranch { uid: self.uid, name: self.name.as_str().into(), housing: self.housing.clone().into() }
    }
}

impl DataEntity for RanchEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HousingRow {
    pub uid: u32,
    pub tid: u32,
    pub durability: u32,
    pub expires_at: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RanchRow {
    pub uid: u32,
    pub name: String,
    #[serde(default)]
    pub housing: Vec<HousingRow>,
}

impl From<&RanchEntity> for RanchRow {
    fn from(e: &RanchEntity) -> Self {
        Self {
            uid: e.uid.0,
            name: e.name.clone(),
            housing: e
                .housing
                .iter()
                .map(|h| HousingRow { uid: h.uid.0, tid: h.tid.0, durability: h.durability, expires_at: h.expires_at.to_u32() })
                .collect(),
        }
    }
}

impl From<RanchRow> for RanchEntity {
    fn from(row: RanchRow) -> Self {
        Self {
            uid: Uid(row.uid),
            name: row.name,
            housing: row
                .housing
                .into_iter()
                .map(|h| Housing {
                    uid: Uid(h.uid),
                    tid: Tid(h.tid),
                    durability: h.durability,
                    expires_at: PackedDateTime::from_u32(h.expires_at),
                })
                .collect(),
        }
    }
}
