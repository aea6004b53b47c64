use alicia_protocol::model::{Item, Tid, Uid};
use alicia_protocol::time::PackedDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;

/// A stack of a static item definition, or a timed ownership when
/// `count == 0` with a finite `expires_at`.
#[derive(Debug, Clone, Copy)]
pub struct ItemEntity {
    pub uid: Uid,
    pub tid: Tid,
    pub count: u32,
    pub expires_at: PackedDateTime,
}

impl ItemEntity {
    pub fn to_wire(&self) -> Item {
        Item { uid: self.uid, tid: self.tid, count: self.count, expires_at: self.expires_at }
    }
}

impl DataEntity for ItemEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemRow {
    pub uid: u32,
    pub tid: u32,
    pub count: u32,
    pub expires_at: u32,
}

impl From<&ItemEntity> for ItemRow {
    fn from(e: &ItemEntity) -> Self {
        Self { uid: e.uid.0, tid: e.tid.0, count: e.count, expires_at: e.expires_at.to_u32() }
    }
}

impl From<ItemRow> for ItemEntity {
    fn from(row: ItemRow) -> Self {
        Self {
            uid: Uid(row.uid),
            tid: Tid(row.tid),
            count: row.count,
            expires_at: PackedDateTime::from_u32(row.expires_at),
        }
    }
}
