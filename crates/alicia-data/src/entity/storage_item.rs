use alicia_protocol::model::{StorageItem, Uid};
use alicia_protocol::time::PackedDateTime;
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;

/// A gift-inbox or shop-delivery bundle of item UIDs.
#[derive(Debug, Clone)]
pub struct StorageItemEntity {
    pub uid: Uid,
    pub item_uids: Vec<Uid>,
    pub sender: String,
    pub message: String,
    pub created_at: PackedDateTime,
    pub checked: bool,
    pub expired: bool,
}

impl StorageItemEntity {
    pub fn to_wire(&self) -> StorageItem {
        StorageItem {
            uid: self.uid,
            item_uids: self.item_uids.clone().into(),
            sender: self.sender.as_str().into(),
            message: self.message.as_str().into(),
            created_at: self.created_at,
            checked: self.checked,
            expired: self.expired,
        }
    }
}

impl DataEntity for StorageItemEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageItemRow {
    pub uid: u32,
    pub item_uids: Vec<u32>,
    pub sender: String,
    pub message: String,
    pub created_at: u32,
    pub checked: bool,
    pub expired: bool,
}

impl From<&StorageItemEntity> for StorageItemRow {
    fn from(e: &StorageItemEntity) -> Self {
        Self {
            uid: e.uid.0,
            item_uids: e.item_uids.iter().map(|u| u.0).collect(),
            sender: e.sender.clone(),
            message: e.message.clone(),
            created_at: e.created_at.to_u32(),
            checked: e.checked,
            expired: e.expired,
        }
    }
}

impl From<StorageItemRow> for StorageItemEntity {
    fn from(row: StorageItemRow) -> Self {
        Self {
            uid: Uid(row.uid),
            item_uids: row.item_uids.into_iter().map(Uid).collect(),
            sender: row.sender,
            message: row.message,
            created_at: PackedDateTime::from_u32(row.created_at),
            checked: row.checked,
            expired: row.expired,
        }
    }
}
