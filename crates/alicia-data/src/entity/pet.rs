use alicia_protocol::model::{Pet, Tid, Uid};
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;

#[derive(Debug, Clone)]
pub struct PetEntity {
    pub uid: Uid,
    pub tid: Tid,
    pub name: String,
}

impl PetEntity {
    pub fn to_wire(&self) -> Pet {
        Pet { uid: self.uid, tid: self.tid, name: self.name.as_str().into() }
    }
}

impl DataEntity for PetEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PetRow {
    pub uid: u32,
    pub tid: u32,
    pub name: String,
}

impl From<&PetEntity> for PetRow {
    fn from(e: &PetEntity) -> Self {
        Self { uid: e.uid.0, tid: e.tid.0, name: e.name.clone() }
    }
}

impl From<PetRow> for PetEntity {
    fn from(row: PetRow) -> Self {
        Self { uid: Uid(row.uid), tid: Tid(row.tid), name: row.name }
    }
}
