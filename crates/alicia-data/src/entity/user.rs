use alicia_protocol::model::Uid;
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;
use crate::field::Field;

/// The account record: a unique login name, an opaque authorization
/// token, the bound character (0 until character creation completes),
/// and the infractions held against this account.
#[derive(Debug, Clone)]
pub struct UserEntity {
    pub uid: Uid,
    pub name: Field<String>,
    pub token: Field<String>,
    pub character_uid: Field<Uid>,
    pub infractions: Field<Vec<Uid>>,
}

impl UserEntity {
    pub fn new(uid: Uid, name: String, token: String) -> Self {
        Self {
            uid,
            name: Field::new(name),
            token: Field::new(token),
            character_uid: Field::new(Uid::INVALID),
            infractions: Field::new(Vec::new()),
        }
    }
}

impl DataEntity for UserEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

/// The on-disk shape of a [`UserEntity`], one JSON object per file (see
/// `alicia-data::file_source`).
#[derive(Debug, Serialize, Deserialize)]
pub struct UserRow {
    pub uid: u32,
    pub name: String,
    pub token: String,
    pub character_uid: u32,
    #[serde(default)]
    pub infractions: Vec<u32>,
}

impl From<&UserEntity> for UserRow {
    fn from(e: &UserEntity) -> Self {
        Self {
            uid: e.uid.0,
            name: e.name.get().clone(),
            token: e.token.get().clone(),
            character_uid: e.character_uid.get().0,
            infractions: e.infractions.get().iter().map(|u| u.0).collect(),
        }
    }
}

impl From<UserRow> for UserEntity {
    fn from(row: UserRow) -> Self {
        Self {
            uid: Uid(row.uid),
            name: Field::new(row.name),
            token: Field::new(row.token),
            character_uid: Field::new(Uid(row.character_uid)),
            infractions: Field::new(row.infractions.into_iter().map(Uid).collect()),
        }
    }
}
