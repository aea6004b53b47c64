use alicia_protocol::model::{Guild, Uid};
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;

#[derive(Debug, Clone)]
pub struct GuildEntity {
    pub uid: Uid,
    pub name: String,
    pub tag: String,
    pub members: Vec<Uid>,
}

impl GuildEntity {
    pub fn to_wire(&self) -> Guild {
        Guild {
            uid: self.uid,
            name: self.name.as_str().into(),
            tag: self.tag.as_str().into(),
            members: self.members.clone().into(),
        }
    }
}

impl DataEntity for GuildEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuildRow {
    pub uid: u32,
    pub name: String,
    pub tag: String,
    pub members: Vec<u32>,
}

impl From<&GuildEntity> for GuildRow {
    fn from(e: &GuildEntity) -> Self {
        Self { uid: e.uid.0, name: e.name.clone(), tag: e.tag.clone(), members: e.members.iter().map(|u| u.0).collect() }
    }
}

impl From<GuildRow> for GuildEntity {
    fn from(row: GuildRow) -> Self {
        Self { uid: Uid(row.uid), name: row.name, tag: row.tag, members: row.members.into_iter().map(Uid).collect() }
    }
}
