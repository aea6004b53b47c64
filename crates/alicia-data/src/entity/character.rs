use alicia_protocol::model::{Character, CharacterParts, Role, Uid};
use serde::{Deserialize, Serialize};

use crate::entity::DataEntity;
use crate::field::Field;

/// The cached, field-tracked counterpart of `alicia_protocol::model::Character`.
#[derive(Debug, Clone)]
pub struct CharacterEntity {
    pub uid: Uid,
    pub nickname: Field<String>,
    pub level: Field<u16>,
    pub carrots: Field<u32>,
    pub cash: Field<u32>,
    pub role: Field<Role>,
    pub parts: Field<CharacterParts>,
    pub appearance: Field<u32>,
    pub inventory: Field<Vec<Uid>>,
    pub character_equipment: Field<Vec<Uid>>,
    pub mount_equipment: Field<Vec<Uid>>,
    pub horses: Field<Vec<Uid>>,
    pub mount_uid: Field<Uid>,
    pub ranch_uid: Field<Uid>,
    pub gift_storage: Field<Vec<Uid>>,
    pub purchase_storage: Field<Vec<Uid>>,
    pub is_muted: Field<bool>,
    pub is_ranch_locked: Field<bool>,
}

impl CharacterEntity {
    pub fn new(uid: Uid, nickname: String, ranch_uid: Uid) -> Self {
        Self {
            uid,
            nickname: Field::new(nickname),
            level: Field::new(1),
            carrots: Field::new(0),
            cash: Field::new(0),
            role: Field::new(Role::User),
            parts: Field::new(CharacterParts::default()),
            appearance: Field::new(0),
            inventory: Field::new(Vec::new()),
            character_equipment: Field::new(Vec::new()),
            mount_equipment: Field::new(Vec::new()),
            horses: Field::new(Vec::new()),
            mount_uid: Field::new(Uid::INVALID),
            ranch_uid: Field::new(ranch_uid),
            gift_storage: Field::new(Vec::new()),
            purchase_storage: Field::new(Vec::new()),
            is_muted: Field::new(false),
            is_ranch_locked: Field::new(false),
        }
    }

    /// Builds the wire DTO embedded in replies (login-OK, ranch
    /// occupant lists, ...). `mount` is looked up separately by the
    /// caller since it lives in its own cache.
    pub fn to_wire(&self) -> Character {
        Character {
            uid: self.uid,
            nickname: self.nickname.get().as_str().into(),
            level: *self.level.get(),
            carrots: *self.carrots.get(),
            cash: *self.cash.get(),
            role: *self.role.get(),
            parts: *self.parts.get(),
            appearance: *self.appearance.get(),
            inventory: self.inventory.get().clone().into(),
            character_equipment: self.character_equipment.get().clone().into(),
            mount_equipment: self.mount_equipment.get().clone().into(),
            horses: self.horses.get().clone().into(),
            mount_uid: *self.mount_uid.get(),
            ranch_uid: *self.ranch_uid.get(),
            gift_storage: self.gift_storage.get().clone().into(),
            purchase_storage: self.purchase_storage.get().clone().into(),
            is_muted: *self.is_muted.get(),
            is_ranch_locked: *self.is_ranch_locked.get(),
        }
    }
}

impl DataEntity for CharacterEntity {
    fn uid(&self) -> Uid {
        self.uid
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CharacterRow {
    pub uid: u32,
    pub nickname: String,
    pub level: u16,
    pub carrots: u32,
    pub cash: u32,
    pub role: u8,
    pub parts: (u32, u32, u32),
    pub appearance: u32,
    pub inventory: Vec<u32>,
    pub character_equipment: Vec<u32>,
    pub mount_equipment: Vec<u32>,
    pub horses: Vec<u32>,
    pub mount_uid: u32,
    pub ranch_uid: u32,
    pub gift_storage: Vec<u32>,
    pub purchase_storage: Vec<u32>,
    pub is_muted: bool,
    pub is_ranch_locked: bool,
}

impl From<&CharacterEntity> for CharacterRow {
    fn from(e: &CharacterEntity) -> Self {
        let parts = *e.parts.get();
        Self {
            uid: e.uid.0,
            nickname: e.nickname.get().clone(),
            level: *e.level.get(),
            carrots: *e.carrots.get(),
            cash: *e.cash.get(),
            role: *e.role.get() as u8,
            parts: (parts.model.0, parts.mouth.0, parts.face.0),
            appearance: *e.appearance.get(),
            inventory: e.inventory.get().iter().map(|u| u.0).collect(),
            character_equipment: e.character_equipment.get().iter().map(|u| u.0).collect(),
            mount_equipment: e.mount_equipment.get().iter().map(|u| u.0).collect(),
            horses: e.horses.get().iter().map(|u| u.0).collect(),
            mount_uid: e.mount_uid.get().0,
            ranch_uid: e.ranch_uid.get().0,
            gift_storage: e.gift_storage.get().iter().map(|u| u.0).collect(),
            purchase_storage: e.purchase_storage.get().iter().map(|u| u.0).collect(),
            is_muted: *e.is_muted.get(),
            is_ranch_locked: *e.is_ranch_locked.get(),
        }
    }
}

impl From<CharacterRow> for CharacterEntity {
    fn from(row: CharacterRow) -> Self {
        let role = if row.role == 1 { Role::GameMaster } else { Role::User };
        Self {
            uid: Uid(row.uid),
            nickname: Field::new(row.nickname),
            level: Field::new(row.level),
            carrots: Field::new(row.carrots),
            cash: Field::new(row.cash),
            role: Field::new(role),
            parts: Field::new(CharacterParts {
                model: row.parts.0.into(),
                mouth: row.parts.1.into(),
                face: row.parts.2.into(),
            }),
            appearance: Field::new(row.appearance),
            inventory: Field::new(row.inventory.into_iter().map(Uid).collect()),
            character_equipment: Field::new(row.character_equipment.into_iter().map(Uid).collect()),
            mount_equipment: Field::new(row.mount_equipment.into_iter().map(Uid).collect()),
            horses: Field::new(row.horses.into_iter().map(Uid).collect()),
            mount_uid: Field::new(Uid(row.mount_uid)),
            ranch_uid: Field::new(Uid(row.ranch_uid)),
            gift_storage: Field::new(row.gift_storage.into_iter().map(Uid).collect()),
            purchase_storage: Field::new(row.purchase_storage.into_iter().map(Uid).collect()),
            is_muted: Field::new(row.is_muted),
            is_ranch_locked: Field::new(row.is_ranch_locked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_uid_must_be_a_member_of_horses_or_invalid() {
        let mut c = CharacterEntity::new(Uid(1), "Rider".into(), Uid(2));
        c.horses.set(vec![Uid(10), Uid(11)]);
        c.mount_uid.set(Uid(10));
        assert!(c.horses.get().contains(c.mount_uid.get()) || !c.mount_uid.get().is_valid());
    }
}
