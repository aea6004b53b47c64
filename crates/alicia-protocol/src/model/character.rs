use std::io::Write;

use super::ids::{Tid, Uid};
use crate::error::{CodecError, CodecResult};
use crate::wire::{SizedVecU8, SizedVecU16, WireCodec, WireString};

/// A character's access level. `GameMaster` bypasses the infraction and
/// mute systems at the chat command dispatch layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User = 0,
    GameMaster = 1,
}

impl WireCodec for Role {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        (*self as u8).write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        match u8::read_from(r)? {
            0 => Ok(Role::User),
            1 => Ok(Role::GameMaster),
            other => Err(CodecError::FieldOutOfRange { field: "Role", value: other as i64 }),
        }
    }
}

/// Model/mouth/face TIDs, rendered as one appearance group on the
/// client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterParts {
    pub model: Tid,
    pub mouth: Tid,
    pub face: Tid,
}

impl WireCodec for CharacterParts {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.model.write_to(w)?;
        self.mouth.write_to(w)?;
        self.face.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            model: Tid::read_from(r)?,
            mouth: Tid::read_from(r)?,
            face: Tid::read_from(r)?,
        })
    }
}

/// The user's in-game persona. Ownership of its aggregates is exclusive
/// and scoped to the character's own lifetime (deleting a character
/// releases everything it owns back to the data director's care, it
/// does not cascade-delete the owned entities themselves).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub uid: Uid,
    pub nickname: WireString,
    pub level: u16,
    pub carrots: u32,
    pub cash: u32,
    pub role: Role,
    pub parts: CharacterParts,
    pub appearance: u32,
    pub inventory: SizedVecU16<Uid>,
    pub character_equipment: SizedVecU8<Uid>,
    pub mount_equipment: SizedVecU8<Uid>,
    pub horses: SizedVecU8<Uid>,
    pub mount_uid: Uid,
    pub ranch_uid: Uid,
    pub gift_storage: SizedVecU8<Uid>,
    pub purchase_storage: SizedVecU8<Uid>,
    pub is_muted: bool,
    pub is_ranch_locked: bool,
}

impl WireCodec for Character {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.nickname.write_to(w)?;
        self.level.write_to(w)?;
        self.carrots.write_to(w)?;
        self.cash.write_to(w)?;
        self.role.write_to(w)?;
        self.parts.write_to(w)?;
        self.appearance.write_to(w)?;
        self.inventory.write_to(w)?;
        self.character_equipment.write_to(w)?;
        self.mount_equipment.write_to(w)?;
        self.horses.write_to(w)?;
        self.mount_uid.write_to(w)?;
        self.ranch_uid.write_to(w)?;
        self.gift_storage.write_to(w)?;
        self.purchase_storage.write_to(w)?;
        self.is_muted.write_to(w)?;
        self.is_ranch_locked.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            nickname: WireString::read_from(r)?,
            level: u16::read_from(r)?,
            carrots: u32::read_from(r)?,
            cash: u32::read_from(r)?,
            role: Role::read_from(r)?,
            parts: CharacterParts::read_from(r)?,
            appearance: u32::read_from(r)?,
            inventory: SizedVecU16::read_from(r)?,
            character_equipment: SizedVecU8::read_from(r)?,
            mount_equipment: SizedVecU8::read_from(r)?,
            horses: SizedVecU8::read_from(r)?,
            mount_uid: Uid::read_from(r)?,
            ranch_uid: Uid::read_from(r)?,
            gift_storage: SizedVecU8::read_from(r)?,
            purchase_storage: SizedVecU8::read_from(r)?,
            is_muted: bool::read_from(r)?,
            is_ranch_locked: bool::read_from(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Character {
        Character {
            uid: Uid(42),
            nickname: "Starlight".into(),
            level: 12,
            carrots: 1_500,
            cash: 0,
            role: Role::User,
            parts: CharacterParts { model: Tid(1), mouth: Tid(2), face: Tid(3) },
            appearance: 0xDEAD_BEEF,
            inventory: vec![Uid(1), Uid(2)].into(),
            character_equipment: vec![Uid(1)].into(),
            mount_equipment: vec![].into(),
            horses: vec![Uid(100)].into(),
            mount_uid: Uid(100),
            ranch_uid: Uid(7),
            gift_storage: vec![].into(),
            purchase_storage: vec![].into(),
            is_muted: false,
            is_ranch_locked: false,
        }
    }

    #[test]
    fn character_round_trip() {
        let original = sample();
        let mut buf = Vec::new();
        original.write_to(&mut buf).unwrap();
        let mut cursor = &buf[..];
        assert_eq!(Character::read_from(&mut cursor).unwrap(), original);
        assert!(cursor.is_empty());
    }

    #[test]
    fn role_rejects_unknown_discriminant() {
        let mut cursor = &[5u8][..];
        assert!(Role::read_from(&mut cursor).is_err());
    }
}
