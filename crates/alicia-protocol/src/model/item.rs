use std::io::Write;

use super::ids::{Tid, Uid};
use crate::error::CodecResult;
use crate::time::PackedDateTime;
use crate::wire::{SizedVecU8, WireCodec, WireString};

/// A stack of a static item definition. `count == 0` with a finite
/// `expires_at` represents a timed ownership (e.g. a rental) rather
/// than a consumable stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub uid: Uid,
    pub tid: Tid,
    pub count: u32,
    pub expires_at: PackedDateTime,
}

impl WireCodec for Item {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.tid.write_to(w)?;
        self.count.write_to(w)?;
        self.expires_at.to_u32().write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            tid: Tid::read_from(r)?,
            count: u32::read_from(r)?,
            expires_at: PackedDateTime::from_u32(u32::read_from(r)?),
        })
    }
}

/// A bundle of one-or-more item UIDs delivered together: the gift
/// inbox and shop purchase delivery both use this shape. `checked`
/// tracks whether the recipient has opened it; `expired` is set once
/// the delivery window has lapsed and the contents are reclaimable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageItem {
    pub uid: Uid,
    pub item_uids: SizedVecU8<Uid>,
    pub sender: WireString,
    pub message: WireString,
    pub created_at: PackedDateTime,
    pub checked: bool,
    pub expired: bool,
}

impl WireCodec for StorageItem {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.item_uids.write_to(w)?;
        self.sender.write_to(w)?;
        self.message.write_to(w)?;
        self.created_at.to_u32().write_to(w)?;
        self.checked.write_to(w)?;
        self.expired.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            item_uids: SizedVecU8::read_from(r)?,
            sender: WireString::read_from(r)?,
            message: WireString::read_from(r)?,
            created_at: PackedDateTime::from_u32(u32::read_from(r)?),
            checked: bool::read_from(r)?,
            expired: bool::read_from(r)?,
        })
    }
}

/// An incubating egg, distinct from an [`Item`] because it carries a
/// hatch deadline rather than a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Egg {
    pub uid: Uid,
    pub tid: Tid,
    pub hatch_at: PackedDateTime,
}

impl WireCodec for Egg {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.tid.write_to(w)?;
        self.hatch_at.to_u32().write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            tid: Tid::read_from(r)?,
            hatch_at: PackedDateTime::from_u32(u32::read_from(r)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_item_round_trip() {
        let original = StorageItem {
            uid: Uid(5),
            item_uids: vec![Uid(10), Uid(11)].into(),
            sender: "Shop".into(),
            message: "Thanks for your purchase".into(),
            created_at: PackedDateTime::new(2023, 1, 1, 0, 0),
            checked: false,
            expired: false,
        };

        let mut buf = Vec::new();
        original.write_to(&mut buf).unwrap();
        let mut cursor = &buf[..];
        assert_eq!(StorageItem::read_from(&mut cursor).unwrap(), original);
        assert!(cursor.is_empty());
    }
}
