use std::io::Write;

use super::ids::{Tid, Uid};
use crate::error::CodecResult;
use crate::time::PackedDateTime;
use crate::wire::{SizedVecU8, WireCodec, WireString};

/// A placed decoration or building inside a ranch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Housing {
    pub uid: Uid,
    pub tid: Tid,
    pub durability: u32,
    pub expires_at: PackedDateTime,
}

impl WireCodec for Housing {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.tid.write_to(w)?;
        self.durability.write_to(w)?;
        self.expires_at.to_u32().write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            tid: Tid::read_from(r)?,
            durability: u32::read_from(r)?,
            expires_at: PackedDateTime::from_u32(u32::read_from(r)?),
        })
    }
}

/// A character's persistent world location: one per character, keyed
/// by its owning character's UID in the data director.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranch {
    pub uid: Uid,
    pub name: WireString,
    pub housing: SizedVecU8<Housing>,
}

impl WireCodec for Ranch {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.name.write_to(w)?;
        self.housing.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            name: WireString::read_from(r)?,
            housing: SizedVecU8::read_from(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranch_round_trip() {
        let original = Ranch {
            uid: Uid(3),
            name: "Sunny Acres".into(),
            housing: vec![Housing {
                uid: Uid(1),
                tid: Tid(50),
                durability: 100,
                expires_at: PackedDateTime::new(2030, 1, 1, 0, 0),
            }]
            .into(),
        };

        let mut buf = Vec::new();
        original.write_to(&mut buf).unwrap();
        let mut cursor = &buf[..];
        assert_eq!(Ranch::read_from(&mut cursor).unwrap(), original);
        assert!(cursor.is_empty());
    }
}
