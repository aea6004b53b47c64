use std::io::Write;

use super::ids::Uid;
use crate::error::CodecResult;
use crate::wire::{SizedVecU8, WireCodec, WireString};

/// A player guild: a name, a short tag, and its member roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub uid: Uid,
    pub name: WireString,
    pub tag: WireString,
    pub members: SizedVecU8<Uid>,
}

impl WireCodec for Guild {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.name.write_to(w)?;
        self.tag.write_to(w)?;
        self.members.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            name: WireString::read_from(r)?,
            tag: WireString::read_from(r)?,
            members: SizedVecU8::read_from(r)?,
        })
    }
}
