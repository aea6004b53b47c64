use std::io::Write;

use super::ids::{Tid, Uid};
use crate::error::CodecResult;
use crate::wire::{WireCodec, WireString};

/// A ranch companion pet, cosmetic only (no stats, no race impact).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    pub uid: Uid,
    pub tid: Tid,
    pub name: WireString,
}

impl WireCodec for Pet {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.uid.write_to(w)?;
        self.tid.write_to(w)?;
        self.name.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            uid: Uid::read_from(r)?,
            tid: Tid::read_from(r)?,
            name: WireString::read_from(r)?,
        })
    }
}
