//! The `Command` capability: every wire message implements this trait,
//! giving it a stable id plus a pair of self-describing read/write
//! functions. A director's dispatch table is built entirely out of
//! `Command` impls (see `alicia-net`'s packet server).
//!
//! Submodules group commands by the service that owns them, matching
//! the four listeners described in the overview.

pub mod lobby;
pub mod messenger;
pub mod race;
pub mod ranch;

use std::fmt::Debug;
use std::io::Write;

use crate::error::{CodecError, CodecResult};
use crate::magic;
use crate::wire::ensure_fully_consumed;

/// A single wire command: a stable numeric id plus the ability to
/// serialize/deserialize its body (the frame header is handled
/// separately by [`encode_command`]/`alicia-net`).
pub trait Command: Sized + Debug {
    /// Closed enumeration id, `< 0x4000` (see [`crate::magic`]).
    const ID: u16;
    /// Human-readable name, used in logs and the mute predicate.
    const NAME: &'static str;

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()>;
    fn read_body(r: &mut &[u8]) -> CodecResult<Self>;
}

/// Encodes a full outbound frame (magic + body) for `cmd`.
pub fn encode_command<C: Command>(cmd: &C) -> CodecResult<Vec<u8>> {
    let mut body = Vec::new();
    cmd.write_body(&mut body)?;

    let total_len = body
        .len()
        .checked_add(magic::FRAME_HEADER_LEN)
        .and_then(|n| u16::try_from(n).ok())
        .ok_or(CodecError::FrameTooLarge {
            length: body.len() as u32,
            max: magic::MAX_FRAME_LEN as u32,
        })?;

    let magic_value = magic::encode_magic(C::ID, total_len)?;

    let mut frame = Vec::with_capacity(total_len as usize);
    frame.extend_from_slice(&magic_value.to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decodes a command body already extracted (and, for Lobby/Ranch/Race,
/// already descrambled) from a frame whose id matched `C::ID`.
pub fn decode_command_body<C: Command>(id: u16, body: &[u8]) -> CodecResult<C> {
    if id != C::ID {
        return Err(CodecError::UnknownCommandId(id));
    }
    let mut cursor = body;
    let value = C::read_body(&mut cursor)?;
    ensure_fully_consumed(cursor)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::WireCodec;

    #[derive(Debug, PartialEq)]
    struct Ping {
        nonce: u32,
    }

    impl Command for Ping {
        const ID: u16 = 7;
        const NAME: &'static str = "Ping";

        fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
            self.nonce.write_to(w)
        }

        fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
            Ok(Self { nonce: u32::read_from(r)? })
        }
    }

    #[test]
    fn command_round_trip() {
        let cmd = Ping { nonce: 0xDEAD_BEEF };
        let frame = encode_command(&cmd).unwrap();

        let magic_bytes: [u8; 4] = frame[..4].try_into().unwrap();
        let magic = u32::from_le_bytes(magic_bytes);
        let (id, len) = magic::decode_magic(magic).unwrap();
        assert_eq!(len as usize, frame.len());

        let decoded = decode_command_body::<Ping>(id, &frame[4..]).unwrap();
        assert_eq!(decoded, cmd);
    }
}
