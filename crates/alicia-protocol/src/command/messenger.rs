//! Messenger command catalog: friends list / presence. Carried over
//! the fixed-key XOR framing in [`crate::scramble`] rather than the
//! rolling one used by Lobby/Ranch/Race (see §4.1.3).

use std::io::Write;

use crate::command::Command;
use crate::error::CodecResult;
use crate::model::Uid;
use crate::wire::{SizedVecU8, WireCodec, WireString};

/// `ChatterLogin` (C2s): binds this Messenger connection to an
/// already-authenticated character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatterLoginC2s {
    pub character_uid: Uid,
    pub auth_token: WireString,
}

impl Command for ChatterLoginC2s {
    const ID: u16 = 0x0101;
    const NAME: &'static str = "ChatterLogin";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)?;
        self.auth_token.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_uid: Uid::read_from(r)?,
            auth_token: WireString::read_from(r)?,
        })
    }
}

/// One entry in a friend group: a nickname and whether the friend is
/// currently online. The reference uses the set of currently-online
/// characters as a stand-in for an authoritative friends list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendEntry {
    pub character_uid: Uid,
    pub nickname: WireString,
    pub online: bool,
}

impl WireCodec for FriendEntry {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)?;
        self.nickname.write_to(w)?;
        self.online.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_uid: Uid::read_from(r)?,
            nickname: WireString::read_from(r)?,
            online: bool::read_from(r)?,
        })
    }
}

/// A named group of friend entries (e.g. "Online Players").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendGroup {
    pub name: WireString,
    pub entries: SizedVecU8<FriendEntry>,
}

impl WireCodec for FriendGroup {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.name.write_to(w)?;
        self.entries.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            name: WireString::read_from(r)?,
            entries: SizedVecU8::read_from(r)?,
        })
    }
}

/// `ChatCmdLoginAckOK` (S2c): the friend group list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCmdLoginAckOkS2c {
    pub groups: SizedVecU8<FriendGroup>,
}

impl Command for ChatCmdLoginAckOkS2c {
    const ID: u16 = 0x0102;
    const NAME: &'static str = "ChatCmdLoginAckOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.groups.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { groups: SizedVecU8::read_from(r)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{decode_command_body, encode_command};

    #[test]
    fn login_ack_round_trip() {
        let original = ChatCmdLoginAckOkS2c {
            groups: vec![FriendGroup {
                name: "Online Players".into(),
                entries: vec![FriendEntry { character_uid: Uid(2), nickname: "Bob".into(), online: true }]
                    .into(),
            }]
            .into(),
        };
        let frame = encode_command(&original).unwrap();
        let decoded =
            decode_command_body::<ChatCmdLoginAckOkS2c>(ChatCmdLoginAckOkS2c::ID, &frame[4..]).unwrap();
        assert_eq!(decoded, original);
    }
}
