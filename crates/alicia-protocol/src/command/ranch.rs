//! Ranch command catalog: the persistent per-character world instance
//! where co-present players and horses interact.

use std::io::Write;

use crate::command::Command;
use crate::error::{CodecError, CodecResult};
use crate::model::{Character, Horse, Housing, Oid, Uid};
use crate::wire::{SizedVecU8, WireCodec, WireString};

/// `RanchEnter` (C2s): presents the OTP granted by the Lobby's
/// `LobbyEnterRanchOK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RanchEnterC2s {
    pub ranch_uid: Uid,
    pub character_uid: Uid,
    pub otp: u32,
}

impl Command for RanchEnterC2s {
    const ID: u16 = 0x1001;
    const NAME: &'static str = "RanchEnter";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.ranch_uid.write_to(w)?;
        self.character_uid.write_to(w)?;
        self.otp.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            ranch_uid: Uid::read_from(r)?,
            character_uid: Uid::read_from(r)?,
            otp: u32::read_from(r)?,
        })
    }
}

/// An occupant present in the ranch at enter time, carried in OID
/// order so the client can build its occupant table directly off the
/// list index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RanchOccupant {
    pub character_oid: Oid,
    pub character: Character,
    pub horse_oid: Oid,
    pub horse: Horse,
}

impl WireCodec for RanchOccupant {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_oid.write_to(w)?;
        self.character.write_to(w)?;
        self.horse_oid.write_to(w)?;
        self.horse.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_oid: Oid::read_from(r)?,
            character: Character::read_from(r)?,
            horse_oid: Oid::read_from(r)?,
            horse: Horse::read_from(r)?,
        })
    }
}

/// `RanchEnterOK` (S2c): the full occupant set plus ranch metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RanchEnterOkS2c {
    pub ranch_uid: Uid,
    pub ranch_name: WireString,
    pub occupants: SizedVecU8<RanchOccupant>,
    pub housing: SizedVecU8<Housing>,
    pub scramble_seed: u32,
    pub incubator_slots: [u32; 3],
    pub league_tier: u8,
    pub league_score: u32,
}

impl Command for RanchEnterOkS2c {
    const ID: u16 = 0x1002;
    const NAME: &'static str = "RanchEnterOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.ranch_uid.write_to(w)?;
        self.ranch_name.write_to(w)?;
        self.occupants.write_to(w)?;
        self.housing.write_to(w)?;
        self.scramble_seed.write_to(w)?;
        for slot in self.incubator_slots {
            slot.write_to(w)?;
        }
        self.league_tier.write_to(w)?;
        self.league_score.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            ranch_uid: Uid::read_from(r)?,
            ranch_name: WireString::read_from(r)?,
            occupants: SizedVecU8::read_from(r)?,
            housing: SizedVecU8::read_from(r)?,
            scramble_seed: u32::read_from(r)?,
            incubator_slots: [u32::read_from(r)?, u32::read_from(r)?, u32::read_from(r)?],
            league_tier: u8::read_from(r)?,
            league_score: u32::read_from(r)?,
        })
    }
}

/// `RanchEnterCancel` (S2c): authorization failed (bad or replayed
/// OTP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RanchEnterCancelS2c;

impl Command for RanchEnterCancelS2c {
    const ID: u16 = 0x1003;
    const NAME: &'static str = "RanchEnterCancel";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `EnterRanchNotify` (S2c): broadcast to existing occupants when a
/// new character joins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterRanchNotifyS2c {
    pub character_oid: Oid,
    pub character: Character,
    pub horse_oid: Oid,
    pub horse: Horse,
}

impl Command for EnterRanchNotifyS2c {
    const ID: u16 = 0x1004;
    const NAME: &'static str = "EnterRanchNotify";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_oid.write_to(w)?;
        self.character.write_to(w)?;
        self.horse_oid.write_to(w)?;
        self.horse.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_oid: Oid::read_from(r)?,
            character: Character::read_from(r)?,
            horse_oid: Oid::read_from(r)?,
            horse: Horse::read_from(r)?,
        })
    }
}

/// `RanchLeave` (C2s): no payload, the sender's own OID leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RanchLeaveC2s;

impl Command for RanchLeaveC2s {
    const ID: u16 = 0x1010;
    const NAME: &'static str = "RanchLeave";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `LeaveRanchNotify` (S2c): broadcast on a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveRanchNotifyS2c {
    pub character_uid: Uid,
}

impl Command for LeaveRanchNotifyS2c {
    const ID: u16 = 0x1011;
    const NAME: &'static str = "LeaveRanchNotify";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { character_uid: Uid::read_from(r)? })
    }
}

/// `RanchSnapshot` (C2s): a position/pose delta bound to the sender's
/// own OID at the transport layer; `oid` is filled in by the director
/// before broadcast, not trusted from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RanchSnapshotC2s {
    pub pose: Vec<u8>,
}

impl Command for RanchSnapshotC2s {
    const ID: u16 = 0x1020;
    const NAME: &'static str = "RanchSnapshot";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        let len = u16::try_from(self.pose.len()).map_err(|_| CodecError::FieldOutOfRange {
            field: "RanchSnapshotC2s::pose.len",
            value: self.pose.len() as i64,
        })?;
        len.write_to(w)?;
        w.write_all(&self.pose)?;
        Ok(())
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        let len = u16::read_from(r)? as usize;
        if r.len() < len {
            return Err(CodecError::NeedMoreData);
        }
        let (pose, rest) = r.split_at(len);
        *r = rest;
        Ok(Self { pose: pose.to_vec() })
    }
}

/// `SnapshotNotify` (S2c): the same delta rebroadcast tagged with the
/// sender's OID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotNotifyS2c {
    pub character_oid: Oid,
    pub pose: Vec<u8>,
}

impl Command for SnapshotNotifyS2c {
    const ID: u16 = 0x1021;
    const NAME: &'static str = "SnapshotNotify";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_oid.write_to(w)?;
        let len = u16::try_from(self.pose.len()).map_err(|_| CodecError::FieldOutOfRange {
            field: "SnapshotNotifyS2c::pose.len",
            value: self.pose.len() as i64,
        })?;
        len.write_to(w)?;
        w.write_all(&self.pose)?;
        Ok(())
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        let character_oid = Oid::read_from(r)?;
        let len = u16::read_from(r)? as usize;
        if r.len() < len {
            return Err(CodecError::NeedMoreData);
        }
        let (pose, rest) = r.split_at(len);
        *r = rest;
        Ok(Self { character_oid, pose: pose.to_vec() })
    }
}

/// `RanchChat` (C2s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RanchChatC2s {
    pub message: WireString,
}

impl Command for RanchChatC2s {
    const ID: u16 = 0x1030;
    const NAME: &'static str = "RanchChat";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.message.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { message: WireString::read_from(r)? })
    }
}

/// `RanchChatNotify` (S2c).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RanchChatNotifyS2c {
    pub character_uid: Uid,
    pub message: WireString,
}

impl Command for RanchChatNotifyS2c {
    const ID: u16 = 0x1031;
    const NAME: &'static str = "RanchChatNotify";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)?;
        self.message.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_uid: Uid::read_from(r)?,
            message: WireString::read_from(r)?,
        })
    }
}

/// `RanchStuff` (C2s): a generic ranch-stuff interaction (feed, brush,
/// pet a horse...); `event_id` selects which, `value` is its
/// interaction-specific argument.
///
/// The reference switches wire shape between directions for this
/// command id; this is the client-originated shape. See
/// [`RanchStuffNotifyS2c`] for the server's acknowledgment shape, and
/// do not attempt to unify the two — they carry different fields by
/// design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RanchStuffC2s {
    pub event_id: u16,
    pub value: i32,
}

impl Command for RanchStuffC2s {
    const ID: u16 = 0x1040;
    const NAME: &'static str = "RanchStuff";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.event_id.write_to(w)?;
        self.value.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            event_id: u16::read_from(r)?,
            value: i32::read_from(r)?,
        })
    }
}

/// `RanchStuffNotify` (S2c): acknowledges a [`RanchStuffC2s`]
/// interaction and reports the character's updated carrot balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RanchStuffNotifyS2c {
    pub event_id: u16,
    pub money_delta: i32,
    pub money_total: u32,
}

impl Command for RanchStuffNotifyS2c {
    const ID: u16 = 0x1040;
    const NAME: &'static str = "RanchStuffNotify";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.event_id.write_to(w)?;
        self.money_delta.write_to(w)?;
        self.money_total.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            event_id: u16::read_from(r)?,
            money_delta: i32::read_from(r)?,
            money_total: u32::read_from(r)?,
        })
    }
}

/// `Heartbeat`, the Ranch listener's keepalive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeartbeatC2s;

impl Command for HeartbeatC2s {
    const ID: u16 = 0x3FFF;
    const NAME: &'static str = "Heartbeat";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{decode_command_body, encode_command};

    #[test]
    fn stuff_c2s_and_notify_share_id_but_differ_in_shape() {
        assert_eq!(RanchStuffC2s::ID, RanchStuffNotifyS2c::ID);

        let c2s = RanchStuffC2s { event_id: 3, value: -10 };
        let frame = encode_command(&c2s).unwrap();
        let decoded = decode_command_body::<RanchStuffC2s>(RanchStuffC2s::ID, &frame[4..]).unwrap();
        assert_eq!(decoded, c2s);

        let notify = RanchStuffNotifyS2c { event_id: 3, money_delta: -10, money_total: 490 };
        let frame = encode_command(&notify).unwrap();
        let decoded = decode_command_body::<RanchStuffNotifyS2c>(RanchStuffNotifyS2c::ID, &frame[4..]).unwrap();
        assert_eq!(decoded, notify);
    }

    #[test]
    fn snapshot_notify_carries_sender_oid() {
        let original = SnapshotNotifyS2c { character_oid: Oid(5), pose: vec![1, 2, 3, 4] };
        let frame = encode_command(&original).unwrap();
        let decoded = decode_command_body::<SnapshotNotifyS2c>(SnapshotNotifyS2c::ID, &frame[4..]).unwrap();
        assert_eq!(decoded, original);
    }
}
