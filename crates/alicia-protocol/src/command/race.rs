//! Race command catalog: transient match rooms hosted out of the
//! Lobby's `MakeRoom`.

use std::io::Write;

use crate::command::Command;
use crate::error::{CodecError, CodecResult};
use crate::model::Uid;
use crate::wire::{SizedVecU8, WireCodec, WireString};

/// Racing state machine, broadcast to every room participant as it
/// advances. Mirrors the reference's `NotReady -> Ready -> Loading ->
/// Racing -> Finished` progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaceState {
    #[default]
    NotReady = 0,
    Ready = 1,
    Loading = 2,
    Racing = 3,
    Finished = 4,
}

impl WireCodec for RaceState {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        (*self as u8).write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        match u8::read_from(r)? {
            0 => Ok(RaceState::NotReady),
            1 => Ok(RaceState::Ready),
            2 => Ok(RaceState::Loading),
            3 => Ok(RaceState::Racing),
            4 => Ok(RaceState::Finished),
            other => Err(CodecError::FieldOutOfRange { field: "RaceState", value: other as i64 }),
        }
    }
}

/// `EnterRoom` (C2s): presents the OTP granted by `MakeRoomOK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterRoomC2s {
    pub room_uid: Uid,
    pub character_uid: Uid,
    pub otp: u32,
}

impl Command for EnterRoomC2s {
    const ID: u16 = 0x2001;
    const NAME: &'static str = "EnterRoom";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.room_uid.write_to(w)?;
        self.character_uid.write_to(w)?;
        self.otp.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            room_uid: Uid::read_from(r)?,
            character_uid: Uid::read_from(r)?,
            otp: u32::read_from(r)?,
        })
    }
}

/// A racer's roster entry within a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RacerEntry {
    pub character_uid: Uid,
    pub nickname: WireString,
    pub state: RaceState,
}

impl WireCodec for RacerEntry {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)?;
        self.nickname.write_to(w)?;
        self.state.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_uid: Uid::read_from(r)?,
            nickname: WireString::read_from(r)?,
            state: RaceState::read_from(r)?,
        })
    }
}

/// `EnterRoomOK` (S2c): the room roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterRoomOkS2c {
    pub room_uid: Uid,
    pub racers: SizedVecU8<RacerEntry>,
}

impl Command for EnterRoomOkS2c {
    const ID: u16 = 0x2002;
    const NAME: &'static str = "EnterRoomOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.room_uid.write_to(w)?;
        self.racers.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            room_uid: Uid::read_from(r)?,
            racers: SizedVecU8::read_from(r)?,
        })
    }
}

/// `EnterRoomCancel` (S2c): authorization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnterRoomCancelS2c;

impl Command for EnterRoomCancelS2c {
    const ID: u16 = 0x2003;
    const NAME: &'static str = "EnterRoomCancel";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `ChangeRoomOptions` (C2s): a bitfield of changed fields plus their
/// new values, packed as opaque bytes (the reference encodes only the
/// fields whose bit is set; decoding the payload meaning is the
/// director's job, not the codec's).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRoomOptionsC2s {
    pub changed_bits: u16,
    pub payload: Vec<u8>,
}

impl Command for ChangeRoomOptionsC2s {
    const ID: u16 = 0x2010;
    const NAME: &'static str = "ChangeRoomOptions";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.changed_bits.write_to(w)?;
        let len = u16::try_from(self.payload.len()).map_err(|_| CodecError::FieldOutOfRange {
            field: "ChangeRoomOptionsC2s::payload.len",
            value: self.payload.len() as i64,
        })?;
        len.write_to(w)?;
        w.write_all(&self.payload)?;
        Ok(())
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        let changed_bits = u16::read_from(r)?;
        let len = u16::read_from(r)? as usize;
        if r.len() < len {
            return Err(CodecError::NeedMoreData);
        }
        let (payload, rest) = r.split_at(len);
        *r = rest;
        Ok(Self { changed_bits, payload: payload.to_vec() })
    }
}

/// `ChangeRoomOptionsNotify` (S2c): the same bitfield shape,
/// rebroadcast to the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRoomOptionsNotifyS2c {
    pub changed_bits: u16,
    pub payload: Vec<u8>,
}

impl Command for ChangeRoomOptionsNotifyS2c {
    const ID: u16 = 0x2011;
    const NAME: &'static str = "ChangeRoomOptionsNotify";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.changed_bits.write_to(w)?;
        let len = u16::try_from(self.payload.len()).map_err(|_| CodecError::FieldOutOfRange {
            field: "ChangeRoomOptionsNotifyS2c::payload.len",
            value: self.payload.len() as i64,
        })?;
        len.write_to(w)?;
        w.write_all(&self.payload)?;
        Ok(())
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        let changed_bits = u16::read_from(r)?;
        let len = u16::read_from(r)? as usize;
        if r.len() < len {
            return Err(CodecError::NeedMoreData);
        }
        let (payload, rest) = r.split_at(len);
        *r = rest;
        Ok(Self { changed_bits, payload: payload.to_vec() })
    }
}

/// `RaceReady` (C2s): the sender marks itself ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RaceReadyC2s;

impl Command for RaceReadyC2s {
    const ID: u16 = 0x2020;
    const NAME: &'static str = "RaceReady";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `RaceReadyNotify` (S2c): broadcasts the racer's new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceReadyNotifyS2c {
    pub character_uid: Uid,
    pub state: RaceState,
}

impl Command for RaceReadyNotifyS2c {
    const ID: u16 = 0x2021;
    const NAME: &'static str = "RaceReadyNotify";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)?;
        self.state.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_uid: Uid::read_from(r)?,
            state: RaceState::read_from(r)?,
        })
    }
}

/// `RaceStart` (S2c): the host (or the room owner implicitly) starts
/// the race once every racer is `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceStartS2c {
    pub countdown_seconds: u8,
}

impl Command for RaceStartS2c {
    const ID: u16 = 0x2022;
    const NAME: &'static str = "RaceStart";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.countdown_seconds.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { countdown_seconds: u8::read_from(r)? })
    }
}

/// `CountdownNotify` (S2c): one tick of the pre-race countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownNotifyS2c {
    pub seconds_remaining: u8,
}

impl Command for CountdownNotifyS2c {
    const ID: u16 = 0x2023;
    const NAME: &'static str = "CountdownNotify";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.seconds_remaining.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { seconds_remaining: u8::read_from(r)? })
    }
}

/// `UserRaceTimer` (C2s): a periodic race-clock ping; acknowledged
/// without state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRaceTimerC2s {
    pub elapsed_ms: u32,
}

impl Command for UserRaceTimerC2s {
    const ID: u16 = 0x2030;
    const NAME: &'static str = "UserRaceTimer";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.elapsed_ms.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { elapsed_ms: u32::read_from(r)? })
    }
}

/// `UserRaceTimerOK` (S2c): acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserRaceTimerOkS2c;

impl Command for UserRaceTimerOkS2c {
    const ID: u16 = 0x2031;
    const NAME: &'static str = "UserRaceTimerOK";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `Heartbeat`, the Race listener's keepalive.
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
    fn enter_room_ok_round_trip() {
        let original = EnterRoomOkS2c {
            room_uid: Uid(12),
            racers: vec![
                RacerEntry { character_uid: Uid(1), nickname: "A".into(), state: RaceState::NotReady },
                RacerEntry { character_uid: Uid(2), nickname: "B".into(), state: RaceState::Ready },
            ]
            .into(),
        };
        let frame = encode_command(&original).unwrap();
        let decoded = decode_command_body::<EnterRoomOkS2c>(EnterRoomOkS2c::ID, &frame[4..]).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn race_state_rejects_unknown_discriminant() {
        let mut cursor = &[9u8][..];
        assert!(RaceState::read_from(&mut cursor).is_err());
    }

    #[test]
    fn change_room_options_round_trip() {
        let original = ChangeRoomOptionsC2s { changed_bits: 0b101, payload: vec![7, 8, 9] };
        let frame = encode_command(&original).unwrap();
        let decoded =
            decode_command_body::<ChangeRoomOptionsC2s>(ChangeRoomOptionsC2s::ID, &frame[4..]).unwrap();
        assert_eq!(decoded, original);
    }
}
