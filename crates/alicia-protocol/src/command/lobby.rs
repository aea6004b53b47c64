//! Lobby command catalog: authentication, channel/room brokering, and
//! the read-mostly profile queries that round out the Active state.

use std::io::Write;

use crate::command::Command;
use crate::error::{CodecError, CodecResult};
use crate::model::{Character, Horse, Uid};
use crate::time::FileTime;
use crate::wire::{SizedVecU16, WireCodec, WireString};

/// `LobbyLogin` (C2s): the credential the client presents on connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyLoginC2s {
    pub login_id: WireString,
    pub auth_token: WireString,
    pub val: u32,
}

impl Command for LobbyLoginC2s {
    const ID: u16 = 0x0001;
    const NAME: &'static str = "LobbyLogin";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.login_id.write_to(w)?;
        self.auth_token.write_to(w)?;
        self.val.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            login_id: WireString::read_from(r)?,
            auth_token: WireString::read_from(r)?,
            val: u32::read_from(r)?,
        })
    }
}

/// One enabled-option sub-record advertised in `LobbyLoginOk`. The
/// reference preserves seven of these verbatim for client
/// compatibility; only the keycode + payload-length shape is modeled
/// here, the payload bytes are carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionGroup {
    pub keycode: u32,
    pub payload: Vec<u8>,
}

impl WireCodec for OptionGroup {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.keycode.write_to(w)?;
        let len = u16::try_from(self.payload.len()).map_err(|_| CodecError::FieldOutOfRange {
            field: "OptionGroup::payload.len",
            value: self.payload.len() as i64,
        })?;
        len.write_to(w)?;
        w.write_all(&self.payload)?;
        Ok(())
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        let keycode = u32::read_from(r)?;
        let len = u16::read_from(r)? as usize;
        if r.len() < len {
            return Err(CodecError::NeedMoreData);
        }
        let (payload, rest) = r.split_at(len);
        *r = rest;
        Ok(Self { keycode, payload: payload.to_vec() })
    }
}

/// An advertised next-hop: packed IPv4 in network byte order plus a
/// port, with a one-time code the client must present to that service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostAdvertisement {
    pub address: u32,
    pub port: u16,
    pub code: u32,
}

impl WireCodec for HostAdvertisement {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.address.write_to(w)?;
        self.port.write_to(w)?;
        self.code.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            address: u32::read_from(r)?,
            port: u16::read_from(r)?,
            code: u32::read_from(r)?,
        })
    }
}

/// `LobbyLoginOk` (S2c): the richest reply in the protocol. Every
/// field the login reply must carry, per the handshake the original
/// client expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyLoginOkS2c {
    pub file_time_low: u32,
    pub file_time_high: u32,
    pub self_uid: Uid,
    pub nickname: WireString,
    pub motd: WireString,
    pub profile_gender: u8,
    pub status: WireString,
    pub character_equipment: SizedVecU16<Uid>,
    pub mount_equipment: SizedVecU16<Uid>,
    pub level: u16,
    pub carrots: u32,
    pub option_bitset: u32,
    pub options: Vec<OptionGroup>,
    pub age_group: u8,
    pub achievements: SizedVecU16<u32>,
    pub race_host: HostAdvertisement,
    pub scramble_seed: u32,
    pub character: Character,
    pub mount: Horse,
    pub compat_groups: [Vec<u8>; 7],
}

impl LobbyLoginOkS2c {
    pub fn from_file_time(file_time: FileTime) -> (u32, u32) {
        (file_time.low, file_time.high)
    }
}

impl Command for LobbyLoginOkS2c {
    const ID: u16 = 0x0002;
    const NAME: &'static str = "LobbyLoginOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.file_time_low.write_to(w)?;
        self.file_time_high.write_to(w)?;
        self.self_uid.write_to(w)?;
        self.nickname.write_to(w)?;
        self.motd.write_to(w)?;
        self.profile_gender.write_to(w)?;
        self.status.write_to(w)?;
        self.character_equipment.write_to(w)?;
        self.mount_equipment.write_to(w)?;
        self.level.write_to(w)?;
        self.carrots.write_to(w)?;
        self.option_bitset.write_to(w)?;
        let option_count = u8::try_from(self.options.len()).map_err(|_| CodecError::FieldOutOfRange {
            field: "LobbyLoginOkS2c::options.len",
            value: self.options.len() as i64,
        })?;
        option_count.write_to(w)?;
        for option in &self.options {
            option.write_to(w)?;
        }
        self.age_group.write_to(w)?;
        self.achievements.write_to(w)?;
        self.race_host.write_to(w)?;
        self.scramble_seed.write_to(w)?;
        self.character.write_to(w)?;
        self.mount.write_to(w)?;
        for group in &self.compat_groups {
            let len = u16::try_from(group.len()).map_err(|_| CodecError::FieldOutOfRange {
                field: "LobbyLoginOkS2c::compat_groups[].len",
                value: group.len() as i64,
            })?;
            len.write_to(w)?;
            w.write_all(group)?;
        }
        Ok(())
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        let file_time_low = u32::read_from(r)?;
        let file_time_high = u32::read_from(r)?;
        let self_uid = Uid::read_from(r)?;
        let nickname = WireString::read_from(r)?;
        let motd = WireString::read_from(r)?;
        let profile_gender = u8::read_from(r)?;
        let status = WireString::read_from(r)?;
        let character_equipment = SizedVecU16::read_from(r)?;
        let mount_equipment = SizedVecU16::read_from(r)?;
        let level = u16::read_from(r)?;
        let carrots = u32::read_from(r)?;
        let option_bitset = u32::read_from(r)?;
        let option_count = u8::read_from(r)?;
        let mut options = Vec::with_capacity(option_count as usize);
        for _ in 0..option_count {
            options.push(OptionGroup::read_from(r)?);
        }
        let age_group = u8::read_from(r)?;
        let achievements = SizedVecU16::read_from(r)?;
        let race_host = HostAdvertisement::read_from(r)?;
        let scramble_seed = u32::read_from(r)?;
        let character = Character::read_from(r)?;
        let mount = Horse::read_from(r)?;
        let mut compat_groups: [Vec<u8>; 7] = Default::default();
        for group in &mut compat_groups {
            let len = u16::read_from(r)? as usize;
            if r.len() < len {
                return Err(CodecError::NeedMoreData);
            }
            let (payload, rest) = r.split_at(len);
            *group = payload.to_vec();
            *r = rest;
        }
        Ok(Self {
            file_time_low,
            file_time_high,
            self_uid,
            nickname,
            motd,
            profile_gender,
            status,
            character_equipment,
            mount_equipment,
            level,
            carrots,
            option_bitset,
            options,
            age_group,
            achievements,
            race_host,
            scramble_seed,
            character,
            mount,
            compat_groups,
        })
    }
}

/// The reason a login was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyLoginCancelReason {
    InvalidUser,
    Banned,
    BadToken,
}

impl WireCodec for LobbyLoginCancelReason {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        let code: u8 = match self {
            LobbyLoginCancelReason::InvalidUser => 0,
            LobbyLoginCancelReason::Banned => 1,
            LobbyLoginCancelReason::BadToken => 2,
        };
        code.write_to(w)
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        match u8::read_from(r)? {
            0 => Ok(LobbyLoginCancelReason::InvalidUser),
            1 => Ok(LobbyLoginCancelReason::Banned),
            2 => Ok(LobbyLoginCancelReason::BadToken),
            other => Err(CodecError::FieldOutOfRange { field: "LobbyLoginCancelReason", value: other as i64 }),
        }
    }
}

/// `LobbyLoginCancel` (S2c).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyLoginCancelS2c {
    pub reason: LobbyLoginCancelReason,
}

impl Command for LobbyLoginCancelS2c {
    const ID: u16 = 0x0003;
    const NAME: &'static str = "LobbyLoginCancel";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.reason.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { reason: LobbyLoginCancelReason::read_from(r)? })
    }
}

/// `CreateNicknameNotify` (S2c): sent when an authenticated session has
/// no bound character yet, prompting the client to submit one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreateNicknameNotifyS2c;

impl Command for CreateNicknameNotifyS2c {
    const ID: u16 = 0x0004;
    const NAME: &'static str = "CreateNicknameNotify";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `LobbyCreateNickname` (C2s): the nickname picked in response to
/// [`CreateNicknameNotifyS2c`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyCreateNicknameC2s {
    pub nickname: WireString,
}

impl Command for LobbyCreateNicknameC2s {
    const ID: u16 = 0x0005;
    const NAME: &'static str = "LobbyCreateNickname";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.nickname.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { nickname: WireString::read_from(r)? })
    }
}

/// `EnterChannel` (C2s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterChannelC2s {
    pub channel: u16,
}

impl Command for EnterChannelC2s {
    const ID: u16 = 0x0010;
    const NAME: &'static str = "EnterChannel";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.channel.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { channel: u16::read_from(r)? })
    }
}

/// `EnterChannelOK` (S2c): echoes the accepted channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterChannelOkS2c {
    pub channel: u16,
}

impl Command for EnterChannelOkS2c {
    const ID: u16 = 0x0011;
    const NAME: &'static str = "EnterChannelOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.channel.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { channel: u16::read_from(r)? })
    }
}

/// `MakeRoom` (C2s): allocates a new Race room via the room system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeRoomC2s {
    pub name: WireString,
    pub password: WireString,
    pub map: u32,
    pub race_kind: u8,
    pub max_racers: u8,
}

impl Command for MakeRoomC2s {
    const ID: u16 = 0x0020;
    const NAME: &'static str = "MakeRoom";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.name.write_to(w)?;
        self.password.write_to(w)?;
        self.map.write_to(w)?;
        self.race_kind.write_to(w)?;
        self.max_racers.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            name: WireString::read_from(r)?,
            password: WireString::read_from(r)?,
            map: u32::read_from(r)?,
            race_kind: u8::read_from(r)?,
            max_racers: u8::read_from(r)?,
        })
    }
}

/// `MakeRoomOK` (S2c): the new room's UID plus its race-host
/// advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MakeRoomOkS2c {
    pub room_uid: Uid,
    pub race_host: HostAdvertisement,
}

impl Command for MakeRoomOkS2c {
    const ID: u16 = 0x0021;
    const NAME: &'static str = "MakeRoomOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.room_uid.write_to(w)?;
        self.race_host.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            room_uid: Uid::read_from(r)?,
            race_host: HostAdvertisement::read_from(r)?,
        })
    }
}

/// `ShowInventory` (C2s): no payload, a request for the current item
/// and horse lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShowInventoryC2s;

impl Command for ShowInventoryC2s {
    const ID: u16 = 0x0030;
    const NAME: &'static str = "ShowInventory";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `ShowInventoryOK` (S2c).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowInventoryOkS2c {
    pub items: SizedVecU16<crate::model::Item>,
    pub horses: SizedVecU16<Horse>,
}

impl Command for ShowInventoryOkS2c {
    const ID: u16 = 0x0031;
    const NAME: &'static str = "ShowInventoryOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.items.write_to(w)?;
        self.horses.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            items: SizedVecU16::read_from(r)?,
            horses: SizedVecU16::read_from(r)?,
        })
    }
}

/// `AchievementCompleteList` (C2s): requests the (currently always
/// empty) achievement list for the requesting character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementListC2s {
    pub character_uid: Uid,
}

impl Command for AchievementListC2s {
    const ID: u16 = 0x0040;
    const NAME: &'static str = "AchievementCompleteList";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { character_uid: Uid::read_from(r)? })
    }
}

/// `AchievementCompleteListOK` (S2c).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AchievementListOkS2c {
    pub character_uid: Uid,
    pub achievements: SizedVecU16<u32>,
}

impl Command for AchievementListOkS2c {
    const ID: u16 = 0x0041;
    const NAME: &'static str = "AchievementCompleteListOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)?;
        self.achievements.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_uid: Uid::read_from(r)?,
            achievements: SizedVecU16::read_from(r)?,
        })
    }
}

/// `RequestLeagueInfo` / quest list request (C2s): always answered with
/// an empty collection, keyed by character UID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestListC2s {
    pub character_uid: Uid,
}

impl Command for QuestListC2s {
    const ID: u16 = 0x0042;
    const NAME: &'static str = "RequestQuestList";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { character_uid: Uid::read_from(r)? })
    }
}

/// `RequestQuestListOK` (S2c).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestListOkS2c {
    pub character_uid: Uid,
    pub quests: SizedVecU16<u32>,
}

impl Command for QuestListOkS2c {
    const ID: u16 = 0x0043;
    const NAME: &'static str = "RequestQuestListOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.character_uid.write_to(w)?;
        self.quests.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self {
            character_uid: Uid::read_from(r)?,
            quests: SizedVecU16::read_from(r)?,
        })
    }
}

/// `EnterRanch` (C2s): the lobby's ranch-visit request, distinct from
/// the Ranch service's own `RanchEnter` (this is the lobby handing out
/// an advertisement, not the actual join).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterRanchC2s {
    pub ranch_uid: Uid,
}

impl Command for EnterRanchC2s {
    const ID: u16 = 0x0050;
    const NAME: &'static str = "LobbyEnterRanch";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.ranch_uid.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { ranch_uid: Uid::read_from(r)? })
    }
}

/// `EnterRanchOK` (S2c): the ranch-host advertisement with its OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterRanchOkS2c {
    pub ranch_host: HostAdvertisement,
}

impl Command for EnterRanchOkS2c {
    const ID: u16 = 0x0051;
    const NAME: &'static str = "LobbyEnterRanchOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.ranch_host.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { ranch_host: HostAdvertisement::read_from(r)? })
    }
}

/// `GetMessengerInfo` (C2s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetMessengerInfoC2s;

impl Command for GetMessengerInfoC2s {
    const ID: u16 = 0x0060;
    const NAME: &'static str = "GetMessengerInfo";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `GetMessengerInfoOK` (S2c): the messenger-host advertisement with
/// its OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetMessengerInfoOkS2c {
    pub messenger_host: HostAdvertisement,
}

impl Command for GetMessengerInfoOkS2c {
    const ID: u16 = 0x0061;
    const NAME: &'static str = "GetMessengerInfoOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.messenger_host.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { messenger_host: HostAdvertisement::read_from(r)? })
    }
}

/// `RequestNdcTreecash` (C2s): hard-currency balance inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InquiryTreecashC2s;

impl Command for InquiryTreecashC2s {
    const ID: u16 = 0x0070;
    const NAME: &'static str = "InquiryTreecash";

    fn write_body(&self, _w: &mut dyn Write) -> CodecResult<()> {
        Ok(())
    }

    fn read_body(_r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self)
    }
}

/// `RequestNdcTreecashOK` (S2c).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InquiryTreecashOkS2c {
    pub cash: u32,
}

impl Command for InquiryTreecashOkS2c {
    const ID: u16 = 0x0071;
    const NAME: &'static str = "InquiryTreecashOK";

    fn write_body(&self, w: &mut dyn Write) -> CodecResult<()> {
        self.cash.write_to(w)
    }

    fn read_body(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(Self { cash: u32::read_from(r)? })
    }
}

/// `Heartbeat`, either direction: a no-op keepalive.
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
    use crate::model::{Character, CharacterParts, Role};
    use crate::time::PackedDateTime;

    fn sample_character() -> Character {
        Character {
            uid: Uid(1),
            nickname: "Rider".into(),
            level: 1,
            carrots: 0,
            cash: 0,
            role: Role::User,
            parts: CharacterParts::default(),
            appearance: 0,
            inventory: vec![].into(),
            character_equipment: vec![].into(),
            mount_equipment: vec![].into(),
            horses: vec![].into(),
            mount_uid: Uid::INVALID,
            ranch_uid: Uid(2),
            gift_storage: vec![].into(),
            purchase_storage: vec![].into(),
            is_muted: false,
            is_ranch_locked: false,
        }
    }

    fn sample_horse() -> Horse {
        Horse {
            uid: Uid(100),
            tid: crate::model::Tid(1),
            parts: Default::default(),
            stats: Default::default(),
            mastery: Default::default(),
            rating: Default::default(),
            condition: Default::default(),
            potential_type: 0,
            potential_level: 0,
            luck_state: 0,
            emblem: 0,
            date_of_birth: PackedDateTime::new(2020, 1, 1, 0, 0),
        }
    }

    #[test]
    fn login_ok_round_trip() {
        let original = LobbyLoginOkS2c {
            file_time_low: 1,
            file_time_high: 2,
            self_uid: Uid(1),
            nickname: "Rider".into(),
            motd: "welcome".into(),
            profile_gender: 0,
            status: "".into(),
            character_equipment: vec![].into(),
            mount_equipment: vec![].into(),
            level: 1,
            carrots: 500,
            option_bitset: 0,
            options: vec![OptionGroup { keycode: 1, payload: vec![1, 2, 3] }],
            age_group: 0,
            achievements: vec![].into(),
            race_host: HostAdvertisement { address: 0x0100_007F, port: 12345, code: 999 },
            scramble_seed: 0xCAFEBABE,
            character: sample_character(),
            mount: sample_horse(),
            compat_groups: Default::default(),
        };

        let frame = encode_command(&original).unwrap();
        let decoded = decode_command_body::<LobbyLoginOkS2c>(LobbyLoginOkS2c::ID, &frame[4..]).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn login_cancel_round_trip() {
        let original = LobbyLoginCancelS2c { reason: LobbyLoginCancelReason::Banned };
        let frame = encode_command(&original).unwrap();
        let decoded = decode_command_body::<LobbyLoginCancelS2c>(LobbyLoginCancelS2c::ID, &frame[4..]).unwrap();
        assert_eq!(decoded, original);
    }
}
