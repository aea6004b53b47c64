//! The Lobby service: authentication, nickname creation, and handing
//! out one-time-coded advertisements for the Ranch/Race/Messenger
//! services. The client's very first hop, and the only one that ever
//! allocates a new `UserEntity`/`CharacterEntity`.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use alicia_data::entity::{CharacterEntity, HorseEntity, RanchEntity, UserEntity};
use alicia_net::{ClientId, ClientRegistry, Inbound};
use alicia_protocol::command::lobby::{
    AchievementListC2s, AchievementListOkS2c, CreateNicknameNotifyS2c, EnterChannelC2s, EnterChannelOkS2c,
    EnterRanchC2s, EnterRanchOkS2c, GetMessengerInfoC2s, GetMessengerInfoOkS2c, HeartbeatC2s as LobbyHeartbeatC2s,
    HostAdvertisement, InquiryTreecashC2s, InquiryTreecashOkS2c, LobbyCreateNicknameC2s, LobbyLoginC2s,
    LobbyLoginCancelReason, LobbyLoginCancelS2c, LobbyLoginOkS2c, MakeRoomC2s, MakeRoomOkS2c, QuestListC2s,
    QuestListOkS2c, ShowInventoryC2s, ShowInventoryOkS2c,
};
use alicia_protocol::model::Uid;
use alicia_protocol::time::{FileTime, PackedDateTime};

use crate::config::pack_ipv4;
use crate::dispatch::HandlerTable;
use crate::error::{DirectorError, DirectorResult};
use crate::instance::ServerInstance;

/// What the Lobby knows about one connection. A session only ever
/// moves forward: `Connected` -> `Authenticated` -> `Ready`.
#[derive(Debug, Clone, Copy, Default)]
enum SessionState {
    #[default]
    Connected,
    Authenticated {
        user_uid: Uid,
    },
    Ready {
        #[allow(dead_code)]
        user_uid: Uid,
        character_uid: Uid,
    },
}

/// A login that could not complete because the character/horse records
/// were not yet available in the cache; retried on the next tick.
struct PendingLogin {
    client_id: ClientId,
    user_uid: Uid,
}

pub struct LobbyDirector {
    instance: Arc<ServerInstance>,
    handlers: HandlerTable<LobbyDirector>,
    registry: ClientRegistry,
    sessions: Mutex<HashMap<ClientId, SessionState>>,
    /// Maps the credential presented at login to an account uid. Not
    /// persisted: after a restart, returning accounts simply register
    /// again under the same login id and a fresh uid. A production
    /// build would key `UserEntity` by login id directly instead of a
    /// separately-allocated numeric uid.
    login_index: Mutex<HashMap<String, Uid>>,
    pending_logins: Mutex<VecDeque<PendingLogin>>,
}

impl LobbyDirector {
    pub fn new(instance: Arc<ServerInstance>, registry: ClientRegistry) -> Self {
        let mut handlers = HandlerTable::new();
        handlers.register::<LobbyLoginC2s>(Self::handle_login);
        handlers.register::<LobbyCreateNicknameC2s>(Self::handle_create_nickname);
        handlers.register::<EnterChannelC2s>(Self::handle_enter_channel);
        handlers.register::<MakeRoomC2s>(Self::handle_make_room);
        handlers.register::<ShowInventoryC2s>(Self::handle_show_inventory);
        handlers.register::<AchievementListC2s>(Self::handle_achievement_list);
        handlers.register::<QuestListC2s>(Self::handle_quest_list);
        handlers.register::<EnterRanchC2s>(Self::handle_enter_ranch);
        handlers.register::<GetMessengerInfoC2s>(Self::handle_get_messenger_info);
        handlers.register::<InquiryTreecashC2s>(Self::handle_inquiry_treecash);
        handlers.register::<LobbyHeartbeatC2s>(|_, _, _| Ok(()));
        Self {
            instance,
            handlers,
            registry,
            sessions: Mutex::new(HashMap::new()),
            login_index: Mutex::new(HashMap::new()),
            pending_logins: Mutex::new(VecDeque::new()),
        }
    }

    pub fn handle_inbound(&self, event: Inbound) -> DirectorResult<()> {
        match event {
            Inbound::Connected { client } => {
                self.sessions.lock().insert(client.id(), SessionState::Connected);
                Ok(())
            }
            Inbound::Command { client_id, command_id, body } => {
                self.handlers.dispatch(self, client_id, command_id, &body)
            }
            Inbound::Disconnected { client_id } => {
                self.sessions.lock().remove(&client_id);
                Ok(())
            }
        }
    }

    /// Retries every login that previously missed the character/horse
    /// cache. Called once per tick, after the data director's own tick
    /// has had a chance to load whatever was queued.
    pub fn retry_pending(&self) {
        let pending: Vec<PendingLogin> = std::mem::take(&mut *self.pending_logins.lock()).into();
        for login in pending {
            if let Err(e) = self.complete_login(login.client_id, login.user_uid) {
                warn!(error = %e, "retrying pending login failed");
            }
        }
    }

    fn handle_login(&self, client_id: ClientId, cmd: LobbyLoginC2s) -> DirectorResult<()> {
        let login_id = cmd.login_id.0.clone();
        let uid = {
            let mut index = self.login_index.lock();
            if let Some(&existing) = index.get(&login_id) {
                existing
            } else {
                let uid = self.instance.data.allocate_user_uid()?;
                self.instance
                    .data
                    .users
                    .create(UserEntity::new(uid, login_id.clone(), cmd.auth_token.0.clone()))?;
                index.insert(login_id, uid);
                uid
            }
        };

        self.sessions.lock().insert(client_id, SessionState::Authenticated { user_uid: uid });
        self.complete_login(client_id, uid)
    }

    fn complete_login(&self, client_id: ClientId, user_uid: Uid) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };

        let Some(user) = self.instance.data.users.get(user_uid) else {
            self.pending_logins.lock().push_back(PendingLogin { client_id, user_uid });
            return Ok(());
        };

        let infraction_uids = user.immutable(|u| u.infractions.get().clone());
        let verdict = self.instance.infractions.evaluate(&self.instance.data, &infraction_uids, PackedDateTime::now());
        if verdict.prevent_server_joining {
            client.send_command(&LobbyLoginCancelS2c { reason: LobbyLoginCancelReason::Banned })?;
            return Ok(());
        }

        let character_uid = user.immutable(|u| *u.character_uid.get());
        if !character_uid.is_valid() {
            client.send_command(&CreateNicknameNotifyS2c)?;
            return Ok(());
        }

        let Some(character) = self.instance.data.characters.get(character_uid) else {
            self.pending_logins.lock().push_back(PendingLogin { client_id, user_uid });
            return Ok(());
        };
        let mount_uid = character.immutable(|c| *c.mount_uid.get());
        let Some(horse) = self.instance.data.horses.get(mount_uid) else {
            self.pending_logins.lock().push_back(PendingLogin { client_id, user_uid });
            return Ok(());
        };

        let race_addr = self.instance.config.lobby.advertisement.race.resolve()?;
        let now = FileTime::now();
        let reply = LobbyLoginOkS2c {
            file_time_low: now.low,
            file_time_high: now.high,
            self_uid: user_uid,
            nickname: character.immutable(|c| c.nickname.get().as_str().into()),
            motd: self.instance.config.general.brand.as_str().into(),
            profile_gender: 0,
            status: "".into(),
            character_equipment: character.immutable(|c| c.character_equipment.get().clone()).into(),
            mount_equipment: character.immutable(|c| c.mount_equipment.get().clone()).into(),
            level: character.immutable(|c| *c.level.get()),
            carrots: character.immutable(|c| *c.carrots.get()),
            option_bitset: 0,
            options: Vec::new(),
            age_group: 0,
            achievements: Vec::new().into(),
            race_host: HostAdvertisement { address: pack_ipv4(race_addr), port: race_addr.port(), code: 0 },
            scramble_seed: rand::random(),
            character: character.immutable(CharacterEntity::to_wire),
            mount: horse.immutable(HorseEntity::to_wire),
            compat_groups: Default::default(),
        };
        client.send_command(&reply)?;
        self.sessions.lock().insert(client_id, SessionState::Ready { user_uid, character_uid });
        info!(user = user_uid.0, character = character_uid.0, "lobby login complete");
        Ok(())
    }

    fn handle_create_nickname(&self, client_id: ClientId, cmd: LobbyCreateNicknameC2s) -> DirectorResult<()> {
        let user_uid = match self.sessions.lock().get(&client_id).copied() {
            Some(SessionState::Authenticated { user_uid }) => user_uid,
            _ => return Err(DirectorError::Unauthenticated),
        };

        let Some(user) = self.instance.data.users.get(user_uid) else {
            return Err(DirectorError::Unauthenticated);
        };

        let ranch_uid = self.instance.data.allocate_ranch_uid()?;
        self.instance.data.ranches.create(RanchEntity::new(ranch_uid, format!("{}'s Ranch", cmd.nickname.0)))?;

        let character_uid = self.instance.data.allocate_character_uid()?;
        self.instance.data.characters.create(CharacterEntity::new(character_uid, cmd.nickname.0, ranch_uid))?;

        let horse_uid = self.instance.data.allocate_horse_uid()?;
        let template = self.instance.registries.starter_horse_template();
        let horse = HorseEntity::new(horse_uid, template.tid, PackedDateTime::now());
        self.instance.data.horses.create(horse)?;

        let character = self.instance.data.characters.get(character_uid).expect("just created");
        character.mutable(|c| {
            c.mount_uid.set(horse_uid);
            let mut horses = c.horses.get().clone();
            horses.push(horse_uid);
            c.horses.set(horses);
        });

        user.mutable(|u| u.character_uid.set(character_uid));

        self.complete_login(client_id, user_uid)
    }

    fn handle_enter_channel(&self, client_id: ClientId, cmd: EnterChannelC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        client.send_command(&EnterChannelOkS2c { channel: cmd.channel })?;
        Ok(())
    }

    fn handle_make_room(&self, client_id: ClientId, cmd: MakeRoomC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        let room = self.instance.rooms.create(cmd.name.0, cmd.password.0, cmd.map, cmd.race_kind, cmd.max_racers);
        let race_addr = self.instance.config.lobby.advertisement.race.resolve()?;
        let code = self.instance.otp.grant(room.uid);
        client.send_command(&MakeRoomOkS2c {
            room_uid: room.uid,
            race_host: HostAdvertisement { address: pack_ipv4(race_addr), port: race_addr.port(), code },
        })?;
        Ok(())
    }

    fn handle_show_inventory(&self, client_id: ClientId, _cmd: ShowInventoryC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        let character_uid = match self.sessions.lock().get(&client_id).copied() {
            Some(SessionState::Ready { character_uid, .. }) => character_uid,
            _ => return Err(DirectorError::Unauthenticated),
        };
        let Some(character) = self.instance.data.characters.get(character_uid) else { return Ok(()) };
        let horse_uids = character.immutable(|c| c.horses.get().clone());
        let Some(horses) = self.instance.data.horses.get_many(&horse_uids) else { return Ok(()) };
        client.send_command(&ShowInventoryOkS2c {
            items: Vec::new().into(),
            horses: horses.into_iter().map(|h| h.immutable(HorseEntity::to_wire)).collect::<Vec<_>>().into(),
        })?;
        Ok(())
    }

    fn handle_achievement_list(&self, client_id: ClientId, cmd: AchievementListC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        client.send_command(&AchievementListOkS2c { character_uid: cmd.character_uid, achievements: Vec::new().into() })?;
        Ok(())
    }

    fn handle_quest_list(&self, client_id: ClientId, cmd: QuestListC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        client.send_command(&QuestListOkS2c { character_uid: cmd.character_uid, quests: Vec::new().into() })?;
        Ok(())
    }

    fn handle_enter_ranch(&self, client_id: ClientId, cmd: EnterRanchC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        let ranch_addr = self.instance.config.lobby.advertisement.ranch.resolve()?;
        let code = self.instance.otp.grant(cmd.ranch_uid);
        client.send_command(&EnterRanchOkS2c {
            ranch_host: HostAdvertisement { address: pack_ipv4(ranch_addr), port: ranch_addr.port(), code },
        })?;
        Ok(())
    }

    fn handle_get_messenger_info(&self, client_id: ClientId, _cmd: GetMessengerInfoC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        let character_uid = match self.sessions.lock().get(&client_id).copied() {
            Some(SessionState::Ready { character_uid, .. }) => character_uid,
            _ => return Err(DirectorError::Unauthenticated),
        };
        let messenger_addr = self.instance.config.lobby.advertisement.messenger.resolve()?;
        let code = self.instance.otp.grant(character_uid);
        client.send_command(&GetMessengerInfoOkS2c {
            messenger_host: HostAdvertisement { address: pack_ipv4(messenger_addr), port: messenger_addr.port(), code },
        })?;
        Ok(())
    }

    fn handle_inquiry_treecash(&self, client_id: ClientId, _cmd: InquiryTreecashC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        client.send_command(&InquiryTreecashOkS2c { cash: 0 })?;
        Ok(())
    }
}
