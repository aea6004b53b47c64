//! The Ranch service: the persistent per-ranch instance where
//! co-present characters and horses interact in real time. Occupancy,
//! OID assignment, and broadcast are all scoped to one ranch uid at a
//! time; a character visiting two ranches across two sessions gets two
//! independent [`WorldTracker`]s.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use alicia_data::entity::{CharacterEntity, HorseEntity};
use alicia_net::{ClientId, ClientRegistry, Inbound};
use alicia_protocol::command::ranch::{
    EnterRanchNotifyS2c, HeartbeatC2s as RanchHeartbeatC2s, LeaveRanchNotifyS2c, RanchChatC2s, RanchChatNotifyS2c,
    RanchEnterC2s, RanchEnterCancelS2c, RanchEnterOkS2c, RanchLeaveC2s, RanchOccupant, RanchSnapshotC2s,
    RanchStuffC2s, RanchStuffNotifyS2c, SnapshotNotifyS2c,
};
use alicia_protocol::command::Command;
use alicia_protocol::model::{Oid, Role, Uid};

use crate::chat::ChatOutcome;
use crate::dispatch::HandlerTable;
use crate::error::DirectorResult;
use crate::instance::ServerInstance;
use crate::world::WorldTracker;

#[derive(Debug, Clone, Copy)]
struct RanchSession {
    ranch_uid: Uid,
    character_uid: Uid,
    horse_uid: Uid,
}

/// A ranch with at least one occupant. Dropped from the map entirely
/// once the last occupant leaves, so its [`WorldTracker`] always
/// starts fresh for whoever enters next.
#[derive(Default)]
struct RanchRoom {
    world: WorldTracker,
    members: HashMap<Uid, ClientId>,
}

struct PendingEnter {
    client_id: ClientId,
    ranch_uid: Uid,
    character_uid: Uid,
}

pub struct RanchDirector {
    instance: Arc<ServerInstance>,
    handlers: HandlerTable<RanchDirector>,
    registry: ClientRegistry,
    sessions: Mutex<HashMap<ClientId, RanchSession>>,
    rooms: Mutex<HashMap<Uid, RanchRoom>>,
    pending_enters: Mutex<VecDeque<PendingEnter>>,
}

impl RanchDirector {
    pub fn new(instance: Arc<ServerInstance>, registry: ClientRegistry) -> Self {
        let mut handlers = HandlerTable::new();
        handlers.register::<RanchEnterC2s>(Self::handle_ranch_enter);
        handlers.register::<RanchLeaveC2s>(Self::handle_ranch_leave);
        handlers.register::<RanchSnapshotC2s>(Self::handle_ranch_snapshot);
        handlers.register::<RanchChatC2s>(Self::handle_ranch_chat);
        handlers.register::<RanchStuffC2s>(Self::handle_ranch_stuff);
        handlers.register::<RanchHeartbeatC2s>(|_, _, _| Ok(()));
        Self {
            instance,
            handlers,
            registry,
            sessions: Mutex::new(HashMap::new()),
            rooms: Mutex::new(HashMap::new()),
            pending_enters: Mutex::new(VecDeque::new()),
        }
    }

    pub fn handle_inbound(&self, event: Inbound) -> DirectorResult<()> {
        match event {
            Inbound::Connected { .. } => Ok(()),
            Inbound::Command { client_id, command_id, body } => {
                self.handlers.dispatch(self, client_id, command_id, &body)
            }
            Inbound::Disconnected { client_id } => self.cleanup_departure(client_id),
        }
    }

    /// Retries every ranch entry that previously missed the
    /// ranch/character/horse cache. Called once per tick, after the
    /// data director's own tick has had a chance to load them.
    pub fn retry_pending(&self) {
        let pending: Vec<PendingEnter> = std::mem::take(&mut *self.pending_enters.lock()).into();
        for p in pending {
            if let Err(e) = self.complete_enter(p.client_id, p.ranch_uid, p.character_uid) {
                warn!(error = %e, "retrying pending ranch entry failed");
            }
        }
    }

    fn handle_ranch_enter(&self, client_id: ClientId, cmd: RanchEnterC2s) -> DirectorResult<()> {
        if !self.instance.otp.authorize(cmd.ranch_uid, cmd.otp) {
            if let Some(client) = self.registry.get(client_id) {
                client.send_command(&RanchEnterCancelS2c)?;
            }
            return Ok(());
        }
        self.complete_enter(client_id, cmd.ranch_uid, cmd.character_uid)
    }

    fn complete_enter(&self, client_id: ClientId, ranch_uid: Uid, character_uid: Uid) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };

        let Some(ranch) = self.instance.data.ranches.get(ranch_uid) else {
            self.pending_enters.lock().push_back(PendingEnter { client_id, ranch_uid, character_uid });
            return Ok(());
        };
        let Some(character) = self.instance.data.characters.get(character_uid) else {
            self.pending_enters.lock().push_back(PendingEnter { client_id, ranch_uid, character_uid });
            return Ok(());
        };
        let mount_uid = character.immutable(|c| *c.mount_uid.get());
        let Some(horse) = self.instance.data.horses.get(mount_uid) else {
            self.pending_enters.lock().push_back(PendingEnter { client_id, ranch_uid, character_uid });
            return Ok(());
        };

        let mut rooms = self.rooms.lock();
        let room = rooms.entry(ranch_uid).or_default();

        let character_oid = room.world.add_character(character_uid);
        let horse_oid = room.world.add_horse(mount_uid);
        room.members.insert(character_uid, client_id);

        // The entering client is already in `room.world`/`room.members` at
        // this point, so it appears in its own occupant list (self included,
        // in OID order), matching `EnterRanchOK`'s roster semantics.
        let mut occupant_uids: Vec<Uid> = room.members.keys().copied().collect();
        occupant_uids.sort_by_key(|&uid| room.world.character_oid(uid).0);

        let mut occupants = Vec::with_capacity(occupant_uids.len());
        for existing_uid in occupant_uids {
            let Some(existing_character) = self.instance.data.characters.get(existing_uid) else { continue };
            let existing_mount = existing_character.immutable(|c| *c.mount_uid.get());
            let Some(existing_horse) = self.instance.data.horses.get(existing_mount) else { continue };
            occupants.push(RanchOccupant {
                character_oid: room.world.character_oid(existing_uid),
                character: existing_character.immutable(CharacterEntity::to_wire),
                horse_oid: room.world.horse_oid(existing_mount),
                horse: existing_horse.immutable(HorseEntity::to_wire),
            });
        }

        let reply = RanchEnterOkS2c {
            ranch_uid,
            ranch_name: ranch.immutable(|r| r.name.as_str().into()),
            housing: ranch.immutable(|r| r.housing.clone()).into(),
            occupants: occupants.into(),
            scramble_seed: rand::random(),
            incubator_slots: [0, 0, 0],
            league_tier: 0,
            league_score: 0,
        };
        let notify = EnterRanchNotifyS2c {
            character_oid,
            character: character.immutable(CharacterEntity::to_wire),
            horse_oid,
            horse: horse.immutable(HorseEntity::to_wire),
        };
        drop(rooms);

        client.send_command(&reply)?;
        self.broadcast_except(ranch_uid, client_id, &notify)?;

        self.sessions.lock().insert(client_id, RanchSession { ranch_uid, character_uid, horse_uid: mount_uid });
        Ok(())
    }

    fn handle_ranch_leave(&self, client_id: ClientId, _cmd: RanchLeaveC2s) -> DirectorResult<()> {
        self.cleanup_departure(client_id)
    }

    fn cleanup_departure(&self, client_id: ClientId) -> DirectorResult<()> {
        let Some(session) = self.sessions.lock().remove(&client_id) else { return Ok(()) };
        {
            let mut rooms = self.rooms.lock();
            if let Some(room) = rooms.get_mut(&session.ranch_uid) {
                room.members.remove(&session.character_uid);
                room.world.remove_character(session.character_uid);
                room.world.remove_horse(session.horse_uid);
                if room.members.is_empty() {
                    rooms.remove(&session.ranch_uid);
                }
            }
        }
        self.broadcast_room(session.ranch_uid, &LeaveRanchNotifyS2c { character_uid: session.character_uid })
    }

    fn handle_ranch_snapshot(&self, client_id: ClientId, cmd: RanchSnapshotC2s) -> DirectorResult<()> {
        let Some(session) = self.sessions.lock().get(&client_id).copied() else { return Ok(()) };
        let character_oid = {
            let rooms = self.rooms.lock();
            rooms.get(&session.ranch_uid).map(|r| r.world.character_oid(session.character_uid)).unwrap_or(Oid::INVALID)
        };
        self.broadcast_except(session.ranch_uid, client_id, &SnapshotNotifyS2c { character_oid, pose: cmd.pose })
    }

    fn handle_ranch_chat(&self, client_id: ClientId, cmd: RanchChatC2s) -> DirectorResult<()> {
        let Some(session) = self.sessions.lock().get(&client_id).copied() else { return Ok(()) };
        let role = self
            .instance
            .data
            .characters
            .get(session.character_uid)
            .map(|c| c.immutable(|c| *c.role.get()))
            .unwrap_or(Role::User);

        match self.instance.chat.handle(&self.instance.data, session.character_uid, role, &cmd.message) {
            ChatOutcome::Broadcast(text) => self.broadcast_room(
                session.ranch_uid,
                &RanchChatNotifyS2c { character_uid: session.character_uid, message: text.as_str().into() },
            )?,
            ChatOutcome::CommandReply(lines) => {
                if let Some(client) = self.registry.get(client_id) {
                    for line in lines {
                        client.send_command(&RanchChatNotifyS2c {
                            character_uid: session.character_uid,
                            message: line.as_str().into(),
                        })?;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_ranch_stuff(&self, client_id: ClientId, cmd: RanchStuffC2s) -> DirectorResult<()> {
        let Some(session) = self.sessions.lock().get(&client_id).copied() else { return Ok(()) };
        let Some(character) = self.instance.data.characters.get(session.character_uid) else { return Ok(()) };
        let money_total = character.mutable(|c| {
            let updated = c.carrots.get().saturating_add_signed(cmd.value);
            c.carrots.set(updated);
            updated
        });
        if let Some(client) = self.registry.get(client_id) {
            client.send_command(&RanchStuffNotifyS2c { event_id: cmd.event_id, money_delta: cmd.value, money_total })?;
        }
        Ok(())
    }

    fn broadcast_room<C: Command>(&self, ranch_uid: Uid, cmd: &C) -> DirectorResult<()> {
        let member_ids: Vec<ClientId> =
            self.rooms.lock().get(&ranch_uid).map(|r| r.members.values().copied().collect()).unwrap_or_default();
        for id in member_ids {
            if let Some(client) = self.registry.get(id) {
                client.send_command(cmd)?;
            }
        }
        Ok(())
    }

    fn broadcast_except<C: Command>(&self, ranch_uid: Uid, except: ClientId, cmd: &C) -> DirectorResult<()> {
        let member_ids: Vec<ClientId> = self
            .rooms
            .lock()
            .get(&ranch_uid)
            .map(|r| r.members.values().copied().filter(|&id| id != except).collect())
            .unwrap_or_default();
        for id in member_ids {
            if let Some(client) = self.registry.get(id) {
                client.send_command(cmd)?;
            }
        }
        Ok(())
    }
}
