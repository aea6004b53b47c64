//! The Race service: transient match rooms hosted out of the Lobby's
//! `MakeRoom`. A room lives only as long as at least one racer is
//! present in it and is driven through `NotReady -> Ready -> Loading
//! -> Racing` by [`RaceDirector::tick`] once every racer has readied up.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use alicia_net::{ClientId, ClientRegistry, Inbound};
use alicia_protocol::command::race::{
    ChangeRoomOptionsC2s, ChangeRoomOptionsNotifyS2c, CountdownNotifyS2c, EnterRoomC2s, EnterRoomCancelS2c,
    EnterRoomOkS2c, HeartbeatC2s as RaceHeartbeatC2s, RaceReadyC2s, RaceReadyNotifyS2c, RaceStartS2c, RaceState,
    RacerEntry, UserRaceTimerC2s, UserRaceTimerOkS2c,
};
use alicia_protocol::command::Command;
use alicia_protocol::model::Uid;

use crate::dispatch::HandlerTable;
use crate::error::{DirectorError, DirectorResult};
use crate::instance::ServerInstance;

/// Seconds the pre-race countdown runs for once every racer is ready.
const COUNTDOWN_SECONDS: u8 = 5;

#[derive(Debug, Clone, Copy)]
struct RaceSession {
    room_uid: Uid,
    character_uid: Uid,
}

struct Racer {
    client_id: ClientId,
    nickname: String,
    state: RaceState,
}

#[derive(Default)]
struct RaceRoomState {
    racers: HashMap<Uid, Racer>,
    countdown: Option<u8>,
}

struct PendingEnter {
    client_id: ClientId,
    room_uid: Uid,
    character_uid: Uid,
}

pub struct RaceDirector {
    instance: Arc<ServerInstance>,
    handlers: HandlerTable<RaceDirector>,
    registry: ClientRegistry,
    sessions: Mutex<HashMap<ClientId, RaceSession>>,
    rooms: Mutex<HashMap<Uid, RaceRoomState>>,
    pending_enters: Mutex<VecDeque<PendingEnter>>,
}

impl RaceDirector {
    pub fn new(instance: Arc<ServerInstance>, registry: ClientRegistry) -> Self {
        let mut handlers = HandlerTable::new();
        handlers.register::<EnterRoomC2s>(Self::handle_enter_room);
        handlers.register::<ChangeRoomOptionsC2s>(Self::handle_change_room_options);
        handlers.register::<RaceReadyC2s>(Self::handle_race_ready);
        handlers.register::<UserRaceTimerC2s>(Self::handle_user_race_timer);
        handlers.register::<RaceHeartbeatC2s>(|_, _, _| Ok(()));
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

    pub fn retry_pending(&self) {
        let pending: Vec<PendingEnter> = std::mem::take(&mut *self.pending_enters.lock()).into();
        for p in pending {
            if let Err(e) = self.complete_enter(p.client_id, p.room_uid, p.character_uid) {
                warn!(error = %e, "retrying pending race room entry failed");
            }
        }
    }

    /// Advances every room's pre-race countdown by one tick.
    pub fn tick(&self) {
        let mut active_rooms = Vec::new();
        {
            let mut rooms = self.rooms.lock();
            for (&room_uid, room) in rooms.iter_mut() {
                let Some(remaining) = room.countdown else { continue };
                if remaining == 0 {
                    for racer in room.racers.values_mut() {
                        racer.state = RaceState::Racing;
                    }
                    room.countdown = None;
                    active_rooms.push(room_uid);
                } else {
                    room.countdown = Some(remaining - 1);
                    active_rooms.push(room_uid);
                }
            }
        }
        for room_uid in active_rooms {
            let (remaining, client_ids): (Option<u8>, Vec<ClientId>) = {
                let rooms = self.rooms.lock();
                let Some(room) = rooms.get(&room_uid) else { continue };
                (room.countdown, room.racers.values().map(|r| r.client_id).collect())
            };
            for id in client_ids {
                let Some(client) = self.registry.get(id) else { continue };
                let result = match remaining {
                    Some(seconds) => client.send_command(&CountdownNotifyS2c { seconds_remaining: seconds }),
                    None => Ok(()),
                };
                if let Err(e) = result {
                    warn!(error = %e, "failed to send countdown notify");
                }
            }
            if remaining.is_none() {
                self.instance.rooms.record_race_hosted(room_uid);
            }
        }
    }

    fn handle_enter_room(&self, client_id: ClientId, cmd: EnterRoomC2s) -> DirectorResult<()> {
        if self.instance.rooms.get(cmd.room_uid).is_none() {
            return Err(DirectorError::UnknownRoom(cmd.room_uid.0));
        }
        if !self.instance.otp.authorize(cmd.room_uid, cmd.otp) {
            if let Some(client) = self.registry.get(client_id) {
                client.send_command(&EnterRoomCancelS2c)?;
            }
            return Ok(());
        }
        self.complete_enter(client_id, cmd.room_uid, cmd.character_uid)
    }

    fn complete_enter(&self, client_id: ClientId, room_uid: Uid, character_uid: Uid) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };

        let Some(character) = self.instance.data.characters.get(character_uid) else {
            self.pending_enters.lock().push_back(PendingEnter { client_id, room_uid, character_uid });
            return Ok(());
        };
        let nickname = character.immutable(|c| c.nickname.get().clone());

        let mut rooms = self.rooms.lock();
        let room = rooms.entry(room_uid).or_default();
        room.racers.insert(character_uid, Racer { client_id, nickname, state: RaceState::NotReady });

        let racers: Vec<RacerEntry> = room
            .racers
            .iter()
            .map(|(&uid, racer)| RacerEntry { character_uid: uid, nickname: racer.nickname.as_str().into(), state: racer.state })
            .collect();
        drop(rooms);

        client.send_command(&EnterRoomOkS2c { room_uid, racers: racers.into() })?;
        self.sessions.lock().insert(client_id, RaceSession { room_uid, character_uid });
        Ok(())
    }

    fn cleanup_departure(&self, client_id: ClientId) -> DirectorResult<()> {
        let Some(session) = self.sessions.lock().remove(&client_id) else { return Ok(()) };
        let mut rooms = self.rooms.lock();
        if let Some(room) = rooms.get_mut(&session.room_uid) {
            room.racers.remove(&session.character_uid);
            if room.racers.is_empty() {
                rooms.remove(&session.room_uid);
            }
        }
        Ok(())
    }

    fn handle_change_room_options(&self, client_id: ClientId, cmd: ChangeRoomOptionsC2s) -> DirectorResult<()> {
        let Some(session) = self.sessions.lock().get(&client_id).copied() else { return Ok(()) };
        let notify = ChangeRoomOptionsNotifyS2c { changed_bits: cmd.changed_bits, payload: cmd.payload };
        self.broadcast_room(session.room_uid, &notify)
    }

    fn handle_race_ready(&self, client_id: ClientId, _cmd: RaceReadyC2s) -> DirectorResult<()> {
        let Some(session) = self.sessions.lock().get(&client_id).copied() else { return Ok(()) };

        let all_ready = {
            let mut rooms = self.rooms.lock();
            let Some(room) = rooms.get_mut(&session.room_uid) else { return Ok(()) };
            if let Some(racer) = room.racers.get_mut(&session.character_uid) {
                racer.state = RaceState::Ready;
            }
            !room.racers.is_empty() && room.racers.values().all(|r| r.state == RaceState::Ready)
        };

        self.broadcast_room(
            session.room_uid,
            &RaceReadyNotifyS2c { character_uid: session.character_uid, state: RaceState::Ready },
        )?;

        if all_ready {
            {
                let mut rooms = self.rooms.lock();
                if let Some(room) = rooms.get_mut(&session.room_uid) {
                    for racer in room.racers.values_mut() {
                        racer.state = RaceState::Loading;
                    }
                    room.countdown = Some(COUNTDOWN_SECONDS);
                }
            }
            self.broadcast_room(session.room_uid, &RaceStartS2c { countdown_seconds: COUNTDOWN_SECONDS })?;
        }
        Ok(())
    }

    fn handle_user_race_timer(&self, client_id: ClientId, _cmd: UserRaceTimerC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };
        client.send_command(&UserRaceTimerOkS2c)?;
        Ok(())
    }

    fn broadcast_room<C: Command>(&self, room_uid: Uid, cmd: &C) -> DirectorResult<()> {
        let client_ids: Vec<ClientId> =
            self.rooms.lock().get(&room_uid).map(|r| r.racers.values().map(|racer| racer.client_id).collect()).unwrap_or_default();
        for id in client_ids {
            if let Some(client) = self.registry.get(id) {
                client.send_command(cmd)?;
            }
        }
        Ok(())
    }
}
