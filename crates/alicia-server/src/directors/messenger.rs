//! The Messenger service: friend presence over the fixed-key framing.
//! There is no persisted friend-relationship entity; "online friends"
//! is built by scanning whoever else is currently logged into this
//! listener, exactly as the wire format's own doc comment describes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use alicia_net::{ClientId, ClientRegistry, Inbound};
use alicia_protocol::command::messenger::{ChatCmdLoginAckOkS2c, ChatterLoginC2s, FriendEntry, FriendGroup};
use alicia_protocol::model::Uid;

use crate::dispatch::HandlerTable;
use crate::error::{DirectorError, DirectorResult};
use crate::instance::ServerInstance;

pub struct MessengerDirector {
    instance: Arc<ServerInstance>,
    handlers: HandlerTable<MessengerDirector>,
    registry: ClientRegistry,
    /// Every character currently logged into this listener, keyed by
    /// connection. Its membership IS the online-friends answer.
    online: Mutex<HashMap<ClientId, Uid>>,
}

impl MessengerDirector {
    pub fn new(instance: Arc<ServerInstance>, registry: ClientRegistry) -> Self {
        let mut handlers = HandlerTable::new();
        handlers.register::<ChatterLoginC2s>(Self::handle_chatter_login);
        Self { instance, handlers, registry, online: Mutex::new(HashMap::new()) }
    }

    pub fn handle_inbound(&self, event: Inbound) -> DirectorResult<()> {
        match event {
            Inbound::Connected { .. } => Ok(()),
            Inbound::Command { client_id, command_id, body } => {
                self.handlers.dispatch(self, client_id, command_id, &body)
            }
            Inbound::Disconnected { client_id } => {
                self.online.lock().remove(&client_id);
                Ok(())
            }
        }
    }

    /// Binds the connection to `cmd.character_uid` and replies with the
    /// group of everyone else currently online. `auth_token` is not
    /// checked against a stored credential: by the time a client reaches
    /// the Messenger it has already cleared the Lobby's OTP handoff for
    /// this character, which is the authorization this connection relies on.
    fn handle_chatter_login(&self, client_id: ClientId, cmd: ChatterLoginC2s) -> DirectorResult<()> {
        let Some(client) = self.registry.get(client_id) else { return Ok(()) };

        if self.instance.data.characters.get(cmd.character_uid).is_none() {
            return Err(DirectorError::Unauthenticated);
        }

        self.online.lock().insert(client_id, cmd.character_uid);

        let others: Vec<(ClientId, Uid)> =
            self.online.lock().iter().map(|(&cid, &uid)| (cid, uid)).filter(|&(cid, _)| cid != client_id).collect();

        let mut entries = Vec::with_capacity(others.len());
        for (_, uid) in others {
            let Some(character) = self.instance.data.characters.get(uid) else { continue };
            entries.push(FriendEntry {
                character_uid: uid,
                nickname: character.immutable(|c| c.nickname.get().as_str().into()),
                online: true,
            });
        }

        client.send_command(&ChatCmdLoginAckOkS2c {
            groups: vec![FriendGroup { name: "Online".into(), entries: entries.into() }].into(),
        })?;
        Ok(())
    }
}
