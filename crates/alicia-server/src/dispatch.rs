//! A command-id-keyed handler table, generic over the director state
//! it closes over. Mirrors the reference packet server's
//! `RegisterHandler<C>`: registration constructs the typed command via
//! `C::read_body`, then hands it to the caller's closure, so handler
//! bodies never touch raw bytes.

use std::collections::HashMap;

use tracing::warn;

use alicia_net::ClientId;
use alicia_protocol::command::{decode_command_body, Command};

use crate::error::DirectorResult;

type BoxedHandler<S> = Box<dyn Fn(&S, ClientId, &[u8]) -> DirectorResult<()> + Send + Sync>;

/// A director's dispatch table. Handler overwrite on re-registration
/// is last-write-wins, matching the reference's documented behavior.
pub struct HandlerTable<S> {
    handlers: HashMap<u16, BoxedHandler<S>>,
}

impl<S> Default for HandlerTable<S> {
    fn default() -> Self {
        Self { handlers: HashMap::new() }
    }
}

impl<S> HandlerTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `C::ID` to `f`: decoding happens here, once, so every
    /// handler body receives an already-typed command value.
    pub fn register<C>(&mut self, f: impl Fn(&S, ClientId, C) -> DirectorResult<()> + Send + Sync + 'static)
    where
        C: Command + 'static,
    {
        self.handlers.insert(
            C::ID,
            Box::new(move |state, client_id, body| {
                let cmd = decode_command_body::<C>(C::ID, body)?;
                f(state, client_id, cmd)
            }),
        );
    }

    /// Looks up `command_id` and invokes its handler. An unregistered
    /// id is logged at warn and otherwise ignored, per the "unknown
    /// command id" error-handling policy: the client stays connected.
    pub fn dispatch(&self, state: &S, client_id: ClientId, command_id: u16, body: &[u8]) -> DirectorResult<()> {
        match self.handlers.get(&command_id) {
            Some(handler) => handler(state, client_id, body),
            None => {
                warn!(command_id, "no handler registered for command id");
                Ok(())
            }
        }
    }
}
