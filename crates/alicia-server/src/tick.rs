//! The fixed-cadence tick that drives everything a listener's reactor
//! loop can't: retrying cache misses that blocked a login or room
//! entry, and advancing the Race countdown. `alicia` (the binary
//! crate) owns the actual [`tokio::time::interval`] and calls
//! [`ServerTick::run_once`] on every beat.

use std::sync::Arc;

use crate::directors::{lobby::LobbyDirector, race::RaceDirector, ranch::RanchDirector};
use crate::instance::ServerInstance;

/// Bundles the instance and the directors that have tick-driven work,
/// so the binary crate only has to own one handle per listener plus
/// this one for the shared cadence.
pub struct ServerTick {
    instance: Arc<ServerInstance>,
    lobby: Arc<LobbyDirector>,
    ranch: Arc<RanchDirector>,
    race: Arc<RaceDirector>,
}

impl ServerTick {
    pub fn new(
        instance: Arc<ServerInstance>,
        lobby: Arc<LobbyDirector>,
        ranch: Arc<RanchDirector>,
        race: Arc<RaceDirector>,
    ) -> Self {
        Self { instance, lobby, ranch, race }
    }

    /// One beat: flush the data director first so retries below see
    /// freshly loaded entities, then let each director retry whatever
    /// it queued, then advance race countdowns.
    pub fn run_once(&self) {
        self.instance.tick();
        self.lobby.retry_pending();
        self.ranch.retry_pending();
        self.race.retry_pending();
        self.race.tick();
    }
}
