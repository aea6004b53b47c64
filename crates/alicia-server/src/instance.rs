//! The server instance: the unique owner of every shared system. A
//! director is handed an `Arc<ServerInstance>` at construction and
//! keeps only that non-owning reference for its whole lifetime, so
//! there is exactly one owner and no cyclic `Arc`s between a director
//! and the systems it drives.

use std::sync::Arc;

use alicia_data::DataDirector;

use crate::chat::ChatSystem;
use crate::config::ServerConfig;
use crate::infractions::InfractionSystem;
use crate::otp::OtpSystem;
use crate::registries::Registries;
use crate::rooms::RoomSystem;

pub struct ServerInstance {
    pub config: ServerConfig,
    pub data: DataDirector,
    pub otp: OtpSystem,
    pub rooms: RoomSystem,
    pub infractions: InfractionSystem,
    pub chat: ChatSystem,
    pub registries: Registries,
}

impl ServerInstance {
    pub fn new(config: ServerConfig, data: DataDirector) -> Arc<Self> {
        Arc::new(Self {
            config,
            data,
            otp: OtpSystem::new(),
            rooms: RoomSystem::new(),
            infractions: InfractionSystem::new(),
            chat: ChatSystem::new(),
            registries: Registries::init(),
        })
    }

    /// Flushes the data director and tears down every other system.
    /// Called once from the shutdown path, after every listener task
    /// has been told to stop accepting new connections.
    pub fn shutdown(&self) {
        self.data.terminate();
        self.registries.teardown();
    }

    /// One iteration of the fixed-cadence tick: drains the data
    /// director's retrieve/store queues. Per-ranch and per-room state
    /// machines tick themselves from their own director's loop.
    pub fn tick(&self) {
        self.data.tick();
    }
}
