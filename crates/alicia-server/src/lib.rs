//! Directors, systems, and the shared server instance binding the
//! wire protocol, the data layer, and the in-memory world state
//! together. `alicia` (the binary crate) owns the tokio runtime and
//! the four listeners; everything here is runtime-agnostic and talks
//! to the outside world only through [`alicia_net::Inbound`] events
//! and [`alicia_net::ClientHandle`]s.

pub mod chat;
pub mod config;
pub mod directors;
pub mod dispatch;
pub mod error;
pub mod infractions;
pub mod instance;
pub mod otp;
pub mod registries;
pub mod rooms;
pub mod tick;
pub mod world;

pub use config::ServerConfig;
pub use directors::{lobby::LobbyDirector, messenger::MessengerDirector, race::RaceDirector, ranch::RanchDirector};
pub use error::{ConfigError, DirectorError, DirectorResult};
pub use instance::ServerInstance;
pub use tick::ServerTick;
