//! Transport layer for the game protocol: TCP accept loops, the
//! partial-frame tolerant byte-level reader, and the per-connection
//! scrambling codec. Directors never see a raw socket, only
//! [`server::Inbound`] events and [`client::ClientHandle`]s.

pub mod client;
pub mod codec;
pub mod error;
pub mod frame;
pub mod server;

pub use client::{ClientHandle, ClientId};
pub use error::NetError;
pub use server::{run_listener, ClientRegistry, Inbound, ScrambleKind};
