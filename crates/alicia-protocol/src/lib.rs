//! Wire codec and command catalog for the game protocol: the frame
//! header scramble, the per-connection keystreams, and the typed
//! `Command` catalog for each of the four services.
//!
//! This crate has no I/O of its own — `alicia-net` drives the actual
//! sockets and calls into [`magic`]/[`scramble`]/[`command`] to turn
//! bytes into values and back.

pub mod command;
pub mod error;
pub mod magic;
pub mod model;
pub mod scramble;
pub mod time;
pub mod wire;

pub use command::Command;
pub use error::{CodecError, CodecResult};
pub use wire::WireCodec;
