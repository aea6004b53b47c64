//! Persistent entity shapes as the cache and data source see them.
//!
//! These are distinct from `alicia_protocol::model`'s wire DTOs: a wire
//! DTO is what a command carries over the socket, built fresh for each
//! reply; a [`DataEntity`] is what lives in a [`crate::Cache`] between
//! requests, with [`crate::Field`] wrappers on the columns that get
//! written back selectively. A director converts between the two at
//! the boundary (see `alicia-server`'s director modules).

mod character;
mod egg;
mod guild;
mod horse;
mod infraction;
mod item;
mod pet;
mod ranch;
mod storage_item;
mod user;

pub use character::{CharacterEntity, CharacterRow};
pub use egg::{EggEntity, EggRow};
pub use guild::{GuildEntity, GuildRow};
pub use horse::{HorseEntity, HorseRow};
pub use infraction::{InfractionEntity, InfractionRow};
pub use item::{ItemEntity, ItemRow};
pub use pet::{PetEntity, PetRow};
pub use ranch::{RanchEntity, RanchRow};
pub use storage_item::{StorageItemEntity, StorageItemRow};
pub use user::{UserEntity, UserRow};

use alicia_protocol::model::Uid;

/// A persistent entity keyed by its immutable UID. Implemented by every
/// `*Entity` type the cache can hold.
pub trait DataEntity: Clone + Send + Sync + 'static {
    fn uid(&self) -> Uid;
}
