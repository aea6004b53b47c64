//! Wire DTOs for the persistent entities: the shapes a director reads out
//! of a [`crate::command::Command`] body and hands to the data layer, and
//! the shapes the data layer hands back for a reply to embed.
//!
//! These are plain data, not the cache's notion of a record (see
//! `alicia-data`'s `Record<T>`); a director converts between the two at
//! the boundary.

mod character;
mod guild;
mod horse;
mod housing;
mod ids;
mod infraction;
mod item;
mod pet;

pub use character::{Character, CharacterParts, Role};
pub use guild::Guild;
pub use horse::{Horse, HorseMastery, HorseParts, HorseRating, HorseStats, MountCondition};
pub use housing::{Housing, Ranch};
pub use ids::{Oid, Tid, Uid};
pub use infraction::{Infraction, Punishment};
pub use item::{Egg, Item, StorageItem};
pub use pet::Pet;
