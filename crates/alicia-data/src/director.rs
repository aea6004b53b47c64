//! The top-level owner of every entity cache and its backing source.
//! `alicia-server` holds exactly one `DataDirector` and ticks it once
//! per data-layer iteration; no other component is allowed to reach
//! past it to a [`DataSource`] directly.

use std::path::Path;

use alicia_protocol::model::Uid;

use crate::cache::Cache;
use crate::entity::{
    CharacterEntity, CharacterRow, EggEntity, EggRow, GuildEntity, GuildRow, HorseEntity, HorseRow, InfractionEntity,
    InfractionRow, ItemEntity, ItemRow, PetEntity, PetRow, RanchEntity, RanchRow, StorageItemEntity, StorageItemRow,
    UserEntity, UserRow,
};
use crate::error::DataResult;
use crate::file_source::FileSource;

/// Every persistent entity kind, each with its own cache and its own
/// monotonic UID allocator (see §3.1: UID is unique per entity kind,
/// not globally).
pub struct DataDirector {
    pub users: Cache<UserEntity>,
    pub characters: Cache<CharacterEntity>,
    pub horses: Cache<HorseEntity>,
    pub ranches: Cache<RanchEntity>,
    pub items: Cache<ItemEntity>,
    pub storage_items: Cache<StorageItemEntity>,
    pub guilds: Cache<GuildEntity>,
    pub pets: Cache<PetEntity>,
    pub eggs: Cache<EggEntity>,
    pub infractions: Cache<InfractionEntity>,

    user_source: FileSource<UserEntity, UserRow>,
    character_source: FileSource<CharacterEntity, CharacterRow>,
    horse_source: FileSource<HorseEntity, HorseRow>,
    ranch_source: FileSource<RanchEntity, RanchRow>,
    item_source: FileSource<ItemEntity, ItemRow>,
    storage_item_source: FileSource<StorageItemEntity, StorageItemRow>,
    guild_source: FileSource<GuildEntity, GuildRow>,
    pet_source: FileSource<PetEntity, PetRow>,
    egg_source: FileSource<EggEntity, EggRow>,
    infraction_source: FileSource<InfractionEntity, InfractionRow>,
}

impl DataDirector {
    /// Opens the file-backed source for every entity kind under
    /// `base_path`, one subdirectory each.
    pub fn open_file_backed(base_path: &Path) -> DataResult<Self> {
        Ok(Self {
            users: Cache::new(),
            characters: Cache::new(),
            horses: Cache::new(),
            ranches: Cache::new(),
            items: Cache::new(),
            storage_items: Cache::new(),
            guilds: Cache::new(),
            pets: Cache::new(),
            eggs: Cache::new(),
            infractions: Cache::new(),

            user_source: FileSource::open(base_path, "users", |e| UserRow::from(e), UserEntity::from)?,
            character_source: FileSource::open(base_path, "characters", |e| CharacterRow::from(e), CharacterEntity::from)?,
            horse_source: FileSource::open(base_path, "horses", |e| HorseRow::from(e), HorseEntity::from)?,
            ranch_source: FileSource::open(base_path, "ranches", |e| RanchRow::from(e), RanchEntity::from)?,
            item_source: FileSource::open(base_path, "items", |e| ItemRow::from(e), ItemEntity::from)?,
            storage_item_source: FileSource::open(base_path, "storage_items", |e| StorageItemRow::from(e), StorageItemEntity::from)?,
            guild_source: FileSource::open(base_path, "guilds", |e| GuildRow::from(e), GuildEntity::from)?,
            pet_source: FileSource::open(base_path, "pets", |e| PetRow::from(e), PetEntity::from)?,
            egg_source: FileSource::open(base_path, "eggs", |e| EggRow::from(e), EggEntity::from)?,
            infraction_source: FileSource::open(base_path, "infractions", |e| InfractionRow::from(e), InfractionEntity::from)?,
        })
    }

    pub fn allocate_user_uid(&self) -> DataResult<Uid> {
        self.user_source.allocate_uid()
    }

    pub fn allocate_character_uid(&self) -> DataResult<Uid> {
        self.character_source.allocate_uid()
    }

    pub fn allocate_horse_uid(&self) -> DataResult<Uid> {
        self.horse_source.allocate_uid()
    }

    pub fn allocate_ranch_uid(&self) -> DataResult<Uid> {
        self.ranch_source.allocate_uid()
    }

    pub fn allocate_item_uid(&self) -> DataResult<Uid> {
        self.item_source.allocate_uid()
    }

    pub fn allocate_storage_item_uid(&self) -> DataResult<Uid> {
        self.storage_item_source.allocate_uid()
    }

    pub fn allocate_guild_uid(&self) -> DataResult<Uid> {
        self.guild_source.allocate_uid()
    }

    pub fn allocate_pet_uid(&self) -> DataResult<Uid> {
        self.pet_source.allocate_uid()
    }

    pub fn allocate_egg_uid(&self) -> DataResult<Uid> {
        self.egg_source.allocate_uid()
    }

    pub fn allocate_infraction_uid(&self) -> DataResult<Uid> {
        self.infraction_source.allocate_uid()
    }

    /// Drains every cache's retrieve and store queues. Called once per
    /// server tick from `alicia-server`'s main loop.
    pub fn tick(&self) {
        self.users.tick(&self.user_source);
        self.characters.tick(&self.character_source);
        self.horses.tick(&self.horse_source);
        self.ranches.tick(&self.ranch_source);
        self.items.tick(&self.item_source);
        self.storage_items.tick(&self.storage_item_source);
        self.guilds.tick(&self.guild_source);
        self.pets.tick(&self.pet_source);
        self.eggs.tick(&self.egg_source);
        self.infractions.tick(&self.infraction_source);
    }

    /// Flushes every entry in every cache through its store hook.
    /// Called once at shutdown.
    pub fn terminate(&self) {
        self.users.terminate(&self.user_source);
        self.characters.terminate(&self.character_source);
        self.horses.terminate(&self.horse_source);
        self.ranches.terminate(&self.ranch_source);
        self.items.terminate(&self.item_source);
        self.storage_items.terminate(&self.storage_item_source);
        self.guilds.terminate(&self.guild_source);
        self.pets.terminate(&self.pet_source);
        self.eggs.terminate(&self.egg_source);
        self.infractions.terminate(&self.infraction_source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_tick_and_reopen_round_trips_a_user() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let director = DataDirector::open_file_backed(tmp.path()).unwrap();
            let uid = director.allocate_user_uid().unwrap();
            director.users.create(UserEntity::new(uid, "rider".into(), "tok".into())).unwrap();
            director.tick();
        }
        let reopened = DataDirector::open_file_backed(tmp.path()).unwrap();
        assert!(reopened.users.get(Uid(1)).is_none());
        reopened.tick();
        let record = reopened.users.get(Uid(1)).expect("loaded from disk");
        assert_eq!(record.immutable(|u| u.name.get().clone()), "rider");
    }
}
