//! The reference [`DataSource`] implementation: one JSON file per
//! entity under `<base_path>/<subdir>/<uid>.json`, plus a shared
//! `meta.json` holding the monotonic UID allocator. Every write goes
//! to a sibling temp file and is renamed into place, so a crash mid
//! write never leaves a half-written record behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;

use alicia_protocol::model::Uid;

use crate::entity::DataEntity;
use crate::error::{DataError, DataResult};
use crate::source::DataSource;

#[derive(serde::Serialize, serde::Deserialize, Default)]
struct Meta {
    next_uid: u32,
}

/// A JSON-file-backed [`DataSource`] for one entity kind. `Row` is the
/// on-disk shape (see each `entity::*` module); `to_row`/`from_row`
/// convert between it and the in-memory entity at the I/O boundary.
pub struct FileSource<T, Row> {
    dir: PathBuf,
    meta_path: PathBuf,
    next_uid: AtomicU32,
    to_row: fn(&T) -> Row,
    from_row: fn(Row) -> T,
}

impl<T, Row> FileSource<T, Row>
where
    T: DataEntity,
    Row: Serialize + DeserializeOwned,
{
    /// Opens (creating if absent) `<base_path>/<subdir>`, seeding the
    /// allocator from `<base_path>/<subdir>/meta.json` if present.
    pub fn open(base_path: &Path, subdir: &str, to_row: fn(&T) -> Row, from_row: fn(Row) -> T) -> DataResult<Self> {
        let dir = base_path.join(subdir);
        fs::create_dir_all(&dir)?;
        let meta_path = dir.join("meta.json");
        let meta: Meta = if meta_path.exists() {
            serde_json::from_slice(&fs::read(&meta_path)?)?
        } else {
            Meta::default()
        };
        Ok(Self { dir, meta_path, next_uid: AtomicU32::new(meta.next_uid.max(1)), to_row, from_row })
    }

    fn entity_path(&self, uid: Uid) -> PathBuf {
        self.dir.join(format!("{}.json", uid.0))
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> DataResult<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl<T, Row> DataSource<T> for FileSource<T, Row>
where
    T: DataEntity,
    Row: Serialize + DeserializeOwned,
{
    fn retrieve(&self, uid: Uid) -> DataResult<Option<T>> {
        let path = self.entity_path(uid);
        if !path.exists() {
            return Ok(None);
        }
        let row: Row = serde_json::from_slice(&fs::read(&path)?)?;
        Ok(Some((self.from_row)(row)))
    }

    fn store(&self, value: &T) -> DataResult<()> {
        let row = (self.to_row)(value);
        let bytes = serde_json::to_vec_pretty(&row)?;
        self.write_atomic(&self.entity_path(value.uid()), &bytes)
    }

    fn allocate_uid(&self) -> DataResult<Uid> {
        let uid = self.next_uid.fetch_add(1, Ordering::SeqCst);
        if uid == u32::MAX {
            return Err(DataError::AllocatorExhausted);
        }
        let meta = Meta { next_uid: uid + 1 };
        self.write_atomic(&self.meta_path, &serde_json::to_vec(&meta)?)?;
        Ok(Uid(uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{UserEntity, UserRow};

    fn open_users(dir: &Path) -> FileSource<UserEntity, UserRow> {
        FileSource::open(dir, "users", |e| UserRow::from(e), UserEntity::from).unwrap()
    }

    #[test]
    fn store_then_retrieve_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let source = open_users(tmp.path());
        let user = UserEntity::new(Uid(1), "rider".into(), "token-abc".into());

        source.store(&user).unwrap();
        let loaded = source.retrieve(Uid(1)).unwrap().expect("present");
        assert_eq!(loaded.name.get(), "rider");
        assert_eq!(loaded.token.get(), "token-abc");
    }

    #[test]
    fn retrieve_of_missing_uid_is_ok_none() {
        let tmp = tempfile::tempdir().unwrap();
        let source = open_users(tmp.path());
        assert!(source.retrieve(Uid(999)).unwrap().is_none());
    }

    #[test]
    fn allocate_uid_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let source = open_users(tmp.path());
            assert_eq!(source.allocate_uid().unwrap(), Uid(1));
            assert_eq!(source.allocate_uid().unwrap(), Uid(2));
        }
        let reopened = open_users(tmp.path());
        assert_eq!(reopened.allocate_uid().unwrap(), Uid(3));
    }
}
