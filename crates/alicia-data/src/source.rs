//! The pluggable persistence boundary. A [`Cache`] never assumes
//! anything about *how* an entity is stored; it only calls
//! `retrieve`/`store` from its own tick. See `file_source` for the one
//! reference implementation this crate ships; a SQL-backed source is
//! an external collaborator with the same trait (out of scope as
//! study material, see the purpose/scope notes).
//!
//! [`Cache`]: crate::Cache

use alicia_protocol::model::Uid;

use crate::entity::DataEntity;
use crate::error::DataResult;

/// A source of truth for one entity type. Called only from the
/// `DataDirector`'s own thread; directors must never call a
/// `DataSource` directly.
pub trait DataSource<T: DataEntity>: Send + Sync {
    /// Loads `uid`, or `Ok(None)` if it genuinely does not exist.
    fn retrieve(&self, uid: Uid) -> DataResult<Option<T>>;

    /// Persists `value`. Implementations may use `value`'s `Field`
    /// wrappers to emit a minimal upsert; the reference file backend
    /// simply rewrites the whole record.
    fn store(&self, value: &T) -> DataResult<()>;

    /// Allocates and persists a fresh UID for a new entity of this
    /// type. Backed by the same monotonic counter regardless of entity
    /// kind (see §3.1: UID is unique across all persistent entities).
    fn allocate_uid(&self) -> DataResult<Uid>;
}
