//! The `Record` access contract: shared-read or exclusive-write access
//! to one cached entity, scoped to a closure so the lock is always
//! released before the caller regains control (see the design note
//! against returning raw references).

use std::sync::Arc;

use parking_lot::RwLock;

use crate::entity::DataEntity;

/// One cache slot. `available` gates whether a `Get` may hand out a
/// [`Record`] yet (a miss enqueues the key for retrieval and the entry
/// stays unavailable until the next tick loads it); `dirty` is set by
/// every `Mutable` access and cleared once the store hook has flushed
/// it.
pub(crate) struct Entry<T> {
    pub(crate) value: RwLock<T>,
    pub(crate) dirty: std::sync::atomic::AtomicBool,
}

impl<T> Entry<T> {
    pub(crate) fn new(value: T) -> Arc<Self> {
        Arc::new(Self { value: RwLock::new(value), dirty: std::sync::atomic::AtomicBool::new(false) })
    }
}

/// A handle to one available, locked entity. Acquired from a
/// [`crate::Cache`]; outlives neither the cache nor the entry it
/// points at, enforced by holding an `Arc` rather than a borrow.
#[derive(Clone)]
pub struct Record<T: DataEntity> {
    pub(crate) entry: Arc<Entry<T>>,
}

impl<T: DataEntity> Record<T> {
    /// Acquires shared-read access and invokes `f` with a const view.
    /// Multiple concurrent immutable holders are permitted.
    pub fn immutable<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.entry.value.read();
        f(&guard)
    }

    /// Acquires exclusive write access, invokes `f`, and marks the
    /// record dirty so the next cache tick flushes it through the
    /// store hook.
    pub fn mutable<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.entry.value.write();
        let result = f(&mut guard);
        self.entry.dirty.store(true, std::sync::atomic::Ordering::Release);
        result
    }

    pub fn is_dirty(&self) -> bool {
        self.entry.dirty.load(std::sync::atomic::Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alicia_protocol::model::Uid;

    #[derive(Clone)]
    struct Dummy {
        uid: Uid,
        counter: u32,
    }

    impl DataEntity for Dummy {
        fn uid(&self) -> Uid {
            self.uid
        }
    }

    #[test]
    fn mutable_marks_dirty_but_immutable_does_not() {
        let record = Record { entry: Entry::new(Dummy { uid: Uid(1), counter: 0 }) };
        assert!(!record.is_dirty());
        record.immutable(|d| d.counter);
        assert!(!record.is_dirty());
        record.mutable(|d| d.counter += 1);
        assert!(record.is_dirty());
    }

    #[test]
    fn multiple_immutable_reads_observe_the_same_value() {
        let record = Record { entry: Entry::new(Dummy { uid: Uid(1), counter: 7 }) };
        let a = record.immutable(|d| d.counter);
        let b = record.immutable(|d| d.counter);
        assert_eq!(a, b);
    }
}
