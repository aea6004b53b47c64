//! The write-through record cache: a map from UID to [`Record`],
//! backed by a retrieve queue and a store queue that only the cache's
//! own `tick` ever drains. A miss never blocks the caller; it
//! schedules a retrieval and returns `None` for the caller to retry
//! next tick (see the "cache `Get` never blocks" concurrency note).

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use tracing::warn;

use alicia_protocol::model::Uid;

use crate::entity::DataEntity;
use crate::error::{DataError, DataResult};
use crate::record::{Entry, Record};
use crate::source::DataSource;

#[derive(Default)]
struct PendingQueue {
    order: VecDeque<Uid>,
    pending: HashSet<Uid>,
}

impl PendingQueue {
    fn push(&mut self, uid: Uid) {
        if self.pending.insert(uid) {
            self.order.push_back(uid);
        }
    }

    fn drain(&mut self) -> Vec<Uid> {
        self.pending.clear();
        self.order.drain(..).collect()
    }
}

/// One entity type's cache. Generic over the entity shape so
/// `DataDirector` can hold one per entity kind (`Cache<UserEntity>`,
/// `Cache<CharacterEntity>`, ...) with identical tick semantics.
pub struct Cache<T: DataEntity> {
    entries: Mutex<HashMap<Uid, Record<T>>>,
    retrieve_queue: Mutex<PendingQueue>,
    store_queue: Mutex<PendingQueue>,
}

impl<T: DataEntity> Default for Cache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            retrieve_queue: Mutex::new(PendingQueue::default()),
            store_queue: Mutex::new(PendingQueue::default()),
        }
    }
}

impl<T: DataEntity> Cache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `uid` if it is already available.
    /// Otherwise schedules a retrieval for the next `tick` and returns
    /// `None`.
    pub fn get(&self, uid: Uid) -> Option<Record<T>> {
        if let Some(record) = self.entries.lock().get(&uid).cloned() {
            return Some(record);
        }
        self.retrieve_queue.lock().push(uid);
        None
    }

    /// Returns records for every uid in `uids` only if **all** are
    /// already available; otherwise schedules retrieval for whichever
    /// are missing and returns `None` (no partial results).
    pub fn get_many(&self, uids: &[Uid]) -> Option<Vec<Record<T>>> {
        let entries = self.entries.lock();
        let mut out = Vec::with_capacity(uids.len());
        let mut all_present = true;
        for &uid in uids {
            match entries.get(&uid) {
                Some(record) => out.push(record.clone()),
                None => all_present = false,
            }
        }
        drop(entries);

        if all_present {
            Some(out)
        } else {
            let mut queue = self.retrieve_queue.lock();
            for &uid in uids {
                queue.push(uid);
            }
            None
        }
    }

    /// Atomically inserts a freshly-constructed entity, available
    /// immediately. Fails if `uid` is already present.
    pub fn create(&self, value: T) -> DataResult<Record<T>> {
        let uid = value.uid();
        let mut entries = self.entries.lock();
        if entries.contains_key(&uid) {
            return Err(DataError::AlreadyExists { uid: uid.0 });
        }
        let record = Record { entry: Entry::new(value) };
        record.entry.dirty.store(true, Ordering::Release);
        entries.insert(uid, record.clone());
        drop(entries);
        self.store_queue.lock().push(uid);
        Ok(record)
    }

    /// Enqueues `uid` for store on the next tick. Normally unnecessary:
    /// `Record::mutable` already marks the entry dirty and `tick`
    /// flushes every dirty entry, but a caller can use this to force a
    /// flush of a record it only read immutably.
    pub fn save(&self, uid: Uid) {
        if self.entries.lock().contains_key(&uid) {
            self.store_queue.lock().push(uid);
        }
    }

    pub fn contains(&self, uid: Uid) -> bool {
        self.entries.lock().contains_key(&uid)
    }

    /// Drains the retrieve queue (calling the source's retrieval hook
    /// for each key) and the store queue (calling the source's store
    /// hook for each dirty entry), in that order.
    pub fn tick(&self, source: &dyn DataSource<T>) {
        for uid in self.retrieve_queue.lock().drain() {
            if self.entries.lock().contains_key(&uid) {
                continue;
            }
            match source.retrieve(uid) {
                Ok(Some(value)) => {
                    let record = Record { entry: Entry::new(value) };
                    self.entries.lock().insert(uid, record);
                }
                Ok(None) => warn!(uid = uid.0, "retrieve: entity not found"),
                Err(e) => warn!(uid = uid.0, error = %e, "retrieve failed"),
            }
        }

        let dirty_uids: Vec<Uid> = {
            let entries = self.entries.lock();
            entries
                .iter()
                .filter(|(_, record)| record.is_dirty())
                .map(|(&uid, _)| uid)
                .collect()
        };
        let mut store_targets: HashSet<Uid> = self.store_queue.lock().drain().into_iter().collect();
        store_targets.extend(dirty_uids);

        for uid in store_targets {
            let record = match self.entries.lock().get(&uid).cloned() {
                Some(r) => r,
                None => continue,
            };
            let flushed = record.immutable(|value| source.store(value));
            match flushed {
                Ok(()) => record.entry.dirty.store(false, Ordering::Release),
                Err(e) => warn!(uid = uid.0, error = %e, "store failed, will retry next tick"),
            }
        }
    }

    /// Flushes every entry (dirty or not) through the store hook and
    /// empties the cache. Called once at shutdown.
    pub fn terminate(&self, source: &dyn DataSource<T>) {
        let entries = std::mem::take(&mut *self.entries.lock());
        for (uid, record) in entries {
            if let Err(e) = record.immutable(|value| source.store(value)) {
                warn!(uid = uid.0, error = %e, "final flush failed");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
    use std::sync::Mutex as StdMutex;

    #[derive(Clone)]
    struct Counter {
        uid: Uid,
        value: u32,
    }

    impl DataEntity for Counter {
        fn uid(&self) -> Uid {
            self.uid
        }
    }

    struct MemSource {
        backing: StdMutex<HashMap<u32, u32>>,
        next_uid: AtomicU32,
        retrieve_calls: AtomicU32,
    }

    impl MemSource {
        fn new() -> Self {
            Self { backing: StdMutex::new(HashMap::new()), next_uid: AtomicU32::new(1), retrieve_calls: AtomicU32::new(0) }
        }
    }

    impl DataSource<Counter> for MemSource {
        fn retrieve(&self, uid: Uid) -> DataResult<Option<Counter>> {
            self.retrieve_calls.fetch_add(1, AtomicOrdering::Relaxed);
            Ok(self.backing.lock().unwrap().get(&uid.0).map(|&value| Counter { uid, value }))
        }

        fn store(&self, value: &Counter) -> DataResult<()> {
            self.backing.lock().unwrap().insert(value.uid.0, value.value);
            Ok(())
        }

        fn allocate_uid(&self) -> DataResult<Uid> {
            Ok(Uid(self.next_uid.fetch_add(1, AtomicOrdering::Relaxed)))
        }
    }

    #[test]
    fn miss_then_tick_makes_the_record_available() {
        let source = MemSource::new();
        source.backing.lock().unwrap().insert(5, 42);
        let cache: Cache<Counter> = Cache::new();

        assert!(cache.get(Uid(5)).is_none());
        cache.tick(&source);
        let record = cache.get(Uid(5)).expect("available after tick");
        assert_eq!(record.immutable(|c| c.value), 42);
    }

    #[test]
    fn get_many_requires_every_key_available() {
        let source = MemSource::new();
        source.backing.lock().unwrap().insert(1, 10);
        source.backing.lock().unwrap().insert(2, 20);
        let cache: Cache<Counter> = Cache::new();

        assert!(cache.get_many(&[Uid(1), Uid(2)]).is_none());
        cache.tick(&source);
        let records = cache.get_many(&[Uid(1), Uid(2)]).expect("both available");
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn create_fails_if_uid_exists() {
        let cache: Cache<Counter> = Cache::new();
        cache.create(Counter { uid: Uid(1), value: 0 }).unwrap();
        assert!(cache.create(Counter { uid: Uid(1), value: 1 }).is_err());
    }

    #[test]
    fn mutable_record_flushes_on_tick_and_clears_dirty() {
        let source = MemSource::new();
        let cache: Cache<Counter> = Cache::new();
        let record = cache.create(Counter { uid: Uid(1), value: 0 }).unwrap();
        record.mutable(|c| c.value = 99);
        assert!(record.is_dirty());

        cache.tick(&source);
        assert!(!record.is_dirty());
        assert_eq!(*source.backing.lock().unwrap().get(&1).unwrap(), 99);
    }

    #[test]
    fn terminate_flushes_everything_and_empties_cache() {
        let source = MemSource::new();
        let cache: Cache<Counter> = Cache::new();
        cache.create(Counter { uid: Uid(1), value: 5 }).unwrap();
        cache.terminate(&source);
        assert_eq!(cache.len(), 0);
        assert_eq!(*source.backing.lock().unwrap().get(&1).unwrap(), 5);
    }
}
