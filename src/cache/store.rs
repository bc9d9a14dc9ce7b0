//! Cache storage for tip and draft reads.
//!
//! The full-collection slots are unbounded singletons; the by-id map uses
//! LRU eviction with a configurable limit. All locks recover from
//! poisoning instead of propagating a panic from another thread.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lru::LruCache;
use metrics::counter;
use tracing::warn;

use crate::domain::entities::{DraftRecord, TipRecord};

use super::config::CacheConfig;

/// Cache in front of the durable tip store.
pub struct TipCache {
    all_tips: RwLock<Option<Vec<TipRecord>>>,
    tips_by_id: RwLock<LruCache<i64, TipRecord>>,
}

impl TipCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            all_tips: RwLock::new(None),
            tips_by_id: RwLock::new(LruCache::new(config.tip_limit_non_zero())),
        }
    }

    pub fn get_all(&self) -> Option<Vec<TipRecord>> {
        let entry = read(&self.all_tips, "get_all").clone();
        record_lookup("tips_all", entry.is_some());
        entry
    }

    pub fn set_all(&self, tips: Vec<TipRecord>) {
        *write(&self.all_tips, "set_all") = Some(tips);
    }

    pub fn invalidate_all(&self) {
        *write(&self.all_tips, "invalidate_all") = None;
    }

    pub fn get(&self, id: i64) -> Option<TipRecord> {
        let entry = write(&self.tips_by_id, "get").get(&id).cloned();
        record_lookup("tips_by_id", entry.is_some());
        entry
    }

    pub fn set(&self, tip: TipRecord) {
        write(&self.tips_by_id, "set").put(tip.id, tip);
    }

    pub fn invalidate(&self, id: i64) {
        write(&self.tips_by_id, "invalidate").pop(&id);
    }
}

/// Cache in front of the fast draft store: one slot holding the whole
/// collection, so session filtering after a hit is always correct.
#[derive(Default)]
pub struct DraftCache {
    drafts: RwLock<Option<Vec<DraftRecord>>>,
}

impl DraftCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_all(&self) -> Option<Vec<DraftRecord>> {
        let entry = read(&self.drafts, "get_all").clone();
        record_lookup("drafts_all", entry.is_some());
        entry
    }

    pub fn set_all(&self, drafts: Vec<DraftRecord>) {
        *write(&self.drafts, "set_all") = Some(drafts);
    }

    pub fn invalidate(&self) {
        *write(&self.drafts, "invalidate") = None;
    }
}

fn read<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockReadGuard<'a, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(op, "Recovered from poisoned cache lock");
            poisoned.into_inner()
        }
    }
}

fn write<'a, T>(lock: &'a RwLock<T>, op: &'static str) -> RwLockWriteGuard<'a, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(op, "Recovered from poisoned cache lock");
            poisoned.into_inner()
        }
    }
}

fn record_lookup(cache: &'static str, hit: bool) {
    if hit {
        counter!("consiglio_cache_hit_total", "cache" => cache).increment(1);
    } else {
        counter!("consiglio_cache_miss_total", "cache" => cache).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use uuid::Uuid;

    use super::*;

    fn sample_tip(id: i64, message: &str) -> TipRecord {
        TipRecord {
            id,
            message: message.to_string(),
        }
    }

    #[test]
    fn tip_by_id_roundtrip() {
        let cache = TipCache::new(&CacheConfig::default());

        assert!(cache.get(1).is_none());

        cache.set(sample_tip(1, "Stay hydrated"));

        let cached = cache.get(1).expect("cached tip");
        assert_eq!(cached.message, "Stay hydrated");

        cache.invalidate(1);
        assert!(cache.get(1).is_none());
    }

    #[test]
    fn full_collection_roundtrip() {
        let cache = TipCache::new(&CacheConfig::default());

        assert!(cache.get_all().is_none());

        cache.set_all(vec![sample_tip(1, "a"), sample_tip(2, "b")]);
        assert_eq!(cache.get_all().expect("cached list").len(), 2);

        cache.invalidate_all();
        assert!(cache.get_all().is_none());
    }

    #[test]
    fn by_id_lru_eviction() {
        let config = CacheConfig { tip_limit: 2 };
        let cache = TipCache::new(&config);

        cache.set(sample_tip(1, "a"));
        cache.set(sample_tip(2, "b"));

        assert!(cache.get(1).is_some());
        assert!(cache.get(2).is_some());

        // Adding a third evicts the least recently used entry.
        cache.set(sample_tip(3, "c"));

        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
        assert!(cache.get(3).is_some());
    }

    #[test]
    fn draft_slot_roundtrip() {
        let cache = DraftCache::new();

        assert!(cache.get_all().is_none());

        cache.set_all(vec![DraftRecord {
            id: 1,
            message: "unsaved".into(),
            session_id: Uuid::new_v4(),
        }]);
        assert_eq!(cache.get_all().expect("cached drafts").len(), 1);

        cache.invalidate();
        assert!(cache.get_all().is_none());
    }

    #[test]
    fn recovers_from_poisoned_lock() {
        let cache = TipCache::new(&CacheConfig::default());

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = cache
                .all_tips
                .write()
                .expect("all_tips lock should be acquired");
            panic!("poison all_tips lock");
        }));

        cache.set_all(vec![sample_tip(1, "still works")]);
        assert!(cache.get_all().is_some());
    }
}
