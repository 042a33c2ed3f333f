//! TTL cache component
//!
//! An explicit get/put-with-TTL cache owned by the client and injected with
//! a clock, replacing ambient module-level caches. Entries past their expiry
//! are dropped on read.

use crate::clock::Clock;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

struct CacheEntry<V> {
    value: V,
    expires_at: chrono::DateTime<chrono::Utc>,
}

/// In-process cache with per-entry time-to-live
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), clock }
    }

    /// Get a live entry, evicting it if expired
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert a value that expires `ttl` from now
    pub fn put(&self, key: K, value: V, ttl: Duration) {
        let expires_at = self.clock.now()
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());
        self.entries.lock().insert(key, CacheEntry { value, expires_at });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Utc;

    #[test]
    fn entry_expires_after_ttl() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache: TtlCache<u32, String> = TtlCache::new(clock.clone());

        cache.put(1, "payload".to_string(), Duration::from_secs(10));
        assert_eq!(cache.get(&1), Some("payload".to_string()));

        clock.advance(chrono::Duration::seconds(9));
        assert_eq!(cache.get(&1), Some("payload".to_string()));

        clock.advance(chrono::Duration::seconds(2));
        assert_eq!(cache.get(&1), None);
        // Expired entry was evicted on read.
        assert!(cache.is_empty());
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache: TtlCache<&'static str, u32> = TtlCache::new(clock.clone());

        cache.put("gw", 1, Duration::from_secs(5));
        cache.put("gw", 2, Duration::from_secs(5));
        assert_eq!(cache.get(&"gw"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_are_independent() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache: TtlCache<u32, u32> = TtlCache::new(clock.clone());

        cache.put(30, 100, Duration::from_secs(1));
        cache.put(31, 200, Duration::from_secs(60));

        clock.advance(chrono::Duration::seconds(2));
        assert_eq!(cache.get(&30), None);
        assert_eq!(cache.get(&31), Some(200));
    }
}
