use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// In-memory object cache keyed by (group, key).
/// Entries expire after their own time-to-live; nothing invalidates them early
/// except `delete` / `flush`.
pub struct ObjectCache<V> {
    entries: Mutex<HashMap<(String, String), (Instant, V)>>,
}

impl<V: Clone> ObjectCache<V> {
    pub fn new() -> Self {
        ObjectCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(String, String), (Instant, V)>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn get(&self, group: &str, key: &str) -> Option<V> {
        let mut map = self.lock();
        let id = (group.to_string(), key.to_string());
        let found = map
            .get(&id)
            .map(|(expires, value)| (*expires > Instant::now(), value.clone()));
        match found {
            Some((true, value)) => Some(value),
            Some((false, _)) => {
                map.remove(&id);
                None
            }
            None => None,
        }
    }

    /// Store a value only if no live entry exists. Returns true when stored.
    pub fn add(&self, group: &str, key: &str, value: V, ttl: Duration) -> bool {
        let mut map = self.lock();
        let now = Instant::now();
        let id = (group.to_string(), key.to_string());
        if let Some((expires, _)) = map.get(&id) {
            if *expires > now {
                return false;
            }
        }
        map.insert(id, (now + ttl, value));
        true
    }

    pub fn delete(&self, group: &str, key: &str) {
        self.lock().remove(&(group.to_string(), key.to_string()));
    }

    pub fn flush(&self) {
        self.lock().clear();
    }
}

impl<V: Clone> Default for ObjectCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_does_not_overwrite_live_entry() {
        let cache: ObjectCache<Vec<String>> = ObjectCache::new();
        assert!(cache.get("category", "k").is_none());
        assert!(cache.add("category", "k", vec!["a".to_string()], WEEK));
        assert!(!cache.add("category", "k", vec!["b".to_string()], WEEK));
        assert_eq!(cache.get("category", "k"), Some(vec!["a".to_string()]));
        // Groups are separate namespaces
        assert!(cache.get("other", "k").is_none());
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache: ObjectCache<u32> = ObjectCache::new();
        cache.add("g", "k", 1, Duration::from_millis(0));
        assert!(cache.get("g", "k").is_none());
        assert!(cache.add("g", "k", 2, WEEK));
        assert_eq!(cache.get("g", "k"), Some(2));
    }

    #[test]
    fn delete_and_flush() {
        let cache: ObjectCache<u32> = ObjectCache::new();
        cache.add("g", "a", 1, WEEK);
        cache.add("g", "b", 2, WEEK);
        cache.delete("g", "a");
        assert!(cache.get("g", "a").is_none());
        cache.flush();
        assert!(cache.get("g", "b").is_none());
    }
}
