//! Time-bounded snapshot cache for external store reads.
//!
//! Read-mostly: lookups take a shared lock, a refresh swaps the whole
//! `Arc`-wrapped snapshot in one write so readers never see a partial
//! update. An explicit invalidation forces the next read to re-fetch.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

struct Entry<T> {
    value: Arc<T>,
    fetched_at: Instant,
}

pub struct TtlCache<T> {
    entries: RwLock<HashMap<String, Entry<T>>>,
    ttl: Duration,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return the cached snapshot for `scope` if it is still fresh.
    pub fn get(&self, scope: &str) -> Option<Arc<T>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(scope)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(Arc::clone(&entry.value))
        } else {
            None
        }
    }

    /// Fetch-through read: returns the fresh cached snapshot or runs
    /// `fetch` and atomically replaces the stored one.
    pub fn get_or_insert_with<E>(
        &self,
        scope: &str,
        fetch: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if let Some(value) = self.get(scope) {
            log::debug!("cache hit for scope '{scope}'");
            return Ok(value);
        }

        log::debug!("cache miss for scope '{scope}', fetching");
        let value = Arc::new(fetch()?);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                scope.to_string(),
                Entry {
                    value: Arc::clone(&value),
                    fetched_at: Instant::now(),
                },
            );
        }
        Ok(value)
    }

    /// Drop one scope's snapshot, or every snapshot when `scope` is `None`.
    /// The next read for the affected scope(s) bypasses the cache.
    pub fn invalidate(&self, scope: Option<&str>) {
        if let Ok(mut entries) = self.entries.write() {
            match scope {
                Some(scope) => {
                    entries.remove(scope);
                    log::debug!("invalidated cache for scope '{scope}'");
                }
                None => {
                    entries.clear();
                    log::debug!("invalidated all cache scopes");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted_fetch(counter: &AtomicUsize, value: u32) -> impl FnOnce() -> Result<u32, Infallible> + '_ {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }
    }

    #[test]
    fn test_second_read_hits_cache() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let fetches = AtomicUsize::new(0);

        let a = cache.get_or_insert_with("s", counted_fetch(&fetches, 1)).unwrap();
        let b = cache.get_or_insert_with("s", counted_fetch(&fetches, 2)).unwrap();
        assert_eq!(*a, 1);
        assert_eq!(*b, 1);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_scopes_are_independent() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let fetches = AtomicUsize::new(0);

        cache.get_or_insert_with("a", counted_fetch(&fetches, 1)).unwrap();
        cache.get_or_insert_with("b", counted_fetch(&fetches, 2)).unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(*cache.get("b").unwrap(), 2);
    }

    #[test]
    fn test_expired_entry_refetches() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(10));
        let fetches = AtomicUsize::new(0);

        cache.get_or_insert_with("s", counted_fetch(&fetches, 1)).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        let fresh = cache.get_or_insert_with("s", counted_fetch(&fetches, 2)).unwrap();
        assert_eq!(*fresh, 2);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidate_single_scope() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let fetches = AtomicUsize::new(0);

        cache.get_or_insert_with("a", counted_fetch(&fetches, 1)).unwrap();
        cache.get_or_insert_with("b", counted_fetch(&fetches, 2)).unwrap();
        cache.invalidate(Some("a"));

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        cache.get_or_insert_with("a", counted_fetch(&fetches, 3)).unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_invalidate_all() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let fetches = AtomicUsize::new(0);

        cache.get_or_insert_with("a", counted_fetch(&fetches, 1)).unwrap();
        cache.get_or_insert_with("b", counted_fetch(&fetches, 2)).unwrap();
        cache.invalidate(None);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_concurrent_readers() {
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new(Duration::from_secs(60)));
        cache
            .get_or_insert_with("s", || Ok::<_, Infallible>(7))
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(*cache.get("s").unwrap(), 7);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
