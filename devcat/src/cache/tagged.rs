use dashmap::DashMap;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A cached value plus the generation of each of its tags at the time it was computed.
#[derive(Clone)]
struct Entry<V> {
    value: V,
    tags: Arc<[(String, u64)]>,
}

/// Key/value cache with tag-based invalidation.
///
/// Each tag has a generation counter. An entry records the generations of its tags when its
/// computation starts; it is served only while all of them are unchanged. `invalidate` bumps
/// the counters, so every entry stored under those tags becomes a miss without enumerating
/// keys. Entries also expire after the configured time-to-live.
///
/// Concurrent misses on one key both compute and the last insert wins.
#[derive(Clone)]
pub struct TagCache<V: Clone + Send + Sync + 'static> {
    name: &'static str,
    entries: Cache<String, Entry<V>>,
    generations: Arc<DashMap<String, u64>>,
}

impl<V: Clone + Send + Sync + 'static> TagCache<V> {
    pub fn new(name: &'static str, ttl: Duration, max_capacity: u64) -> Self {
        Self {
            name,
            entries: Cache::builder().max_capacity(max_capacity).time_to_live(ttl).build(),
            generations: Arc::new(DashMap::new()),
        }
    }

    fn generation(&self, tag: &str) -> u64 {
        self.generations.get(tag).map(|g| *g).unwrap_or(0)
    }

    fn is_current(&self, entry: &Entry<V>) -> bool {
        entry.tags.iter().all(|(tag, generation)| self.generation(tag) == *generation)
    }

    /// Return the cached value for `key`, or run `compute`, store its result under `tags`,
    /// and return it. Errors from `compute` are returned as-is and nothing is stored.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, tags: &[String], compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(entry) = self.entries.get(key).await {
            if self.is_current(&entry) {
                debug!(cache = self.name, key, "Cache hit");
                return Ok(entry.value);
            }
            debug!(cache = self.name, key, "Cached entry invalidated by tag");
        } else {
            debug!(cache = self.name, key, "Cache miss");
        }

        // Captured before computing so an invalidation that lands mid-computation wins
        let snapshot: Arc<[(String, u64)]> = tags.iter().map(|tag| (tag.clone(), self.generation(tag))).collect();

        let value = compute().await?;
        self.entries
            .insert(
                key.to_string(),
                Entry {
                    value: value.clone(),
                    tags: snapshot,
                },
            )
            .await;
        Ok(value)
    }

    /// Make every entry stored under any of `tags` a miss. Takes effect before returning.
    pub fn invalidate(&self, tags: &[String]) {
        for tag in tags {
            *self.generations.entry(tag.clone()).or_insert(0) += 1;
            debug!(cache = self.name, tag = tag.as_str(), "Invalidated cache tag");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> TagCache<Vec<u32>> {
        TagCache::new("test", Duration::from_secs(60), 100)
    }

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|t| t.to_string()).collect()
    }

    async fn read(cache: &TagCache<Vec<u32>>, key: &str, tag_names: &[&str], calls: &AtomicUsize, value: Vec<u32>) -> Vec<u32> {
        cache
            .get_or_compute(key, &tags(tag_names), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(value)
            })
            .await
            .unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn hit_skips_computation() {
        let cache = cache();
        let calls = &AtomicUsize::new(0);

        let first = read(&cache, "k", &["t"], calls, vec![1, 2]).await;
        let second = read(&cache, "k", &["t"], calls, vec![9]).await;

        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test_log::test(tokio::test)]
    async fn invalidation_forces_recomputation() {
        let cache = cache();
        let calls = &AtomicUsize::new(0);

        read(&cache, "k", &["t"], calls, vec![1]).await;
        cache.invalidate(&tags(&["t"]));
        let after = read(&cache, "k", &["t"], calls, vec![1, 2]).await;

        assert_eq!(after, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test_log::test(tokio::test)]
    async fn invalidation_only_touches_matching_tags() {
        let cache = cache();
        let calls = &AtomicUsize::new(0);

        read(&cache, "a", &["x"], calls, vec![1]).await;
        read(&cache, "b", &["y", "shared"], calls, vec![2]).await;
        cache.invalidate(&tags(&["x", "unused"]));
        read(&cache, "a", &["x"], calls, vec![1]).await;
        read(&cache, "b", &["y", "shared"], calls, vec![2]).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        cache.invalidate(&tags(&["shared"]));
        read(&cache, "b", &["y", "shared"], calls, vec![2]).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test_log::test(tokio::test)]
    async fn errors_are_not_cached() {
        let cache = cache();
        let calls = &AtomicUsize::new(0);

        let failed = cache
            .get_or_compute("k", &tags(&["t"]), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<Vec<u32>, _>("store unavailable".to_string())
            })
            .await;
        assert_eq!(failed.unwrap_err(), "store unavailable");

        let value = read(&cache, "k", &["t"], calls, vec![7]).await;
        assert_eq!(value, vec![7]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test_log::test(tokio::test)]
    async fn invalidation_during_computation_leaves_entry_stale() {
        let cache = &cache();
        let calls = &AtomicUsize::new(0);

        cache
            .get_or_compute("k", &tags(&["t"]), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                cache.invalidate(&tags(&["t"]));
                Ok::<_, String>(vec![1])
            })
            .await
            .unwrap();

        read(cache, "k", &["t"], calls, vec![2]).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test_log::test(tokio::test)]
    async fn entries_expire_after_ttl() {
        let cache: TagCache<Vec<u32>> = TagCache::new("ttl", Duration::from_millis(50), 100);
        let calls = &AtomicUsize::new(0);

        read(&cache, "k", &["t"], calls, vec![1]).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        read(&cache, "k", &["t"], calls, vec![1]).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
