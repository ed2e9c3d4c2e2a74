//! TTL result caches for the lookup client.
//!
//! Each [`crate::SteamLookup`] owns one [`LookupCache`] holding three
//! independent namespaces: reputation and profile records keyed by
//! SteamID64, and vanity resolutions keyed by the raw search string. Entries
//! expire `ttl` after their last insert; an overwrite starts a fresh window.
//! Only successful records are inserted.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::profile::ProfileRecord;
use crate::reputation::ReputationRecord;
use crate::steamid::SteamId64;

/// Lookup class a cached value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Reputation,
    Profile,
    Vanity,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reputation => "reputation",
            Self::Profile => "profile",
            Self::Vanity => "vanity",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One namespace: a bounded map whose entries expire after a fixed TTL.
#[derive(Clone)]
pub struct TtlCache<V: Clone + Send + Sync + 'static> {
    namespace: Namespace,
    inner: Arc<Cache<String, V>>,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Create a namespace with the given TTL and max entries.
    pub fn new(namespace: Namespace, ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self {
            namespace,
            inner: Arc::new(cache),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Get a live entry. Expired entries are never returned.
    pub fn get(&self, key: &str) -> Option<V> {
        let hit = self.inner.get(key);
        if hit.is_some() {
            crate::metrics::record_cache_hit(self.namespace);
            tracing::debug!(namespace = %self.namespace, key, "cache hit");
        } else {
            crate::metrics::record_cache_miss(self.namespace);
            tracing::debug!(namespace = %self.namespace, key, "cache miss");
        }
        hit
    }

    /// Insert or overwrite an entry, resetting its expiry.
    pub fn insert(&self, key: String, value: V) {
        self.inner.insert(key, value);
    }

    pub fn invalidate(&self, key: &str) {
        self.inner.invalidate(key);
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate live entry count.
    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The three namespaces of one client, or nothing when caching is disabled.
#[derive(Clone)]
pub struct LookupCache {
    namespaces: Option<Namespaces>,
}

#[derive(Clone)]
struct Namespaces {
    reputation: TtlCache<ReputationRecord>,
    profile: TtlCache<ProfileRecord>,
    vanity: TtlCache<SteamId64>,
}

impl LookupCache {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        Self {
            namespaces: Some(Namespaces {
                reputation: TtlCache::new(Namespace::Reputation, ttl, max_entries),
                profile: TtlCache::new(Namespace::Profile, ttl, max_entries),
                vanity: TtlCache::new(Namespace::Vanity, ttl, max_entries),
            }),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self { namespaces: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.namespaces.is_some()
    }

    pub fn reputation(&self) -> Option<&TtlCache<ReputationRecord>> {
        self.namespaces.as_ref().map(|n| &n.reputation)
    }

    pub fn profile(&self) -> Option<&TtlCache<ProfileRecord>> {
        self.namespaces.as_ref().map(|n| &n.profile)
    }

    pub fn vanity(&self) -> Option<&TtlCache<SteamId64>> {
        self.namespaces.as_ref().map(|n| &n.vanity)
    }

    /// Drop every entry in every namespace.
    pub fn clear(&self) {
        if let Some(n) = &self.namespaces {
            n.reputation.clear();
            n.profile.clear();
            n.vanity.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let cache: TtlCache<String> = TtlCache::new(Namespace::Vanity, Duration::from_secs(60), 10);
        assert!(cache.get("redwine").is_none());
        cache.insert("redwine".into(), "76561197960434622".into());
        assert_eq!(cache.get("redwine").as_deref(), Some("76561197960434622"));
    }

    #[test]
    fn test_entry_expires() {
        let cache: TtlCache<u32> = TtlCache::new(Namespace::Profile, Duration::from_millis(50), 10);
        cache.insert("k".into(), 1);
        assert_eq!(cache.get("k"), Some(1));
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_overwrite_resets_expiry() {
        let cache: TtlCache<u32> = TtlCache::new(Namespace::Profile, Duration::from_millis(200), 10);
        cache.insert("k".into(), 1);
        std::thread::sleep(Duration::from_millis(120));
        cache.insert("k".into(), 2);
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let cache = LookupCache::new(Duration::from_secs(60), 10);
        let id = SteamId64::parse("76561197960434622").unwrap();
        cache.vanity().unwrap().insert("76561197960434622".into(), id);
        assert!(cache.reputation().unwrap().get("76561197960434622").is_none());
        assert!(cache.profile().unwrap().get("76561197960434622").is_none());
        assert_eq!(cache.vanity().unwrap().get("76561197960434622"), Some(id));
    }

    #[test]
    fn test_clear_empties_all() {
        let cache = LookupCache::new(Duration::from_secs(60), 10);
        let id = SteamId64::parse("76561197960434622").unwrap();
        cache.vanity().unwrap().insert("a".into(), id);
        assert_eq!(cache.vanity().unwrap().len(), 1);
        cache.clear();
        assert!(cache.vanity().unwrap().get("a").is_none());
        assert!(cache.vanity().unwrap().is_empty());
    }

    #[test]
    fn test_invalidate_drops_one_key() {
        let cache: TtlCache<u32> = TtlCache::new(Namespace::Reputation, Duration::from_secs(60), 10);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        cache.invalidate("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_disabled_has_no_namespaces() {
        let cache = LookupCache::disabled();
        assert!(!cache.is_enabled());
        assert!(cache.reputation().is_none());
        cache.clear();
    }
}
