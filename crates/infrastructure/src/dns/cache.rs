use dashmap::DashMap;
use ferrous_socks_application::ports::DnsCachePort;
use std::net::Ipv4Addr;
use tracing::debug;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedHost {
    pub ipv4: Ipv4Addr,
    pub inserted_at_secs: u64,
}

impl CachedHost {
    #[inline]
    pub fn is_fresh_at(&self, now_secs: u64, ttl_secs: u64) -> bool {
        now_secs.saturating_sub(self.inserted_at_secs) < ttl_secs
    }
}

/// Process-wide hostname → IPv4 cache with a fixed TTL.
///
/// Expired entries are dropped lazily by the lookup that finds them; there is
/// no background sweep.
pub struct InMemoryDnsCache {
    entries: DashMap<String, CachedHost>,
    ttl_secs: u64,
}

impl InMemoryDnsCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Raw entry, expired or not.
    pub fn entry(&self, hostname: &str) -> Option<CachedHost> {
        self.entries.get(hostname).map(|e| *e.value())
    }

    pub fn snapshot(&self) -> Vec<(String, CachedHost)> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for InMemoryDnsCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL_SECS)
    }
}

impl DnsCachePort for InMemoryDnsCache {
    fn lookup(&self, hostname: &str, now_secs: u64) -> Option<Ipv4Addr> {
        let cached = self.entry(hostname)?;

        if cached.is_fresh_at(now_secs, self.ttl_secs) {
            debug!(host = %hostname, ip = %cached.ipv4, "DNS cache hit");
            return Some(cached.ipv4);
        }

        let ttl = self.ttl_secs;
        self.entries
            .remove_if(hostname, |_, e| !e.is_fresh_at(now_secs, ttl));
        debug!(
            host = %hostname,
            age_secs = now_secs.saturating_sub(cached.inserted_at_secs),
            "Evicted expired DNS cache entry"
        );
        None
    }

    fn insert(&self, hostname: &str, ipv4: Ipv4Addr, now_secs: u64) {
        self.entries.insert(
            hostname.to_string(),
            CachedHost {
                ipv4,
                inserted_at_secs: now_secs,
            },
        );
        debug!(host = %hostname, ip = %ipv4, ttl = self.ttl_secs, "Inserted host into DNS cache");
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: u64 = 1_700_000_000;

    #[test]
    fn test_fresh_until_ttl() {
        let cache = InMemoryDnsCache::default();
        let ip = Ipv4Addr::new(203, 0, 113, 7);
        cache.insert("proxy.example.com", ip, T);

        assert_eq!(cache.lookup("proxy.example.com", T), Some(ip));
        assert_eq!(cache.lookup("proxy.example.com", T + 299), Some(ip));
        assert_eq!(cache.lookup("proxy.example.com", T + 300), None);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = InMemoryDnsCache::default();
        cache.insert("proxy.example.com", Ipv4Addr::new(203, 0, 113, 7), T);

        assert_eq!(cache.lookup("proxy.example.com", T + 301), None);
        assert!(cache.entry("proxy.example.com").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = InMemoryDnsCache::default();
        cache.insert("h", Ipv4Addr::new(10, 0, 0, 1), T);
        cache.insert("h", Ipv4Addr::new(10, 0, 0, 2), T + 200);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("h", T + 450), Some(Ipv4Addr::new(10, 0, 0, 2)));
    }

    #[test]
    fn test_miss_on_unknown_host() {
        let cache = InMemoryDnsCache::new(60);
        assert_eq!(cache.lookup("nowhere", T), None);
    }
}
