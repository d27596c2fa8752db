use std::net::Ipv4Addr;

/// Process-wide hostname → IPv4 cache consulted before querying DNS.
pub trait DnsCachePort: Send + Sync {
    /// Returns the cached address while it is fresh; an expired entry is
    /// evicted and reported as a miss.
    fn lookup(&self, hostname: &str, now_secs: u64) -> Option<Ipv4Addr>;

    /// Stores or overwrites the entry for `hostname`.
    fn insert(&self, hostname: &str, ipv4: Ipv4Addr, now_secs: u64);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
