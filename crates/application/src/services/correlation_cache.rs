use rustc_hash::{FxBuildHasher, FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// 64-bit key identifying a transaction by its client endpoint and DNS id.
///
/// Distinct transactions may collide; the cache does not try to tell them
/// apart.
pub fn correlation_key(query_ip: IpAddr, query_port: u16, transaction_id: u16) -> u64 {
    let mut hasher = FxHasher::default();
    query_ip.hash(&mut hasher);
    query_port.hash(&mut hasher);
    transaction_id.hash(&mut hasher);
    hasher.finish()
}

struct PendingQuery {
    timestamp: f64,
    inserted_at: Instant,
}

/// Query timestamps waiting for their reply.
///
/// Owned by a single decoder task, so no locking. Entries older than the TTL
/// are dropped on lookup and by a sweep that `set` runs at most once per TTL
/// period.
pub struct CorrelationCache {
    entries: FxHashMap<u64, PendingQuery>,
    ttl: Duration,
    last_sweep: Instant,
}

impl CorrelationCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_start(ttl, Instant::now())
    }

    pub fn with_start(ttl: Duration, now: Instant) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(1024, FxBuildHasher),
            ttl,
            last_sweep: now,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn set(&mut self, key: u64, timestamp: f64) {
        self.set_at(key, timestamp, Instant::now());
    }

    /// A second `set` for the same key replaces the earlier entry.
    pub fn set_at(&mut self, key: u64, timestamp: f64, now: Instant) {
        if now.saturating_duration_since(self.last_sweep) >= self.ttl {
            self.sweep(now);
        }
        self.entries.insert(
            key,
            PendingQuery {
                timestamp,
                inserted_at: now,
            },
        );
    }

    pub fn get_and_remove(&mut self, key: u64) -> Option<f64> {
        self.get_and_remove_at(key, Instant::now())
    }

    pub fn get_and_remove_at(&mut self, key: u64, now: Instant) -> Option<f64> {
        let entry = self.entries.remove(&key)?;
        if self.is_live(&entry, now) {
            Some(entry.timestamp)
        } else {
            None
        }
    }

    /// Drops every expired entry; returns how many were removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
        self.last_sweep = now;
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_live(&self, entry: &PendingQuery, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }
}
