//! Injected rate-limit store. The trait keeps handlers agnostic about where
//! counts live, so tests and single-node deployments use the in-memory store
//! while a distributed deployment can plug in a shared one.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait RateStore: Send + Sync {
    /// Current count for a key, 0 if absent or expired.
    fn get(&self, key: &str) -> u32;

    /// Increment the key's count, starting a TTL window on first use.
    /// Returns the count after incrementing.
    fn increment_with_ttl(&self, key: &str, ttl: Duration) -> u32;
}

// ---------------------------------------------------------------------------
// MemoryRateStore
// ---------------------------------------------------------------------------

/// Mutex-guarded map with per-key expiry. Expired entries are dropped lazily
/// on access.
#[derive(Default)]
pub struct MemoryRateStore {
    entries: Mutex<HashMap<String, (u32, Instant)>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateStore for MemoryRateStore {
    fn get(&self, key: &str) -> u32 {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(&(count, expires)) if expires > Instant::now() => count,
            Some(_) => {
                entries.remove(key);
                0
            }
            None => 0,
        }
    }

    fn increment_with_ttl(&self, key: &str, ttl: Duration) -> u32 {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();
        let entry = entries.entry(key.to_string()).or_insert((0, now + ttl));
        if entry.1 <= now {
            *entry = (0, now + ttl);
        }
        entry.0 += 1;
        entry.0
    }
}

/// Requests allowed per profile per window on mutation endpoints.
pub const MUTATION_LIMIT: u32 = 60;
pub const MUTATION_WINDOW: Duration = Duration::from_secs(60);
