//! In-memory result cache
//!
//! Maps a canonical [`Vrm`] to the snapshot of its last acquisition.
//!
//! ## Expiry
//!
//! An entry lives for `ttl` from the moment it was stored. Reads never
//! extend that window; an expired entry is dropped the next time it is
//! read or when room is needed.
//!
//! ## Eviction
//!
//! When a new identifier arrives and the cache is full, expired entries are
//! purged first. If the cache is still full, the least recently accessed
//! entry goes, with ties broken by older creation and then identifier order.

use crate::domain::{LookupSnapshot, Vrm};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct CacheEntry {
    snapshot: Arc<LookupSnapshot>,
    inserted: Instant,
    last_accessed: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted) >= ttl
    }

    fn touch(&mut self, now: Instant) {
        self.last_accessed = now;
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<Vrm, CacheEntry>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Hit/miss counters since startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HitInfo {
    pub hits: u64,
    pub misses: u64,
    /// Entries removed to make room, expired or not
    pub evictions: u64,
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub ttl_seconds: u64,
    pub hit_info: HitInfo,
}

/// TTL and size bounded store of lookup snapshots
///
/// Shared between request tasks behind an `Arc`; every method takes `&self`.
pub struct ResultCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    max_entries: usize,
}

impl ResultCache {
    /// Create an empty cache
    ///
    /// A `max_entries` of zero is treated as one.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Fresh snapshot for `vrm`, if any
    pub fn get(&self, vrm: &Vrm) -> Option<Arc<LookupSnapshot>> {
        self.get_at(vrm, Instant::now())
    }

    /// Store a snapshot, replacing any previous entry for the same identifier
    pub fn put(&self, snapshot: LookupSnapshot) -> Arc<LookupSnapshot> {
        self.put_at(snapshot, Instant::now())
    }

    /// Remove the entry for `vrm`, returning whether one existed
    pub fn invalidate(&self, vrm: &Vrm) -> bool {
        let removed = self.lock().entries.remove(vrm).is_some();
        if removed {
            tracing::debug!(vrm = %vrm, "Cache entry invalidated");
        }
        removed
    }

    /// Remove every entry, returning how many were dropped
    ///
    /// Hit counters are kept.
    pub fn clear(&self) -> usize {
        let mut state = self.lock();
        let count = state.entries.len();
        state.entries.clear();
        count
    }

    /// Number of stored entries, including any not yet purged after expiry
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            size: state.entries.len(),
            max_size: self.max_entries,
            ttl_seconds: self.ttl.as_secs(),
            hit_info: HitInfo {
                hits: state.hits,
                misses: state.misses,
                evictions: state.evictions,
            },
        }
    }

    fn get_at(&self, vrm: &Vrm, now: Instant) -> Option<Arc<LookupSnapshot>> {
        let mut state = self.lock();

        let expired = match state.entries.get_mut(vrm) {
            Some(entry) if !entry.is_expired(now, self.ttl) => {
                entry.touch(now);
                let snapshot = Arc::clone(&entry.snapshot);
                state.hits += 1;
                return Some(snapshot);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            state.entries.remove(vrm);
            tracing::debug!(vrm = %vrm, "Cache entry expired");
        }
        state.misses += 1;
        None
    }

    fn put_at(&self, snapshot: LookupSnapshot, now: Instant) -> Arc<LookupSnapshot> {
        let mut state = self.lock();
        let vrm = snapshot.vrm.clone();

        if !state.entries.contains_key(&vrm) && state.entries.len() >= self.max_entries {
            self.make_room(&mut state, now);
        }

        let snapshot = Arc::new(snapshot);
        state.entries.insert(
            vrm,
            CacheEntry {
                snapshot: Arc::clone(&snapshot),
                inserted: now,
                last_accessed: now,
            },
        );
        snapshot
    }

    fn make_room(&self, state: &mut CacheState, now: Instant) {
        let before = state.entries.len();
        let ttl = self.ttl;
        state.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        let purged = before - state.entries.len();
        state.evictions += purged as u64;

        if state.entries.len() < self.max_entries {
            return;
        }

        let victim = state
            .entries
            .iter()
            .min_by(|(a_vrm, a), (b_vrm, b)| {
                a.last_accessed
                    .cmp(&b.last_accessed)
                    .then(a.inserted.cmp(&b.inserted))
                    .then(a_vrm.cmp(b_vrm))
            })
            .map(|(vrm, _)| vrm.clone());

        if let Some(vrm) = victim {
            state.entries.remove(&vrm);
            state.evictions += 1;
            tracing::debug!(vrm = %vrm, "Evicted least recently used cache entry");
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Entries stay consistent even if a holder panicked mid-read
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
