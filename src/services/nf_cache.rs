//! Expiring cache of NF profiles for a single NF category.
//!
//! Entries are indexed twice: by NF instance id for lookup and refresh, and by
//! expiry in an [`ExpiryQueue`] for eviction. Both indexes are mutated only
//! under the cache's write lock and always hold the same set of entries.
//!
//! A background sweeper evicts expired entries on a fixed interval. Each sweep
//! pops from the queue root until it reaches an unexpired entry, so its cost is
//! bounded by the number of expired entries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::domain::models::{NfProfile, NfType, SearchFilterOptions};
use crate::services::expiry_queue::{CacheEntry, EntryId, ExpiryQueue};
use crate::services::match_filters::MatchEngine;

/// Shortest sweep interval accepted; `tokio::time::interval` rejects zero.
const MIN_EVICTION_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Default)]
pub(crate) struct CacheState {
    entries: HashMap<String, EntryId>,
    queue: ExpiryQueue,
}

impl CacheState {
    fn insert_or_refresh(&mut self, profile: NfProfile, ttl: Duration) {
        if let Some(id) = self.entries.get(&profile.nf_instance_id).copied() {
            self.queue.update(id, profile, ttl);
        } else {
            let key = profile.nf_instance_id.clone();
            let id = self.queue.push(CacheEntry::new(profile, ttl));
            self.entries.insert(key, id);
        }
    }

    /// Evict entries expired as of `now`, returning how many were removed.
    fn cleanup_expired_items(&mut self, nf_type: NfType, now: Instant) -> usize {
        let mut evicted = 0;
        while self.queue.peek().is_some_and(|entry| entry.is_expired_at(now)) {
            let Some(entry) = self.queue.pop_min() else {
                break;
            };
            trace!(%nf_type, nf_instance_id = %entry.profile().nf_instance_id, "evicting expired profile");
            self.entries.remove(&entry.profile().nf_instance_id);
            evicted += 1;
        }
        evicted
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.queue.clear();
    }
}

/// Cache of profiles for one NF category.
pub struct NfCache {
    nf_type: NfType,
    state: Arc<RwLock<CacheState>>,
    matcher: MatchEngine,
    cancel: CancellationToken,
    torn_down: AtomicBool,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl NfCache {
    /// Create a cache and start its sweeper on the current tokio runtime.
    ///
    /// Outside a runtime the cache still works, but expired entries are only
    /// hidden from lookups and never evicted.
    pub fn new(nf_type: NfType, eviction_interval: Duration, matcher: MatchEngine) -> Self {
        let state = Arc::new(RwLock::new(CacheState::default()));
        let cancel = CancellationToken::new();

        let sweeper = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(run_sweeper(
                nf_type,
                Arc::clone(&state),
                eviction_interval.max(MIN_EVICTION_INTERVAL),
                cancel.clone(),
            ))),
            Err(_) => {
                warn!(%nf_type, "no tokio runtime, expiry sweeper not started");
                None
            }
        };

        debug!(%nf_type, ?eviction_interval, policy = ?matcher.policy(), "created nf cache");

        Self {
            nf_type,
            state,
            matcher,
            cancel,
            torn_down: AtomicBool::new(false),
            sweeper: Mutex::new(sweeper),
        }
    }

    /// Category this cache holds.
    pub const fn nf_type(&self) -> NfType {
        self.nf_type
    }

    /// Insert a copy of `profile`, or refresh the stored entry with the same
    /// instance id. Expiry becomes now + `ttl` either way.
    ///
    /// Profiles that cannot be keyed, belong to another category, or arrive
    /// after teardown are logged and dropped.
    pub async fn set(&self, profile: &NfProfile, ttl: Duration) {
        if profile.nf_instance_id.is_empty() {
            warn!(nf_type = %self.nf_type, "dropping profile without nf instance id");
            return;
        }
        if profile.nf_type != self.nf_type {
            warn!(
                nf_type = %self.nf_type,
                profile_type = %profile.nf_type,
                nf_instance_id = %profile.nf_instance_id,
                "dropping profile of another category"
            );
            return;
        }

        let copy = profile.clone();
        let mut state = self.state.write().await;
        // Purge sets the flag before it takes this lock to clear.
        if self.is_torn_down() {
            warn!(nf_type = %self.nf_type, nf_instance_id = %profile.nf_instance_id, "dropping write to purged cache");
            return;
        }
        state.insert_or_refresh(copy, ttl);
        drop(state);
        trace!(nf_type = %self.nf_type, nf_instance_id = %profile.nf_instance_id, ?ttl, "cached profile");
    }

    /// Copies of every unexpired profile matching `opts`, or of every
    /// unexpired profile when `opts` is `None`.
    pub async fn get(&self, opts: Option<&SearchFilterOptions>) -> Vec<NfProfile> {
        let state = self.state.read().await;
        let now = Instant::now();

        state
            .queue
            .iter()
            .filter(|entry| !entry.is_expired_at(now))
            .filter(|entry| opts.is_none_or(|opts| self.matcher.matches_entry(entry, opts)))
            .map(|entry| entry.profile().clone())
            .collect()
    }

    /// Number of stored entries, expired or not.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    /// True when nothing is stored, expired or not.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run one eviction pass immediately.
    pub async fn cleanup_expired_items(&self) -> usize {
        let mut state = self.state.write().await;
        state.cleanup_expired_items(self.nf_type, Instant::now())
    }

    /// Whether `purge` has run or the cache is being dropped.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Whether the background sweeper task is still alive.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Tear the cache down: stop the sweeper and release every entry.
    ///
    /// Only the first call does anything and returns `true`.
    pub async fn purge(&self) -> bool {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            debug!(nf_type = %self.nf_type, "cache already purged");
            return false;
        }

        self.cancel.cancel();
        let sweeper = self.sweeper.lock().ok().and_then(|mut guard| guard.take());
        if let Some(handle) = sweeper {
            if let Err(err) = handle.await {
                warn!(nf_type = %self.nf_type, error = %err, "expiry sweeper ended abnormally");
            }
        }

        let released = {
            let mut state = self.state.write().await;
            let released = state.entries.len();
            state.clear();
            released
        };

        info!(nf_type = %self.nf_type, released, "purged nf cache");
        true
    }
}

#[cfg(test)]
impl NfCache {
    pub(crate) fn state(&self) -> &RwLock<CacheState> {
        &self.state
    }
}

impl Drop for NfCache {
    fn drop(&mut self) {
        if !self.torn_down.swap(true, Ordering::AcqRel) {
            self.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for NfCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NfCache")
            .field("nf_type", &self.nf_type)
            .field("policy", &self.matcher.policy())
            .field("torn_down", &self.is_torn_down())
            .finish_non_exhaustive()
    }
}

/// Sweep loop. Exits only through `cancel`.
async fn run_sweeper(
    nf_type: NfType,
    state: Arc<RwLock<CacheState>>,
    every: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            _ = ticker.tick() => {
                let mut state = state.write().await;
                if state.queue.is_empty() {
                    continue;
                }
                let evicted = state.cleanup_expired_items(nf_type, Instant::now());
                if evicted > 0 {
                    debug!(%nf_type, evicted, remaining = state.queue.len(), "expiry sweep");
                }
            }
        }
    }

    debug!(%nf_type, "expiry sweeper stopped");
}
