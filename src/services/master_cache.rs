//! Routes profiles to per-category caches.
//!
//! The routing table lock is only held long enough to find or create the
//! target [`NfCache`]; it is released before that cache's own lock is taken,
//! so writers to different categories never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::models::{CacheConfig, MatchPolicy, NfProfile, NfType, SearchFilterOptions};
use crate::services::match_filters::MatchEngine;
use crate::services::nf_cache::NfCache;

/// Category-partitioned profile cache.
#[derive(Debug)]
pub struct MasterCache {
    caches: RwLock<HashMap<NfType, Arc<NfCache>>>,
    eviction_interval: Duration,
    matcher: MatchEngine,
}

impl MasterCache {
    /// Empty cache. Category caches created later sweep every `eviction_interval`
    /// and filter under `policy`.
    pub fn new(eviction_interval: Duration, policy: MatchPolicy) -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            eviction_interval,
            matcher: MatchEngine::new(policy),
        }
    }

    /// Empty cache configured from `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.eviction_interval(), config.match_policy)
    }

    /// Sweep interval handed to each category cache.
    pub const fn eviction_interval(&self) -> Duration {
        self.eviction_interval
    }

    /// Policy used for filtered lookups.
    pub const fn match_policy(&self) -> MatchPolicy {
        self.matcher.policy()
    }

    /// Cached profiles of `nf_type` matching `opts`.
    ///
    /// A category that was never written to yields an empty result.
    pub async fn get(&self, nf_type: NfType, opts: Option<&SearchFilterOptions>) -> Vec<NfProfile> {
        let cache = self.caches.read().await.get(&nf_type).cloned();
        match cache {
            Some(cache) => cache.get(opts).await,
            None => Vec::new(),
        }
    }

    /// Store `profile` under its own category, creating that category's cache
    /// on first use.
    pub async fn set(&self, profile: &NfProfile, ttl: Duration) {
        let cache = self.cache_for(profile.nf_type).await;
        cache.set(profile, ttl).await;
    }

    async fn cache_for(&self, nf_type: NfType) -> Arc<NfCache> {
        if let Some(cache) = self.caches.read().await.get(&nf_type) {
            return Arc::clone(cache);
        }

        let mut caches = self.caches.write().await;
        let cache = caches.entry(nf_type).or_insert_with(|| {
            debug!(%nf_type, "creating category cache");
            Arc::new(NfCache::new(nf_type, self.eviction_interval, self.matcher))
        });
        Arc::clone(cache)
    }

    /// Categories that currently have a cache.
    pub async fn categories(&self) -> Vec<NfType> {
        self.caches.read().await.keys().copied().collect()
    }

    /// Total stored entries across all categories.
    pub async fn len(&self) -> usize {
        let caches: Vec<_> = self.caches.read().await.values().cloned().collect();
        let mut total = 0;
        for cache in caches {
            total += cache.len().await;
        }
        total
    }

    /// True when no category holds an entry.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Purge every category cache and forget them.
    ///
    /// Later writes start fresh caches.
    pub async fn shutdown(&self) {
        let drained: Vec<_> = self.caches.write().await.drain().collect();
        let categories = drained.len();
        for (_, cache) in drained {
            cache.purge().await;
        }
        info!(categories, "discovery cache shut down");
    }
}
