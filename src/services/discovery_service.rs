//! Cache-first NF discovery.
//!
//! Serves discovery requests from the [`MasterCache`] and falls back to the
//! configured [`NrfDiscoveryClient`] on a miss, caching whatever the registry
//! returns for its validity period.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::domain::errors::DiscoveryResult;
use crate::domain::models::{CacheConfig, NfType, SearchFilterOptions, SearchResult};
use crate::domain::ports::NrfDiscoveryClient;
use crate::services::master_cache::MasterCache;

/// Discovery entry point holding the cache and the registry client.
///
/// One instance is built at startup and shared by reference; independent
/// instances never share cached state.
#[derive(Clone)]
pub struct DiscoveryService {
    cache: Arc<MasterCache>,
    client: Option<Arc<dyn NrfDiscoveryClient>>,
}

impl DiscoveryService {
    /// Service over an existing cache. Without a client every miss is empty.
    pub fn new(cache: Arc<MasterCache>, client: Option<Arc<dyn NrfDiscoveryClient>>) -> Self {
        Self { cache, client }
    }

    /// Service with a fresh cache built from `config`.
    pub fn from_config(config: &CacheConfig, client: Option<Arc<dyn NrfDiscoveryClient>>) -> Self {
        Self::new(Arc::new(MasterCache::from_config(config)), client)
    }

    /// The underlying cache.
    pub fn cache(&self) -> &Arc<MasterCache> {
        &self.cache
    }

    /// Find instances of `target` matching `opts`.
    ///
    /// Cached matches are returned without contacting the registry; such
    /// results carry a `validity_period` of zero. On a miss the client is
    /// queried, every returned profile is cached under the returned validity
    /// period, and the registry's answer is returned as is. Client errors are
    /// passed through and leave the cache untouched. Without a client a miss
    /// yields an empty result.
    #[instrument(skip_all, fields(nrf_uri = %nrf_uri, target = %target, requester = %requester))]
    pub async fn search_nf_instances(
        &self,
        nrf_uri: &str,
        target: NfType,
        requester: NfType,
        opts: Option<&SearchFilterOptions>,
    ) -> DiscoveryResult<SearchResult> {
        let cached = self.cache.get(target, opts).await;
        if !cached.is_empty() {
            debug!(hits = cached.len(), "discovery served from cache");
            return Ok(SearchResult::new(cached, 0));
        }

        let Some(client) = self.client.as_ref() else {
            debug!("cache miss and no discovery client configured");
            return Ok(SearchResult::default());
        };

        debug!("cache miss, querying NRF");
        let result = client
            .search_nf_instances(nrf_uri, target, requester, opts)
            .await?;

        let ttl = Duration::from_secs(u64::from(result.validity_period));
        for profile in &result.nf_instances {
            self.cache.set(profile, ttl).await;
        }
        debug!(
            instances = result.nf_instances.len(),
            validity_period = result.validity_period,
            "cached NRF discovery result"
        );

        Ok(result)
    }

    /// Purge all cached state.
    pub async fn shutdown(&self) {
        self.cache.shutdown().await;
    }
}

impl std::fmt::Debug for DiscoveryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryService")
            .field("cache", &self.cache)
            .field("has_client", &self.client.is_some())
            .finish()
    }
}
