//! Outbound port to the NRF discovery API.

use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

use crate::domain::errors::DiscoveryResult;
use crate::domain::models::{NfType, SearchFilterOptions, SearchResult};

/// Port for live NRF discovery, consulted on a cache miss.
///
/// Implementations perform the actual remote query. The returned
/// `validity_period` applies to every profile in the result.
///
/// # Examples
///
/// ```no_run
/// use nrf_cache::domain::ports::NrfDiscoveryClient;
/// use nrf_cache::domain::models::NfType;
///
/// async fn example(client: &dyn NrfDiscoveryClient) {
///     let result = client
///         .search_nf_instances("http://nrf:29510", NfType::Smf, NfType::Amf, None)
///         .await;
///     assert!(result.is_ok());
/// }
/// ```
#[async_trait]
pub trait NrfDiscoveryClient: Send + Sync {
    /// Query the registry for instances of `target` on behalf of `requester`.
    async fn search_nf_instances(
        &self,
        nrf_uri: &str,
        target: NfType,
        requester: NfType,
        opts: Option<&SearchFilterOptions>,
    ) -> DiscoveryResult<SearchResult>;
}

/// Adapts a closure returning a future into an [`NrfDiscoveryClient`].
///
/// The closure receives owned arguments so the future does not borrow from
/// the caller.
pub struct FnDiscoveryClient<F, Fut> {
    query: F,
    _future: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnDiscoveryClient<F, Fut>
where
    F: Fn(String, NfType, NfType, Option<SearchFilterOptions>) -> Fut + Send + Sync,
    Fut: Future<Output = DiscoveryResult<SearchResult>> + Send,
{
    /// Wrap `query`.
    pub fn new(query: F) -> Self {
        Self {
            query,
            _future: PhantomData,
        }
    }
}

#[async_trait]
impl<F, Fut> NrfDiscoveryClient for FnDiscoveryClient<F, Fut>
where
    F: Fn(String, NfType, NfType, Option<SearchFilterOptions>) -> Fut + Send + Sync,
    Fut: Future<Output = DiscoveryResult<SearchResult>> + Send,
{
    async fn search_nf_instances(
        &self,
        nrf_uri: &str,
        target: NfType,
        requester: NfType,
        opts: Option<&SearchFilterOptions>,
    ) -> DiscoveryResult<SearchResult> {
        (self.query)(nrf_uri.to_string(), target, requester, opts.cloned()).await
    }
}
