//! NRF discovery cache
//!
//! A client-side cache of network function profiles placed in front of NRF
//! discovery. Profiles are partitioned per NF category, expire after the
//! validity period the registry granted them, and are filtered per category
//! against the caller's search criteria.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): profile and filter models, the discovery
//!   port, and errors
//! - **Service Layer** (`services`): expiry queue, category caches, match
//!   engine, master cache and the discovery facade
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nrf_cache::{CacheConfig, DiscoveryService, NfType, SearchFilterOptions};
//!
//! # async fn run(client: Arc<dyn nrf_cache::NrfDiscoveryClient>) {
//! let discovery = DiscoveryService::from_config(&CacheConfig::default(), Some(client));
//! let opts = SearchFilterOptions::new().with_dnn("internet");
//! let result = discovery
//!     .search_nf_instances("http://nrf:29510", NfType::Smf, NfType::Amf, Some(&opts))
//!     .await;
//! # let _ = result;
//! # }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DiscoveryError, DiscoveryResult};
pub use domain::models::{
    CacheConfig, Config, LoggingConfig, MatchPolicy, NfProfile, NfService, NfType,
    SearchFilterOptions, SearchResult, Snssai, SupiRange,
};
pub use domain::ports::{FnDiscoveryClient, NrfDiscoveryClient};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{DiscoveryService, MasterCache, MatchEngine, NfCache};
