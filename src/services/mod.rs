//! Service layer: the expiring cache engine, filter matching, and the
//! cache-first discovery facade.

pub mod discovery_service;
pub mod expiry_queue;
pub mod master_cache;
pub mod match_filters;
pub mod nf_cache;

pub use discovery_service::DiscoveryService;
pub use expiry_queue::{CacheEntry, EntryId, ExpiryQueue};
pub use master_cache::MasterCache;
pub use match_filters::{MatchEngine, MatchStrategy, SupiRanges};
pub use nf_cache::NfCache;
