//! Domain models for NF discovery caching.

pub mod config;
pub mod nf_profile;
pub mod search;

pub use config::{CacheConfig, Config, LoggingConfig, MatchPolicy};
pub use nf_profile::{
    AusfInfo, DnnSmfInfoItem, NfProfile, NfService, NfStatus, NfType, PcfInfo, SmfInfo, Snssai,
    SnssaiSmfInfoItem, SupiRange, SupiRangeInfo, UdmInfo,
};
pub use search::{SearchFilterOptions, SearchResult};
