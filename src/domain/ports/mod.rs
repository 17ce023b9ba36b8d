//! Port trait definitions (Hexagonal Architecture)
//!
//! The discovery cache depends on exactly one outside collaborator: the NRF
//! discovery client that answers cache misses.

pub mod nrf_discovery;

pub use nrf_discovery::{FnDiscoveryClient, NrfDiscoveryClient};
