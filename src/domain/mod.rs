//! Domain layer for the NF discovery cache
//!
//! Profile and filter models, the discovery port, and domain errors.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DiscoveryError, DiscoveryResult};
