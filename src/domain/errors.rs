//! Domain errors for NF discovery.

use thiserror::Error;

use crate::domain::models::NfType;

/// Errors reported by an NRF discovery client.
///
/// The cache never produces these itself; they are handed back to the caller
/// exactly as the client returned them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The registry answered with an error status.
    #[error("NRF rejected discovery of {target}: status {status}: {cause}")]
    Registry {
        /// Category that was searched for.
        target: NfType,
        /// HTTP status of the answer.
        status: u16,
        /// Problem detail reported by the registry.
        cause: String,
    },

    /// The registry could not be reached.
    #[error("Transport error talking to {nrf_uri}: {message}")]
    Transport {
        /// Registry endpoint that was called.
        nrf_uri: String,
        /// Underlying failure.
        message: String,
    },

    /// The registry's answer could not be decoded.
    #[error("Invalid discovery response: {0}")]
    InvalidResponse(String),
}

/// Result alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
