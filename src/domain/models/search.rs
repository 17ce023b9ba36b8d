//! Discovery filters and results.

use serde::{Deserialize, Serialize};

use super::nf_profile::{NfProfile, Snssai};

/// Optional discovery criteria.
///
/// Every dimension is independent; an absent dimension does not constrain the
/// match. Slice identifiers are kept in their serialized form (one JSON object
/// per element) because that is how they travel as query parameters. They are
/// parsed at match time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilterOptions {
    /// Service names the instance must advertise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_names: Option<Vec<String>>,
    /// Slices, one serialized `Snssai` per element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snssais: Option<Vec<String>>,
    /// Data network name the instance must serve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnn: Option<String>,
    /// Subscriber the instance must serve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supi: Option<String>,
}

impl SearchFilterOptions {
    /// Filter with no dimension set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require one of (or all of, per policy) these service names.
    pub fn with_service_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Add slice identifiers, serializing each one.
    pub fn with_snssais<'a, I>(mut self, snssais: I) -> Self
    where
        I: IntoIterator<Item = &'a Snssai>,
    {
        let encoded = snssais
            .into_iter()
            .filter_map(|snssai| serde_json::to_string(snssai).ok());
        self.snssais.get_or_insert_with(Vec::new).extend(encoded);
        self
    }

    /// Add already-serialized slice identifiers verbatim.
    pub fn with_raw_snssais<I, S>(mut self, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.snssais
            .get_or_insert_with(Vec::new)
            .extend(raw.into_iter().map(Into::into));
        self
    }

    /// Require this DNN.
    pub fn with_dnn(mut self, dnn: impl Into<String>) -> Self {
        self.dnn = Some(dnn.into());
        self
    }

    /// Require this subscriber.
    pub fn with_supi(mut self, supi: impl Into<String>) -> Self {
        self.supi = Some(supi.into());
        self
    }

    /// True when no dimension is set.
    pub fn is_empty(&self) -> bool {
        self.service_names.is_none()
            && self.snssais.is_none()
            && self.dnn.is_none()
            && self.supi.is_none()
    }
}

/// Discovery response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Seconds the returned profiles may be cached for.
    #[serde(default)]
    pub validity_period: u32,
    /// Matching instances.
    #[serde(default)]
    pub nf_instances: Vec<NfProfile>,
}

impl SearchResult {
    /// Result carrying `nf_instances` valid for `validity_period` seconds.
    pub fn new(nf_instances: Vec<NfProfile>, validity_period: u32) -> Self {
        Self {
            validity_period,
            nf_instances,
        }
    }
}
