//! Per-category predicates deciding whether a cached profile satisfies a
//! discovery filter.
//!
//! Dispatch is an exhaustive match from [`NfType`] to a [`MatchStrategy`], so
//! every category has a predicate. Categories without discriminating criteria
//! pass through. Within a predicate the filter dimensions are conjunctive and
//! an absent dimension imposes no constraint.

use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use crate::domain::models::{MatchPolicy, NfProfile, NfType, SearchFilterOptions, Snssai, SupiRange};
use crate::services::expiry_queue::CacheEntry;

/// Wildcard DNN accepted for any requested DNN.
const DNN_WILDCARD: &str = "*";

/// Matching rule set applied to one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Service names, slice identifiers and DNN.
    SliceAndDnn,
    /// SUPI against the category's configured ranges.
    SupiRange,
    /// Every profile matches.
    PassThrough,
}

impl MatchStrategy {
    /// Strategy registered for `nf_type`.
    pub const fn for_nf_type(nf_type: NfType) -> Self {
        match nf_type {
            NfType::Smf => Self::SliceAndDnn,
            NfType::Ausf | NfType::Udm | NfType::Pcf => Self::SupiRange,
            NfType::Nrf
            | NfType::Amf
            | NfType::Nef
            | NfType::Smsf
            | NfType::Nssf
            | NfType::Udr
            | NfType::Lmf
            | NfType::Gmlc
            | NfType::FiveGEir
            | NfType::Sepp
            | NfType::Upf
            | NfType::N3iwf
            | NfType::Af
            | NfType::Udsf
            | NfType::Bsf
            | NfType::Chf
            | NfType::Nwdaf => Self::PassThrough,
        }
    }
}

/// Evaluates profiles against search filters under a [`MatchPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchEngine {
    policy: MatchPolicy,
}

impl MatchEngine {
    /// Engine evaluating under `policy`.
    pub const fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    /// The configured policy.
    pub const fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Whether `profile` satisfies `opts`, using the predicate registered for
    /// the profile's own category.
    ///
    /// SUPI patterns are compiled on every call; cached entries should go
    /// through [`MatchEngine::matches_entry`].
    pub fn matches(&self, profile: &NfProfile, opts: &SearchFilterOptions) -> bool {
        self.evaluate(profile, None, opts)
    }

    /// Like [`MatchEngine::matches`], reusing the SUPI ranges the entry
    /// compiled when it was stored.
    pub fn matches_entry(&self, entry: &CacheEntry, opts: &SearchFilterOptions) -> bool {
        self.evaluate(entry.profile(), Some(entry.supi_ranges()), opts)
    }

    fn evaluate(
        &self,
        profile: &NfProfile,
        compiled: Option<&SupiRanges>,
        opts: &SearchFilterOptions,
    ) -> bool {
        match MatchStrategy::for_nf_type(profile.nf_type) {
            MatchStrategy::SliceAndDnn => {
                self.match_service_names(profile, opts)
                    && self.match_snssais(profile, opts)
                    && match_dnn(profile, opts)
            }
            MatchStrategy::SupiRange => {
                let Some(supi) = opts.supi.as_deref() else {
                    return true;
                };
                match compiled {
                    Some(ranges) => ranges.admits(supi),
                    None => SupiRanges::compile(profile.supi_ranges()).admits(supi),
                }
            }
            MatchStrategy::PassThrough => true,
        }
    }

    fn match_service_names(&self, profile: &NfProfile, opts: &SearchFilterOptions) -> bool {
        let Some(requested) = opts.service_names.as_ref() else {
            return true;
        };

        let advertised: HashSet<&str> = profile.service_names().collect();
        let found = requested
            .iter()
            .filter(|name| advertised.contains(name.as_str()))
            .count();

        match self.policy {
            MatchPolicy::AnyOf => found > 0,
            MatchPolicy::AllOf => found == requested.len(),
        }
    }

    /// Malformed requested slices reject the profile outright.
    fn match_snssais(&self, profile: &NfProfile, opts: &SearchFilterOptions) -> bool {
        let Some(raw) = opts.snssais.as_ref() else {
            return true;
        };

        let requested = match parse_snssais(raw) {
            Ok(requested) => requested,
            Err(err) => {
                debug!(error = %err, nf_instance_id = %profile.nf_instance_id, "unparseable snssai in filter");
                return false;
            }
        };

        let info_slices = || {
            profile
                .snssai_smf_info_list()
                .into_iter()
                .flatten()
                .filter_map(|item| item.s_nssai.as_ref())
        };
        let allowed_slices = || profile.allowed_nssais.iter().flatten();

        match self.policy {
            MatchPolicy::AnyOf => {
                // The info block, when present, shadows the allowed list.
                let found = if profile.snssai_smf_info_list().is_some() {
                    requested
                        .iter()
                        .map(|snssai| info_slices().filter(|s| *s == snssai).count())
                        .sum::<usize>()
                } else {
                    requested
                        .iter()
                        .map(|snssai| allowed_slices().filter(|s| *s == snssai).count())
                        .sum::<usize>()
                };
                found > 0
            }
            MatchPolicy::AllOf => requested.iter().all(|snssai| {
                info_slices().any(|s| s == snssai) || allowed_slices().any(|s| s == snssai)
            }),
        }
    }
}

fn parse_snssais(raw: &[String]) -> Result<Vec<Snssai>, serde_json::Error> {
    raw.iter().map(|text| serde_json::from_str(text)).collect()
}

fn match_dnn(profile: &NfProfile, opts: &SearchFilterOptions) -> bool {
    let Some(dnn) = opts.dnn.as_deref() else {
        return true;
    };

    profile
        .snssai_smf_info_list()
        .into_iter()
        .flatten()
        .filter_map(|item| item.dnn_smf_info_list.as_ref())
        .flatten()
        .any(|item| item.dnn == dnn || item.dnn == DNN_WILDCARD)
}

/// A profile's SUPI ranges with every pattern compiled up front.
///
/// # Examples
///
/// ```
/// use nrf_cache::services::SupiRanges;
/// use nrf_cache::SupiRange;
///
/// let ranges = SupiRanges::compile(&[
///     SupiRange::pattern(r"imsi-20893\d{10}"),
///     SupiRange::bounded("imsi-1", "imsi-2"),
/// ]);
/// assert!(ranges.admits("imsi-208930000000001"));
/// assert!(ranges.admits("imsi-15"));
/// assert!(!ranges.admits("imsi-2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SupiRanges {
    ranges: Vec<CompiledRange>,
}

#[derive(Debug, Clone)]
enum CompiledRange {
    /// Full-string match.
    Pattern(Regex),
    /// Half-open `[start, end)` in lexical order. No `end` matches nothing.
    Bounded { start: String, end: Option<String> },
    /// A pattern that failed to compile never matches.
    Invalid,
}

impl SupiRanges {
    /// Compile `ranges`. Invalid patterns are logged and kept as ranges that
    /// never match.
    pub fn compile(ranges: &[SupiRange]) -> Self {
        let ranges = ranges
            .iter()
            .map(|range| match range.pattern.as_deref().filter(|p| !p.is_empty()) {
                Some(pattern) => match Regex::new(&format!("^(?:{pattern})$")) {
                    Ok(re) => CompiledRange::Pattern(re),
                    Err(err) => {
                        debug!(pattern, error = %err, "invalid supi range pattern");
                        CompiledRange::Invalid
                    }
                },
                None => CompiledRange::Bounded {
                    start: range.start.clone().unwrap_or_default(),
                    end: range.end.clone(),
                },
            })
            .collect();
        Self { ranges }
    }

    /// Number of configured ranges, including invalid ones.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True when the profile declares no ranges.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether `supi` is served. An instance that declares no ranges serves
    /// every subscriber.
    pub fn admits(&self, supi: &str) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|range| range.contains(supi))
    }
}

impl CompiledRange {
    fn contains(&self, supi: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(supi),
            Self::Bounded { start, end } => {
                start.as_str() <= supi && end.as_deref().is_some_and(|end| supi < end)
            }
            Self::Invalid => false,
        }
    }
}
