//! Network function profile as returned by NRF discovery.
//!
//! Only the attributes the discovery cache reads are modelled as typed fields.
//! Everything else the registry sends round-trips through `extra`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network function category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NfType {
    /// Network repository function.
    Nrf,
    /// Unified data management.
    Udm,
    /// Access and mobility management function.
    Amf,
    /// Session management function.
    Smf,
    /// Authentication server function.
    Ausf,
    /// Network exposure function.
    Nef,
    /// Policy control function.
    Pcf,
    /// SMS function.
    Smsf,
    /// Network slice selection function.
    Nssf,
    /// Unified data repository.
    Udr,
    /// Location management function.
    Lmf,
    /// Gateway mobile location centre.
    Gmlc,
    /// 5G equipment identity register.
    #[serde(rename = "5G_EIR")]
    FiveGEir,
    /// Security edge protection proxy.
    Sepp,
    /// User plane function.
    Upf,
    /// Non-3GPP interworking function.
    N3iwf,
    /// Application function.
    Af,
    /// Unstructured data storage function.
    Udsf,
    /// Binding support function.
    Bsf,
    /// Charging function.
    Chf,
    /// Network data analytics function.
    Nwdaf,
}

impl NfType {
    /// Registry wire name, e.g. `"SMF"` or `"5G_EIR"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nrf => "NRF",
            Self::Udm => "UDM",
            Self::Amf => "AMF",
            Self::Smf => "SMF",
            Self::Ausf => "AUSF",
            Self::Nef => "NEF",
            Self::Pcf => "PCF",
            Self::Smsf => "SMSF",
            Self::Nssf => "NSSF",
            Self::Udr => "UDR",
            Self::Lmf => "LMF",
            Self::Gmlc => "GMLC",
            Self::FiveGEir => "5G_EIR",
            Self::Sepp => "SEPP",
            Self::Upf => "UPF",
            Self::N3iwf => "N3IWF",
            Self::Af => "AF",
            Self::Udsf => "UDSF",
            Self::Bsf => "BSF",
            Self::Chf => "CHF",
            Self::Nwdaf => "NWDAF",
        }
    }
}

impl fmt::Display for NfType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration status of an NF instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NfStatus {
    /// Discoverable and serving.
    #[default]
    Registered,
    /// Temporarily out of service.
    Suspended,
    /// Registered but hidden from discovery.
    Undiscoverable,
}

/// Single network slice selection assistance information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snssai {
    /// Slice/service type.
    pub sst: u8,
    /// Slice differentiator (hex string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sd: Option<String>,
}

impl Snssai {
    /// Slice with the given type and optional differentiator.
    pub fn new(sst: u8, sd: Option<&str>) -> Self {
        Self {
            sst,
            sd: sd.map(str::to_string),
        }
    }
}

/// One service advertised by an NF instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfService {
    /// Instance-unique service id.
    pub service_instance_id: String,
    /// Standard service name, e.g. `nsmf-pdusession`.
    pub service_name: String,
    /// URI scheme (`http` or `https`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Prefix prepended to the service's API root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_prefix: Option<String>,
}

impl NfService {
    /// Service whose instance id is its name.
    pub fn named(name: impl Into<String>) -> Self {
        let service_name = name.into();
        Self {
            service_instance_id: service_name.clone(),
            service_name,
            ..Default::default()
        }
    }
}

/// One DNN served on a slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnnSmfInfoItem {
    /// Data network name, or `*` for any.
    pub dnn: String,
}

/// Per-slice DNN list of an SMF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnssaiSmfInfoItem {
    /// Slice this item applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_nssai: Option<Snssai>,
    /// DNNs served on `s_nssai`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dnn_smf_info_list: Option<Vec<DnnSmfInfoItem>>,
}

/// SMF-specific profile block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmfInfo {
    /// Per-slice DNN lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_nssai_smf_info_list: Option<Vec<SnssaiSmfInfoItem>>,
}

/// SUPI range served by an instance.
///
/// Either `pattern` (a regular expression) or the half-open `[start, end)`
/// lexical bounds are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupiRange {
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Exclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Regular expression the whole SUPI must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl SupiRange {
    /// Lexical range `[start, end)`.
    pub fn bounded(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
            pattern: None,
        }
    }

    /// Range matching a regular expression.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Default::default()
        }
    }
}

/// Subscriber-range information carried by AUSF, UDM and PCF profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupiRangeInfo {
    /// Operator-assigned group of instances sharing the ranges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Subscribers served; empty means all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supi_ranges: Vec<SupiRange>,
}

/// AUSF-specific profile block.
pub type AusfInfo = SupiRangeInfo;
/// UDM-specific profile block.
pub type UdmInfo = SupiRangeInfo;
/// PCF-specific profile block.
pub type PcfInfo = SupiRangeInfo;

/// Profile of one remote NF instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfProfile {
    /// Registry-assigned identity; the cache key.
    pub nf_instance_id: String,
    /// Category; selects the cache and match predicate.
    pub nf_type: NfType,
    /// Registration status; defaults to registered.
    #[serde(default)]
    pub nf_status: NfStatus,
    /// Fully qualified domain name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    /// IPv4 addresses or host names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4_addresses: Vec<String>,
    /// Slices the instance is configured for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_nssais: Option<Vec<Snssai>>,
    /// Slices the instance may be selected for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_nssais: Option<Vec<Snssai>>,
    /// Advertised services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nf_services: Option<Vec<NfService>>,
    /// Set on SMF profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smf_info: Option<SmfInfo>,
    /// Set on AUSF profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ausf_info: Option<AusfInfo>,
    /// Set on UDM profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udm_info: Option<UdmInfo>,
    /// Set on PCF profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcf_info: Option<PcfInfo>,
    /// Attributes the cache does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NfProfile {
    /// Bare profile with only identity and category set.
    pub fn new(nf_instance_id: impl Into<String>, nf_type: NfType) -> Self {
        Self {
            nf_instance_id: nf_instance_id.into(),
            nf_type,
            nf_status: NfStatus::Registered,
            fqdn: None,
            ipv4_addresses: Vec::new(),
            s_nssais: None,
            allowed_nssais: None,
            nf_services: None,
            smf_info: None,
            ausf_info: None,
            udm_info: None,
            pcf_info: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Names of all advertised services.
    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.nf_services
            .iter()
            .flatten()
            .map(|service| service.service_name.as_str())
    }

    /// SUPI ranges from this category's own info block.
    pub fn supi_ranges(&self) -> &[SupiRange] {
        let info = match self.nf_type {
            NfType::Ausf => self.ausf_info.as_ref(),
            NfType::Udm => self.udm_info.as_ref(),
            NfType::Pcf => self.pcf_info.as_ref(),
            _ => None,
        };
        info.map(|info| info.supi_ranges.as_slice()).unwrap_or_default()
    }

    /// Per-slice entries of the SMF info block, if the block carries a list.
    pub fn snssai_smf_info_list(&self) -> Option<&[SnssaiSmfInfoItem]> {
        self.smf_info
            .as_ref()
            .and_then(|info| info.s_nssai_smf_info_list.as_deref())
    }
}
