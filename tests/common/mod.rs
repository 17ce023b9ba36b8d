//! Common test utilities for integration tests
//!
//! Registry-shaped profile fixtures and a scripted discovery client.

#![allow(dead_code)]

use async_trait::async_trait;
use nrf_cache::domain::models::{DnnSmfInfoItem, SmfInfo, SnssaiSmfInfoItem, SupiRangeInfo};
use nrf_cache::{
    DiscoveryError, DiscoveryResult, NfProfile, NfService, NfType, NrfDiscoveryClient,
    SearchFilterOptions, SearchResult, Snssai, SupiRange,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const NRF_URI: &str = "http://nrf:29510";

pub const SMF_PROFILE_JSON: &str = r#"{
    "nfInstanceId": "b926f193-1083-49a8-adb3-5fcf57a1f0bf",
    "nfType": "SMF",
    "nfStatus": "REGISTERED",
    "ipv4Addresses": ["smf"],
    "allowedPlmns": [{"mcc": "208", "mnc": "93"}],
    "sNssais": [{"sst": 1, "sd": "010203"}],
    "smfInfo": {
        "sNssaiSmfInfoList": [
            {"sNssai": {"sst": 1, "sd": "010203"}, "dnnSmfInfoList": [{"dnn": "internet"}]}
        ]
    },
    "nfServices": [
        {"serviceInstanceId": "b926f193nsmf-pdusession", "serviceName": "nsmf-pdusession", "scheme": "https", "apiPrefix": "http://smf:29502"},
        {"serviceInstanceId": "b926f193nsmf-event-exposure", "serviceName": "nsmf-event-exposure", "scheme": "https", "apiPrefix": "http://smf:29502"}
    ]
}"#;

pub const AUSF_PROFILE_JSON: &str = r#"{
    "nfInstanceId": "57d0a167-5283-4170-bdd8-881076049a81",
    "nfType": "AUSF",
    "nfStatus": "REGISTERED",
    "ipv4Addresses": ["ausf"],
    "plmnList": [{"mcc": "208", "mnc": "93"}],
    "ausfInfo": {"groupId": "ausfGroup001"},
    "nfServices": [
        {"serviceInstanceId": "57d0a167", "serviceName": "nausf-auth", "scheme": "http"}
    ]
}"#;

pub const AMF_PROFILE_JSON: &str = r#"{
    "nfInstanceId": "9f7d5a3f-88ab-4525-b31e-334da7faedab",
    "nfType": "AMF",
    "nfStatus": "REGISTERED",
    "ipv4Addresses": ["amf"],
    "sNssais": [{"sst": 1, "sd": "010203"}],
    "amfInfo": {"amfSetId": "3f8", "amfRegionId": "ca"},
    "nfServices": [
        {"serviceInstanceId": "0", "serviceName": "namf-comm", "scheme": "http"},
        {"serviceInstanceId": "1", "serviceName": "namf-evts", "scheme": "http"}
    ]
}"#;

pub fn parse(json: &str) -> NfProfile {
    serde_json::from_str(json).expect("fixture profile should parse")
}

pub fn smf_profile() -> NfProfile {
    parse(SMF_PROFILE_JSON)
}

pub fn ausf_profile() -> NfProfile {
    parse(AUSF_PROFILE_JSON)
}

pub fn amf_profile() -> NfProfile {
    parse(AMF_PROFILE_JSON)
}

/// SMF serving `dnn` on slice `(sst, sd)`.
pub fn smf_with_slice(id: &str, sst: u8, sd: &str, dnn: &str) -> NfProfile {
    let mut profile = NfProfile::new(id, NfType::Smf);
    profile.nf_services = Some(vec![NfService::named("nsmf-pdusession")]);
    profile.smf_info = Some(SmfInfo {
        s_nssai_smf_info_list: Some(vec![SnssaiSmfInfoItem {
            s_nssai: Some(Snssai::new(sst, Some(sd))),
            dnn_smf_info_list: Some(vec![DnnSmfInfoItem { dnn: dnn.to_string() }]),
        }]),
    });
    profile
}

/// UDM serving the half-open SUPI range `[start, end)`.
pub fn udm_with_range(id: &str, start: &str, end: &str) -> NfProfile {
    let mut profile = NfProfile::new(id, NfType::Udm);
    profile.udm_info = Some(SupiRangeInfo {
        group_id: None,
        supi_ranges: vec![SupiRange::bounded(start, end)],
    });
    profile
}

/// One recorded call to the scripted client.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub nrf_uri: String,
    pub target: NfType,
    pub requester: NfType,
    pub opts: Option<SearchFilterOptions>,
}

/// Discovery client replaying canned responses in order; the last response
/// repeats once the script is exhausted.
pub struct ScriptedClient {
    responses: Mutex<Vec<DiscoveryResult<SearchResult>>>,
    calls: AtomicUsize,
    queries: Mutex<Vec<RecordedQuery>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<DiscoveryResult<SearchResult>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(result: SearchResult) -> Self {
        Self::new(vec![Ok(result)])
    }

    pub fn failing(err: DiscoveryError) -> Self {
        Self::new(vec![Err(err)])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl NrfDiscoveryClient for ScriptedClient {
    async fn search_nf_instances(
        &self,
        nrf_uri: &str,
        target: NfType,
        requester: NfType,
        opts: Option<&SearchFilterOptions>,
    ) -> DiscoveryResult<SearchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(RecordedQuery {
            nrf_uri: nrf_uri.to_string(),
            target,
            requester,
            opts: opts.cloned(),
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses
                .first()
                .cloned()
                .unwrap_or_else(|| Ok(SearchResult::default()))
        }
    }
}
