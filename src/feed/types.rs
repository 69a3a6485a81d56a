//! Wire format of the upstream feed (NVD CVE API 2.0)
//!
//! Every field defaults so that a missing or malformed-but-absent field
//! degrades to an empty value instead of failing the whole page.

use serde::{Deserialize, Serialize};

/// Top-level feed response for one page.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    #[serde(default)]
    pub results_per_page: u64,
    #[serde(default)]
    pub start_index: u64,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub vulnerabilities: Vec<VulnerabilityEnvelope>,
}

/// Wrapper around one CVE entry in the `vulnerabilities` list.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityEnvelope {
    #[serde(default)]
    pub cve: CveItem,
}

/// One raw CVE item as reported by the feed.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CveItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub last_modified: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub value: String,
}

/// Severity metric containers, one list per CVSS version.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(default)]
    pub cvss_metric_v31: Vec<CvssMetric>,
    #[serde(default)]
    pub cvss_metric_v30: Vec<CvssMetric>,
    #[serde(default)]
    pub cvss_metric_v2: Vec<CvssMetric>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvssMetric {
    #[serde(default)]
    pub cvss_data: CvssData,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvssData {
    #[serde(default)]
    pub base_score: Option<f64>,
}
