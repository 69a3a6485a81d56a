//! Raw feed item to canonical record mapping
//!
//! Pure functions with no side effects. Malformed-but-present fields
//! degrade to defaults; only a missing identifier excludes an item.

use crate::feed::types::{CveItem, Metrics};
use crate::storage::models::CveRecord;

/// Map one raw feed item to a canonical record.
///
/// Returns `None` when the item carries no identifier; such items are
/// skipped by the sync controller rather than treated as errors.
pub fn normalize(item: &CveItem) -> Option<CveRecord> {
    let cve_id = item.id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;

    let description = item
        .descriptions
        .first()
        .map(|d| d.value.clone())
        .unwrap_or_default();

    let last_modified = item.last_modified.clone().unwrap_or_default();

    Some(CveRecord {
        cve_id: cve_id.to_string(),
        description,
        score: base_score(&item.metrics),
        last_modified,
    })
}

/// First available CVSS base score, preferring newer metric versions.
fn base_score(metrics: &Metrics) -> Option<f64> {
    metrics
        .cvss_metric_v31
        .iter()
        .chain(&metrics.cvss_metric_v30)
        .chain(&metrics.cvss_metric_v2)
        .find_map(|m| m.cvss_data.base_score)
}
