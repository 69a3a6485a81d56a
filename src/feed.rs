//! Upstream CVE feed access
//!
//! The feed is a paginated JSON HTTP endpoint in the NVD CVE API 2.0
//! shape. One [`FeedSource::fetch_page`] call performs exactly one
//! outbound request; retry policy lives with the sync controller.
//!
//! # Module Structure
//! - `client`: HTTP page fetcher
//! - `types`: wire format of the upstream response
//! - `normalize`: raw item to canonical record mapping

pub mod client;
pub mod normalize;
pub mod types;

use async_trait::async_trait;

use crate::error::FeedError;
use types::VulnerabilityEnvelope;

/// One page of upstream results.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub items: Vec<VulnerabilityEnvelope>,
    /// Total record count advertised by the feed, when present.
    pub total_results: Option<u64>,
}

impl FeedPage {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// A paginated source of vulnerability records.
///
/// Implemented by the HTTP [`client::FeedClient`]; test code substitutes
/// scripted in-memory sources.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch one page starting at `start_index`, requesting up to
    /// `results_per_page` items.
    async fn fetch_page(
        &self,
        start_index: u64,
        results_per_page: u64,
    ) -> Result<FeedPage, FeedError>;
}
