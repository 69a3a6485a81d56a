use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::error::FeedError;
use crate::feed::types::FeedResponse;
use crate::feed::{FeedPage, FeedSource};

/// HTTP page fetcher for the upstream CVE feed.
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    pub fn new(base_url: String, request_timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch_page(
        &self,
        start_index: u64,
        results_per_page: u64,
    ) -> Result<FeedPage, FeedError> {
        debug!(
            url = %self.base_url,
            start_index = start_index,
            results_per_page = results_per_page,
            "Fetching feed page"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("resultsPerPage", results_per_page),
                ("startIndex", start_index),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(FeedError::Status { status, body });
        }

        let feed: FeedResponse = response.json().await?;

        debug!(
            start_index = start_index,
            items = feed.vulnerabilities.len(),
            total_results = ?feed.total_results,
            "Feed page fetched"
        );

        Ok(FeedPage {
            items: feed.vulnerabilities,
            total_results: feed.total_results,
        })
    }
}
