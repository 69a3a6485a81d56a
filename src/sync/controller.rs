use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::FeedError;
use crate::feed::FeedSource;
use crate::feed::normalize::normalize;
use crate::storage::CveStore;
use crate::sync::status::{RunOutcome, SyncStatus, SyncSummary};

/// Drives the upstream feed from offset 0 to exhaustion, normalizing and
/// upserting every page.
///
/// A run terminates on the first page shorter than `page_size`. A feed
/// error aborts the run without retry; already-applied upserts are kept
/// (sync is not transactional across pages). A single record failing to
/// upsert is logged and skipped so one bad record cannot stall the run.
pub struct SyncController {
    feed: Arc<dyn FeedSource>,
    store: Arc<dyn CveStore>,
    page_size: u64,
    status: Arc<SyncStatus>,
}

impl SyncController {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        store: Arc<dyn CveStore>,
        page_size: u64,
        status: Arc<SyncStatus>,
    ) -> Self {
        Self {
            feed,
            store,
            page_size,
            status,
        }
    }

    pub fn status(&self) -> &Arc<SyncStatus> {
        &self.status
    }

    /// Entry point for all triggers (startup, cadence tick, manual).
    ///
    /// Returns false when the trigger was dropped because a run was
    /// already active.
    pub async fn run(&self) -> bool {
        if !self.status.try_begin() {
            warn!("Sync run already in progress, dropping trigger");
            return false;
        }

        let started_at = Utc::now();
        info!(page_size = self.page_size, "Sync run started");

        match self.run_pages(started_at).await {
            Ok(summary) => {
                info!(
                    pages_fetched = summary.pages_fetched,
                    records_upserted = summary.records_upserted,
                    records_skipped = summary.records_skipped,
                    upsert_failures = summary.upsert_failures,
                    "Sync run completed"
                );
                self.status.finish(RunOutcome::Completed(summary));
            }
            Err(e) => {
                error!(error = %e, "Sync run failed");
                self.status.finish(RunOutcome::Failed {
                    error: e.to_string(),
                    started_at,
                    finished_at: Utc::now(),
                });
            }
        }

        true
    }

    async fn run_pages(
        &self,
        started_at: chrono::DateTime<Utc>,
    ) -> Result<SyncSummary, FeedError> {
        let mut start_index: u64 = 0;
        let mut pages_fetched: u64 = 0;
        let mut records_upserted: u64 = 0;
        let mut records_skipped: u64 = 0;
        let mut upsert_failures: u64 = 0;

        loop {
            let page = self.feed.fetch_page(start_index, self.page_size).await?;
            pages_fetched += 1;

            let item_count = page.item_count();
            debug!(
                start_index = start_index,
                items = item_count,
                "Processing feed page"
            );

            for envelope in &page.items {
                let Some(record) = normalize(&envelope.cve) else {
                    debug!("Skipping item without identifier");
                    records_skipped += 1;
                    continue;
                };

                match self.store.upsert_cve(&record) {
                    Ok(()) => records_upserted += 1,
                    Err(e) => {
                        warn!(
                            cve_id = %record.cve_id,
                            error = %e,
                            "Failed to upsert record, continuing"
                        );
                        upsert_failures += 1;
                    }
                }
            }

            // A short page means the feed is exhausted.
            if (item_count as u64) < self.page_size {
                break;
            }
            start_index += self.page_size;
        }

        Ok(SyncSummary {
            pages_fetched,
            records_upserted,
            records_skipped,
            upsert_failures,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedPage;
    use crate::feed::types::{CveItem, VulnerabilityEnvelope};
    use crate::storage::models::CveRecord;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn envelope(id: Option<&str>) -> VulnerabilityEnvelope {
        VulnerabilityEnvelope {
            cve: CveItem {
                id: id.map(str::to_string),
                ..Default::default()
            },
        }
    }

    fn page(ids: &[&str]) -> FeedPage {
        FeedPage {
            items: ids.iter().map(|id| envelope(Some(id))).collect(),
            total_results: None,
        }
    }

    fn generated_page(prefix: &str, count: usize) -> FeedPage {
        FeedPage {
            items: (0..count)
                .map(|i| envelope(Some(&format!("CVE-{prefix}-{i}"))))
                .collect(),
            total_results: None,
        }
    }

    /// Feed returning a fixed page sequence, recording requested offsets.
    struct ScriptedFeed {
        pages: Mutex<VecDeque<Result<FeedPage, FeedError>>>,
        offsets: Mutex<Vec<u64>>,
    }

    impl ScriptedFeed {
        fn new(pages: Vec<Result<FeedPage, FeedError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                offsets: Mutex::new(Vec::new()),
            }
        }

        fn offsets(&self) -> Vec<u64> {
            self.offsets.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FeedSource for ScriptedFeed {
        async fn fetch_page(
            &self,
            start_index: u64,
            _results_per_page: u64,
        ) -> Result<FeedPage, FeedError> {
            self.offsets.lock().unwrap().push(start_index);
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(FeedPage::default()))
        }
    }

    /// In-memory store with upsert-by-id semantics and optional per-id
    /// failure injection.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<CveRecord>>,
        fail_ids: Vec<String>,
    }

    impl MemoryStore {
        fn failing_on(ids: &[&str]) -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                fail_ids: ids.iter().map(|id| id.to_string()).collect(),
            }
        }

        fn records(&self) -> Vec<CveRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl CveStore for MemoryStore {
        fn upsert_cve(&self, record: &CveRecord) -> anyhow::Result<()> {
            if self.fail_ids.contains(&record.cve_id) {
                return Err(anyhow!("disk full"));
            }
            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|r| r.cve_id == record.cve_id) {
                Some(existing) => *existing = record.clone(),
                None => records.push(record.clone()),
            }
            Ok(())
        }
    }

    fn controller(
        feed: Arc<ScriptedFeed>,
        store: Arc<MemoryStore>,
        page_size: u64,
    ) -> SyncController {
        SyncController::new(feed, store, page_size, Arc::new(SyncStatus::new()))
    }

    fn completed_summary(status: &SyncStatus) -> SyncSummary {
        match status.last_run() {
            Some(RunOutcome::Completed(summary)) => summary,
            other => panic!("expected completed run, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_single_short_page_terminates_after_one_fetch() {
        // Scenario A: one page of 2 items against page size 100
        let feed = Arc::new(ScriptedFeed::new(vec![Ok(page(&["CVE-1", "CVE-2"]))]));
        let store = Arc::new(MemoryStore::default());
        let controller = controller(feed.clone(), store.clone(), 100);

        assert!(controller.run().await);

        assert_eq!(feed.offsets(), vec![0]);
        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cve_id, "CVE-1");
        assert_eq!(records[1].cve_id, "CVE-2");
    }

    #[tokio::test]
    async fn test_full_pages_advance_offsets_until_short_page() {
        // Scenario B: pages of 100, 100, 40 -> offsets 0, 100, 200
        let feed = Arc::new(ScriptedFeed::new(vec![
            Ok(generated_page("A", 100)),
            Ok(generated_page("B", 100)),
            Ok(generated_page("C", 40)),
        ]));
        let store = Arc::new(MemoryStore::default());
        let controller = controller(feed.clone(), store.clone(), 100);

        controller.run().await;

        assert_eq!(feed.offsets(), vec![0, 100, 200]);
        assert_eq!(store.records().len(), 240);

        let summary = completed_summary(controller.status());
        assert_eq!(summary.pages_fetched, 3);
        assert_eq!(summary.records_upserted, 240);
    }

    #[tokio::test]
    async fn test_exact_page_size_final_page_fetches_one_more() {
        // A full page is not proof of exhaustion; the next empty page is.
        let feed = Arc::new(ScriptedFeed::new(vec![
            Ok(generated_page("X", 3)),
            Ok(page(&[])),
        ]));
        let store = Arc::new(MemoryStore::default());
        let controller = controller(feed.clone(), store.clone(), 3);

        controller.run().await;

        assert_eq!(feed.offsets(), vec![0, 3]);
        assert_eq!(store.records().len(), 3);
    }

    #[tokio::test]
    async fn test_items_without_id_are_skipped_not_stored() {
        let feed = Arc::new(ScriptedFeed::new(vec![Ok(FeedPage {
            items: vec![
                envelope(Some("CVE-1")),
                envelope(None),
                envelope(Some("CVE-2")),
            ],
            total_results: None,
        })]));
        let store = Arc::new(MemoryStore::default());
        let controller = controller(feed, store.clone(), 100);

        controller.run().await;

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.cve_id.is_empty()));

        let summary = completed_summary(controller.status());
        assert_eq!(summary.records_skipped, 1);
        assert_eq!(summary.records_upserted, 2);
    }

    #[tokio::test]
    async fn test_transport_error_fails_run_and_keeps_prior_pages() {
        let feed = Arc::new(ScriptedFeed::new(vec![
            Ok(generated_page("Y", 2)),
            Err(FeedError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                body: "upstream down".to_string(),
            }),
        ]));
        let store = Arc::new(MemoryStore::default());
        let controller = controller(feed.clone(), store.clone(), 2);

        assert!(controller.run().await);

        // First page stayed applied; no rollback across pages
        assert_eq!(store.records().len(), 2);
        assert_eq!(feed.offsets(), vec![0, 2]);
        assert!(matches!(
            controller.status().last_run(),
            Some(RunOutcome::Failed { .. })
        ));
        assert!(!controller.status().is_running());
    }

    #[tokio::test]
    async fn test_upsert_failure_does_not_abort_page() {
        let feed = Arc::new(ScriptedFeed::new(vec![Ok(page(&[
            "CVE-1", "CVE-2", "CVE-3",
        ]))]));
        let store = Arc::new(MemoryStore::failing_on(&["CVE-2"]));
        let controller = controller(feed, store.clone(), 100);

        controller.run().await;

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cve_id, "CVE-1");
        assert_eq!(records[1].cve_id, "CVE-3");

        let summary = completed_summary(controller.status());
        assert_eq!(summary.upsert_failures, 1);
        assert_eq!(summary.records_upserted, 2);
    }

    #[tokio::test]
    async fn test_reapplying_same_page_is_idempotent() {
        let feed = Arc::new(ScriptedFeed::new(vec![
            Ok(page(&["CVE-1", "CVE-2"])),
            Ok(page(&["CVE-1", "CVE-2"])),
        ]));
        let store = Arc::new(MemoryStore::default());
        let controller = controller(feed, store.clone(), 100);

        controller.run().await;
        let after_first = store.records();

        controller.run().await;
        assert_eq!(store.records(), after_first);
    }

    #[tokio::test]
    async fn test_trigger_dropped_while_run_active() {
        let feed = Arc::new(ScriptedFeed::new(vec![Ok(page(&["CVE-1"]))]));
        let store = Arc::new(MemoryStore::default());
        let controller = controller(feed, store, 100);

        // Hold the run slot as an in-flight run would
        assert!(controller.status().try_begin());
        assert!(!controller.run().await);

        controller
            .status()
            .finish(RunOutcome::Failed {
                error: "test".to_string(),
                started_at: Utc::now(),
                finished_at: Utc::now(),
            });
        assert!(controller.run().await);
    }
}
