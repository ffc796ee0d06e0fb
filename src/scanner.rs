// scanner.rs - Concurrent bucket scan coordinator
// Purpose: Probe every candidate under a permit pool and stream each
//          candidate's result group to a single consumer

use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tracing::{error, warn};

use crate::config::ScanConfig;
use crate::lister::list_objects;
use crate::prober::{ProbeOutcome, probe};
use crate::results::{CandidateReport, ResultLine};
use crate::storage_api::StorageApi;

/// Lines produced by one candidate, delivered as a unit so they are never
/// interleaved with another candidate's lines.
pub type ResultGroup = Vec<ResultLine>;

pub struct BucketScanner<A> {
    api: Arc<A>,
    config: Arc<ScanConfig>,
    semaphore: Arc<Semaphore>,
    progress: ProgressBar,
}

impl<A: StorageApi> BucketScanner<A> {
    pub fn new(api: A, config: ScanConfig) -> Self {
        let permits = config.concurrency.max(1);
        Self {
            api: Arc::new(api),
            config: Arc::new(config),
            semaphore: Arc::new(Semaphore::new(permits)),
            progress: ProgressBar::hidden(),
        }
    }

    /// Tick `progress` once per finished candidate
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Probe (and where listable, list) one candidate.
    pub async fn scan_one(api: &A, config: &ScanConfig, bucket: String) -> CandidateReport {
        let outcome = probe(api, &bucket, config).await;
        let listing = match outcome {
            ProbeOutcome::ExistsListable => Some(list_objects(api, &bucket).await),
            _ => None,
        };
        CandidateReport { bucket, outcome, listing }
    }

    /// Scan every candidate, sending non-empty result groups to `output`.
    ///
    /// One task is spawned per candidate and blocks on a permit before any
    /// network call. Returns once every task has finished; `output` is
    /// dropped on return, which closes the stream for the consumer.
    pub async fn scan(&self, candidates: Vec<String>, output: mpsc::UnboundedSender<ResultGroup>) {
        let mut handles = Vec::with_capacity(candidates.len());

        for bucket in candidates {
            let semaphore = Arc::clone(&self.semaphore);
            let api = Arc::clone(&self.api);
            let config = Arc::clone(&self.config);
            let output = output.clone();
            let progress = self.progress.clone();

            let handle = tokio::spawn(async move {
                // Released on drop, including when the task unwinds
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };

                let report = Self::scan_one(&api, &config, bucket).await;
                let lines = report.lines(&config);
                if !lines.is_empty() && output.send(lines).is_err() {
                    warn!(bucket = %report.bucket, "result stream closed, lines dropped");
                }
                progress.inc(1);
            });

            handles.push(handle);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "candidate task failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_api::fake::FakeApi;
    use std::time::Duration;

    async fn collect(scanner: &BucketScanner<FakeApi>, candidates: &[&str]) -> Vec<ResultGroup> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let candidates = candidates.iter().map(|c| c.to_string()).collect();
        scanner.scan(candidates, tx).await;

        let mut groups = Vec::new();
        while let Some(group) = rx.recv().await {
            groups.push(group);
        }
        groups
    }

    fn text(groups: &[ResultGroup]) -> Vec<String> {
        groups.iter().flatten().map(|l| l.to_string()).collect()
    }

    #[tokio::test]
    async fn test_not_found_emits_nothing() {
        let scanner = BucketScanner::new(FakeApi::new().metadata("ghost", 404, ""), ScanConfig::default());
        let groups = collect(&scanner, &["ghost"]).await;
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn test_listable_bucket_group() {
        let api = FakeApi::new()
            .metadata("open", 200, "{}")
            .objects("open", 200, r#"{"items":[{"name":"a.txt"},{"name":"b.txt"}]}"#);
        let scanner = BucketScanner::new(api, ScanConfig::default());

        let groups = collect(&scanner, &["open", "ghost"]).await;
        assert_eq!(groups.len(), 1);
        assert_eq!(
            text(&groups),
            vec![
                "EXISTS: https://storage.googleapis.com/open/",
                "    LISTABLE: open",
                "        - a.txt",
                "        - b.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_forbidden_handling() {
        let api = FakeApi::new()
            .metadata("denied", 403, r#"{"error":{"message":"Access denied."}}"#)
            .metadata("locked", 403, r#"{"error":{"message":"Billing account disabled"}}"#);
        let scanner = BucketScanner::new(api, ScanConfig::default());

        let groups = collect(&scanner, &["denied", "locked"]).await;
        assert_eq!(text(&groups), vec!["EXISTS: https://storage.googleapis.com/locked/"]);
        assert!(scanner.api.listed().is_empty());
    }

    #[tokio::test]
    async fn test_groups_stay_contiguous() {
        let mut api = FakeApi::new().with_delay(Duration::from_millis(2));
        let names: Vec<String> = (0..8).map(|i| format!("bucket{}", i)).collect();
        for name in &names {
            api = api.metadata(name, 200, "{}").objects(
                name,
                200,
                &format!(r#"{{"items":[{{"name":"{0}-1"}},{{"name":"{0}-2"}}]}}"#, name),
            );
        }
        let scanner = BucketScanner::new(api, ScanConfig { concurrency: 4, ..ScanConfig::default() });

        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let groups = collect(&scanner, &refs).await;
        assert_eq!(groups.len(), 8);

        let lines = text(&groups);
        for chunk in lines.chunks(4) {
            let bucket = chunk[1].trim_start().trim_start_matches("LISTABLE: ").to_string();
            assert_eq!(chunk[0], format!("EXISTS: https://storage.googleapis.com/{}/", bucket));
            assert_eq!(chunk[2], format!("        - {}-1", bucket));
            assert_eq!(chunk[3], format!("        - {}-2", bucket));
        }
    }

    #[tokio::test]
    async fn test_concurrency_limit_respected() {
        let api = FakeApi::new().with_delay(Duration::from_millis(20));
        let scanner = BucketScanner::new(api, ScanConfig { concurrency: 3, ..ScanConfig::default() });

        let names: Vec<String> = (0..20).map(|i| format!("c{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        collect(&scanner, &refs).await;

        // Never above the limit, and permit holders run side by side
        assert_eq!(scanner.api.max_in_flight(), 3);
    }

    #[tokio::test]
    async fn test_terminates_when_every_probe_fails() {
        let mut api = FakeApi::new();
        let names: Vec<String> = (0..25).map(|i| format!("down{}", i)).collect();
        for name in &names {
            api = api.metadata_fails(name, "connection refused");
        }
        let scanner = BucketScanner::new(api, ScanConfig { concurrency: 2, ..ScanConfig::default() });

        let refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        let groups = collect(&scanner, &refs).await;
        assert_eq!(groups.len(), 25);
        assert!(text(&groups).iter().all(|l| l.starts_with("ERROR: Could not connect to")));
    }

    #[tokio::test]
    async fn test_closed_stream_does_not_stall_scan() {
        let api = FakeApi::new().metadata("locked", 403, "quota exceeded");
        let scanner = BucketScanner::new(api, ScanConfig::default());

        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        scanner.scan(vec!["locked".to_string(), "ghost".to_string()], tx).await;
        assert_eq!(scanner.progress.position(), 2);
    }

    #[tokio::test]
    async fn test_empty_candidate_set_closes_stream() {
        let scanner = BucketScanner::new(FakeApi::new(), ScanConfig::default());
        assert!(collect(&scanner, &[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_progress_counts_every_candidate() {
        let progress = ProgressBar::hidden();
        let scanner = BucketScanner::new(FakeApi::new(), ScanConfig::default()).with_progress(progress.clone());
        collect(&scanner, &["a", "b", "c"]).await;
        assert_eq!(progress.position(), 3);
    }
}
