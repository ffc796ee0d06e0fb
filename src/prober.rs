// prober.rs - Bucket existence probe
// Purpose: One metadata lookup per candidate, classified into a ProbeOutcome

use tracing::debug;

use crate::config::ScanConfig;
use crate::storage_api::{ApiResponse, StorageApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 404, or a 403 whose body carries a denial phrase
    NotFound,
    /// 403 without a denial phrase: the bucket exists but cannot be listed
    ExistsRestricted,
    /// 200: the object index should be retrievable
    ExistsListable,
    /// Any other status code
    Unknown(u16),
    /// No response at all (DNS, connect, timeout)
    TransportError(String),
}

/// Classify a metadata response.
///
/// The 403 rule is a substring heuristic on provider wording, so the phrase
/// list comes from configuration.
pub fn classify(response: &ApiResponse, denial_phrases: &[String]) -> ProbeOutcome {
    match response.status {
        200 => ProbeOutcome::ExistsListable,
        404 => ProbeOutcome::NotFound,
        403 => {
            let denied = denial_phrases
                .iter()
                .filter(|phrase| !phrase.is_empty())
                .any(|phrase| response.body.contains(phrase.as_str()));
            if denied {
                ProbeOutcome::NotFound
            } else {
                ProbeOutcome::ExistsRestricted
            }
        }
        status => ProbeOutcome::Unknown(status),
    }
}

/// Probe a single candidate name.
pub async fn probe<A: StorageApi>(api: &A, bucket: &str, config: &ScanConfig) -> ProbeOutcome {
    match api.bucket_metadata(bucket).await {
        Ok(response) => {
            let outcome = classify(&response, &config.denial_phrases);
            debug!(bucket, status = response.status, ?outcome, "probed bucket");
            outcome
        }
        Err(e) => {
            debug!(bucket, error = %e, "probe failed");
            ProbeOutcome::TransportError(format!("{:#}", e))
        }
    }
}
