// config.rs - Scan configuration
// Purpose: Runtime knobs shared by the prober, lister and scan coordinator

use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use std::time::Duration;

/// Default metadata endpoint; a bucket lookup is `<api_base>/<bucket>`.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/storage/v1/b";

/// Public URL prefix used when reporting a bucket.
pub const DEFAULT_PUBLIC_BASE: &str = "https://storage.googleapis.com";

/// Body fragments of a 403 that mean "indistinguishable from absent".
pub const DEFAULT_DENIAL_PHRASES: &[&str] = &["Access denied", "does not have"];

#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// Maximum number of candidates probed at the same time (>= 1)
    pub concurrency: usize,
    /// Emit UNKNOWN RESPONSE lines for unexpected status codes
    pub verbose: bool,
    /// Per-request deadline in seconds (0 = no deadline)
    pub timeout_secs: u64,
    pub api_base: String,
    pub public_base: String,
    pub denial_phrases: Vec<String>,
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            verbose: false,
            timeout_secs: 0,
            api_base: DEFAULT_API_BASE.to_string(),
            public_base: DEFAULT_PUBLIC_BASE.to_string(),
            denial_phrases: DEFAULT_DENIAL_PHRASES.iter().map(|p| p.to_string()).collect(),
            user_agent: format!("gcsenum/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScanConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Fail early on an API base that cannot carry bucket path segments
    pub fn validate(&self) -> Result<()> {
        self.endpoint(&[]).map(|_| ())
    }

    /// `api_base` with `segments` appended, each percent-encoded as a
    /// single path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .with_context(|| format!("Invalid API base URL: {}", self.api_base))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot take a path: {}", self.api_base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Metadata endpoint for one bucket
    pub fn metadata_url(&self, bucket: &str) -> Result<Url> {
        self.endpoint(&[bucket])
    }

    /// Object-index endpoint for one bucket
    pub fn objects_url(&self, bucket: &str) -> Result<Url> {
        self.endpoint(&[bucket, "o"])
    }

    /// Public address printed in EXISTS / UNKNOWN lines
    pub fn public_url(&self, bucket: &str) -> String {
        format!("{}/{}/", self.public_base.trim_end_matches('/'), bucket)
    }
}
