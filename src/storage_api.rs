// storage_api.rs - Storage provider HTTP access
// Purpose: Metadata and object-index lookups behind a trait so the scan core
//          can run against the real provider or a scripted fake

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use std::future::Future;

use crate::config::ScanConfig;

/// Status and body of one provider response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Provider endpoints used by the prober and the lister.
///
/// An `Err` means the request never produced a response (DNS, connect,
/// timeout, body read); any HTTP status is an `Ok`.
pub trait StorageApi: Send + Sync + 'static {
    /// Per-bucket metadata lookup
    fn bucket_metadata(&self, bucket: &str) -> impl Future<Output = Result<ApiResponse>> + Send;

    /// Object index of a bucket (first page only)
    fn object_index(&self, bucket: &str) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// Google Cloud Storage JSON API client
#[derive(Clone, Debug)]
pub struct GcsClient {
    client: Client,
    config: ScanConfig,
}

impl GcsClient {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn fetch(&self, url: Url) -> Result<ApiResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiResponse::new(status, body))
    }
}

impl StorageApi for GcsClient {
    async fn bucket_metadata(&self, bucket: &str) -> Result<ApiResponse> {
        self.fetch(self.config.metadata_url(bucket)?).await
    }

    async fn object_index(&self, bucket: &str) -> Result<ApiResponse> {
        self.fetch(self.config.objects_url(bucket)?).await
    }
}
