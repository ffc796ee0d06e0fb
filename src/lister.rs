// lister.rs - Object listing for readable buckets
// Purpose: Fetch and decode the object index of a bucket confirmed listable

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::storage_api::StorageApi;

#[derive(Debug, Deserialize)]
struct ObjectDescriptor {
    name: String,
}

/// Only `items[].name` is read; a missing `items` key is an empty bucket.
#[derive(Debug, Deserialize)]
struct ObjectIndex {
    #[serde(default)]
    items: Vec<ObjectDescriptor>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("{0}")]
    Request(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Decode(String),
}

/// Decode an object-index body into object names, in response order.
pub fn decode_object_index(body: &str) -> Result<Vec<String>, ListingError> {
    let index: ObjectIndex =
        serde_json::from_str(body).map_err(|e| ListingError::Decode(e.to_string()))?;
    Ok(index.items.into_iter().map(|item| item.name).collect())
}

/// List the objects of `bucket`.
///
/// Only the first page is read; a `nextPageToken` in the response is ignored.
pub async fn list_objects<A: StorageApi>(api: &A, bucket: &str) -> Result<Vec<String>, ListingError> {
    let response = api
        .object_index(bucket)
        .await
        .map_err(|e| ListingError::Request(format!("{:#}", e)))?;

    if response.status != 200 {
        debug!(bucket, status = response.status, "object index refused");
        return Err(ListingError::Status(response.status));
    }

    let objects = decode_object_index(&response.body)?;
    debug!(bucket, count = objects.len(), "listed objects");
    Ok(objects)
}
