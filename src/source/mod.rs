pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Address, MenuItem};

pub use http::{HttpRecordSource, HttpSourceOptions, DEFAULT_BASE_URL};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid base URL: {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("invalid header '{header}', expected 'Key: Value'")]
    InvalidHeader { header: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only view of the remote address inventory.
///
/// Every call may fail independently; callers decide whether a failure is
/// fatal (total count), cosmetic (menu) or simply skipped (single records).
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn menu_items(&self) -> Result<Vec<MenuItem>, SourceError>;

    async fn total_count(&self) -> Result<u64, SourceError>;

    async fn address(&self, id: u64) -> Result<Address, SourceError>;
}

#[async_trait]
impl<S: RecordSource + ?Sized> RecordSource for Arc<S> {
    async fn menu_items(&self) -> Result<Vec<MenuItem>, SourceError> {
        (**self).menu_items().await
    }

    async fn total_count(&self) -> Result<u64, SourceError> {
        (**self).total_count().await
    }

    async fn address(&self, id: u64) -> Result<Address, SourceError> {
        (**self).address(id).await
    }
}
