use std::time::Duration;

use reqwest::Client;
use storefront_core::RawRecord;
use tracing::{debug, warn};

/// Why a catalog fetch produced nothing usable. Every variant means the
/// catalog is unavailable for this refresh.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(String),
    #[error("catalog responded with status {0}")]
    Status(u16),
    #[error("catalog fetch exceeded {0:?}")]
    Timeout(Duration),
    #[error("catalog payload could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorKind {
    Network,
    Status,
    Timeout,
    Decode,
}

impl CatalogError {
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            CatalogError::Request(_) => CatalogErrorKind::Network,
            CatalogError::Status(_) => CatalogErrorKind::Status,
            CatalogError::Timeout(_) => CatalogErrorKind::Timeout,
            CatalogError::Decode(_) => CatalogErrorKind::Decode,
        }
    }
}

#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch up to `limit` raw records in source order.
    async fn fetch_catalog(
        &self,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<RawRecord>, CatalogError>;
}

/// HTTP catalog provider for a fakestore-style `GET /products?limit=N` endpoint.
pub struct HttpCatalogSource {
    client: Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn catalog_url(&self, limit: usize) -> Result<reqwest::Url, CatalogError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            CatalogError::Request(format!("invalid catalog url {}: {e}", self.base_url))
        })?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(
        &self,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<RawRecord>, CatalogError> {
        let url = self.catalog_url(limit)?;
        debug!("fetching catalog from {url}");

        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                CatalogError::Timeout(timeout)
            } else {
                CatalogError::Request(e.to_string())
            }
        };

        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let bytes = resp.bytes().await.map_err(classify)?;
        decode_records(&bytes)
    }
}

/// Decodes a JSON array of products one element at a time.
///
/// A body that is not an array fails the whole batch. A single element that
/// lacks an `id` (or is not an object) is dropped and logged; missing text
/// fields default to empty and a missing price to zero.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<RawRecord>, CatalogError> {
    let items: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|e| CatalogError::Decode(e.to_string()))?;

    let total = items.len();
    let records: Vec<RawRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(pos, item)| match serde_json::from_value::<RawRecord>(item) {
            Ok(rec) => Some(rec),
            Err(e) => {
                warn!("dropping catalog record at position {pos}: {e}");
                None
            }
        })
        .collect();

    if records.len() < total {
        debug!("decoded {} of {total} catalog records", records.len());
    }
    Ok(records)
}
