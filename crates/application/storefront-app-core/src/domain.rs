use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::{FilterSet, Product, ProductId};

pub type RefreshId = uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    pub catalog_url: String,
    pub catalog_limit: usize,
    pub fetch_timeout_ms: u64,
    pub refresh_interval_secs: u64,
    pub fallback_count: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            catalog_url: storefront_config::DEFAULT_CATALOG_URL.to_string(),
            catalog_limit: storefront_config::DEFAULT_CATALOG_LIMIT,
            fetch_timeout_ms: storefront_config::DEFAULT_FETCH_TIMEOUT_MS,
            refresh_interval_secs: storefront_config::DEFAULT_REFRESH_INTERVAL_SECS,
            fallback_count: storefront_config::FALLBACK_CATALOG_SIZE,
        }
    }
}

impl StoreSettings {
    pub fn limit(&self) -> usize {
        storefront_config::clamp_limit(self.catalog_limit)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms.max(1))
    }

    /// Never zero; `tokio::time::interval` rejects a zero period.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: f64,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    Source,
    Fallback { reason: String },
}

/// A fetch failure never shows up here: the refresh task turns it into a
/// fallback catalog before reporting back, so there is no error status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Ready,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub status: ViewStatus,
    pub catalog: Arc<[Product]>,
    pub filters: FilterSet,
    /// Always `filter::apply(&catalog, &filters)`.
    pub visible: Vec<Product>,
    pub origin: Option<CatalogOrigin>,
    pub installed_at: Option<DateTime<Utc>>,

    /// Latest refresh started; completions carrying any other id are stale.
    pub active_refresh: Option<RefreshId>,
    pub refresh_in_flight: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            status: ViewStatus::Loading,
            catalog: Arc::from(Vec::new()),
            filters: FilterSet::default(),
            visible: Vec::new(),
            origin: None,
            installed_at: None,
            active_refresh: None,
            refresh_in_flight: false,
        }
    }
}

impl ViewState {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, Some(CatalogOrigin::Fallback { .. }))
    }
}
