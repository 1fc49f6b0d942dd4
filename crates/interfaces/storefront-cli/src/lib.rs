pub mod account;
pub mod commands;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use storefront_app_core::persistence::FilePersistence;
use storefront_app_core::{SettingsRepo, SortOrder, StoreSettings};
use storefront_core::{Facet, FilterSet};
use storefront_infra::HttpCatalogSource;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Store session, wishlist and settings here instead of the config directory
    #[arg(long, global = true, env = "STOREFRONT_DATA_DIR")]
    pub data_dir: Option<Utf8PathBuf>,
    #[arg(long, global = true, env = "STOREFRONT_CATALOG_URL")]
    pub catalog_url: Option<String>,
    /// Products requested per fetch
    #[arg(long, global = true, env = "STOREFRONT_CATALOG_LIMIT")]
    pub limit: Option<usize>,
    #[arg(long, global = true, env = "STOREFRONT_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,
    #[arg(long, global = true, env = "STOREFRONT_REFRESH_SECS")]
    pub refresh_secs: Option<u64>,
}

impl GlobalOpts {
    pub fn persistence(&self) -> FilePersistence {
        match &self.data_dir {
            Some(dir) => FilePersistence::with_root(dir.clone()),
            None => FilePersistence::new(),
        }
    }

    /// Stored settings with this invocation's overrides applied. Nothing is
    /// written back.
    pub fn settings(&self, repo: &dyn SettingsRepo) -> Result<StoreSettings> {
        let mut settings = repo.load().context("Failed to load settings")?;
        if let Some(url) = &self.catalog_url {
            settings.catalog_url = url.clone();
        }
        if let Some(limit) = self.limit {
            settings.catalog_limit = limit;
        }
        if let Some(ms) = self.timeout_ms {
            settings.fetch_timeout_ms = ms;
        }
        if let Some(secs) = self.refresh_secs {
            settings.refresh_interval_secs = secs;
        }
        Ok(settings)
    }
}

pub fn catalog_source(settings: &StoreSettings) -> Result<HttpCatalogSource> {
    let client =
        storefront_infra::default_http_client().context("Failed to build HTTP client")?;
    Ok(HttpCatalogSource::new(client, settings.catalog_url.clone()))
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, value_delimiter = ',')]
    pub ideal_for: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub occasion: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub work: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub fabric: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub segment: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub suitable_for: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub raw_materials: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub pattern: Vec<String>,
    /// Hide out-of-stock products
    #[arg(long)]
    pub in_stock: bool,
    /// Only customizable products
    #[arg(long)]
    pub customizable: bool,
}

impl FilterArgs {
    fn values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::IdealFor => &self.ideal_for,
            Facet::Occasion => &self.occasion,
            Facet::Work => &self.work,
            Facet::Fabric => &self.fabric,
            Facet::Segment => &self.segment,
            Facet::SuitableFor => &self.suitable_for,
            Facet::RawMaterials => &self.raw_materials,
            Facet::Pattern => &self.pattern,
        }
    }

    pub fn to_filter_set(&self) -> FilterSet {
        Facet::ALL
            .into_iter()
            .fold(FilterSet::default(), |set, facet| {
                set.with_selection(facet, self.values(facet).iter().map(|v| v.trim()))
            })
            .with_availability(self.in_stock)
            .with_customizable(self.customizable)
    }
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum CliSort {
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl From<CliSort> for SortOrder {
    fn from(s: CliSort) -> Self {
        match s {
            CliSort::Recommended => SortOrder::Recommended,
            CliSort::PriceAsc => SortOrder::PriceLowToHigh,
            CliSort::PriceDesc => SortOrder::PriceHighToLow,
            CliSort::Newest => SortOrder::Newest,
        }
    }
}
