use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod facet;
pub mod filter;
pub mod normalize;

pub use facet::{Facet, ParseFacetError};
pub use filter::{apply, facet_counts, matches, FilterSet};
pub use normalize::{
    generate_fallback, generate_fallback_with, normalize, normalize_with, Enrichment,
    ModuloEnrichment,
};

/// Product identity as delivered by the catalog source: numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Num(u64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Num(n) => write!(f, "{n}"),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        ProductId::Num(value)
    }
}

impl FromStr for ProductId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<u64>() {
            Ok(n) => ProductId::Num(n),
            Err(_) => ProductId::Text(s.trim().to_string()),
        })
    }
}

/// One element of the upstream catalog payload. Fields beyond these are ignored.
/// Missing or `null` fields other than `id` take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Derived demo attributes attached to every product by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFacets {
    pub ideal_for: String,
    pub occasion: String,
    pub work: String,
    pub fabric: String,
    pub segment: String,
    pub suitable_for: String,
    pub raw_materials: String,
    pub pattern: String,
    pub new: bool,
    pub out_of_stock: bool,
    pub customizable: bool,
}

impl ProductFacets {
    pub fn value(&self, facet: Facet) -> &str {
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
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub category: String,
    #[serde(flatten)]
    pub facets: ProductFacets,
}

impl Product {
    pub fn from_raw(raw: RawRecord, facets: ProductFacets) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            price: raw.price,
            image: raw.image,
            category: raw.category,
            facets,
        }
    }

    pub fn facet(&self, facet: Facet) -> &str {
        self.facets.value(facet)
    }

    pub fn in_stock(&self) -> bool {
        !self.facets.out_of_stock
    }
}
