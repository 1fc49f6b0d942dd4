use crate::{Facet, Product, ProductFacets, ProductId, RawRecord};

pub const FALLBACK_IMAGE: &str = "https://via.placeholder.com/150";
pub const FALLBACK_CATEGORIES: [&str; 4] = ["clothing", "electronics", "jewelry", "accessories"];

/// Maps a record's position in the source sequence to its derived facets.
///
/// The catalog API carries none of these attributes, so they are synthesized.
/// Swapping the strategy is how real metadata would replace the demo values.
pub trait Enrichment: Send + Sync {
    fn facets(&self, index: usize) -> ProductFacets;
}

/// Demo enrichment: every facet cycles through its table by `index % len`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuloEnrichment;

fn cycle(facet: Facet, index: usize) -> String {
    let table = facet.options();
    table[index % table.len()].to_string()
}

impl Enrichment for ModuloEnrichment {
    fn facets(&self, index: usize) -> ProductFacets {
        ProductFacets {
            ideal_for: cycle(Facet::IdealFor, index),
            occasion: cycle(Facet::Occasion, index),
            work: cycle(Facet::Work, index),
            fabric: cycle(Facet::Fabric, index),
            segment: cycle(Facet::Segment, index),
            suitable_for: cycle(Facet::SuitableFor, index),
            raw_materials: cycle(Facet::RawMaterials, index),
            pattern: cycle(Facet::Pattern, index),
            new: index % 5 == 0,
            out_of_stock: index % 7 == 0,
            customizable: index % 2 == 0,
        }
    }
}

pub fn normalize(raw: Vec<RawRecord>) -> Vec<Product> {
    normalize_with(&ModuloEnrichment, raw)
}

/// Enriches records in order. Nothing is validated here; decoding problems are
/// dealt with by the catalog adapter before records reach this point.
pub fn normalize_with<E>(enrichment: &E, raw: impl IntoIterator<Item = RawRecord>) -> Vec<Product>
where
    E: Enrichment + ?Sized,
{
    raw.into_iter()
        .enumerate()
        .map(|(i, rec)| Product::from_raw(rec, enrichment.facets(i)))
        .collect()
}

/// Synthetic catalog used when the source is unavailable. Ids run `1..=count`.
pub fn generate_fallback(count: usize) -> Vec<Product> {
    generate_fallback_with(&ModuloEnrichment, count)
}

pub fn generate_fallback_with<E>(enrichment: &E, count: usize) -> Vec<Product>
where
    E: Enrichment + ?Sized,
{
    (0..count)
        .map(|i| {
            let raw = RawRecord {
                id: ProductId::Num(i as u64 + 1),
                title: format!("Fallback Product {}", i + 1),
                price: 19.99 + 10.0 * i as f64,
                image: FALLBACK_IMAGE.to_string(),
                category: FALLBACK_CATEGORIES[i % FALLBACK_CATEGORIES.len()].to_string(),
            };
            Product::from_raw(raw, enrichment.facets(i))
        })
        .collect()
}
