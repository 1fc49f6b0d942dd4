use storefront_core::{FilterSet, Product};

use crate::domain::{CatalogOrigin, RefreshId};

#[derive(Debug, Clone)]
pub enum DomainEvent {
    // Catalog
    RefreshStarted {
        refresh_id: RefreshId,
    },
    CatalogInstalled {
        refresh_id: RefreshId,
        products: Vec<Product>,
        origin: CatalogOrigin,
    },

    // Filters
    FiltersReplaced(FilterSet),
}
