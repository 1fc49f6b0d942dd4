use storefront_core::{Facet, FilterSet};

#[derive(Debug, Clone)]
pub enum AppCommand {
    // Catalog
    LoadCatalog,
    RefreshCatalog,

    // Filters
    SetFilters(FilterSet),
    ToggleFacetValue { facet: Facet, value: String },
    ClearFacet(Facet),
    SetAvailability(bool),
    SetCustomizable(bool),
    ResetFilters,
}
