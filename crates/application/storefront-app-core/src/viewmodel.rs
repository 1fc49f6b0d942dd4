use std::cmp::Ordering;
use std::str::FromStr;

use storefront_core::{Facet, FilterSet, Product, ProductId};

use crate::domain::{CatalogOrigin, User, ViewState, ViewStatus};
use crate::wishlist::Wishlist;

pub const SIGN_IN_TO_SEE_PRICE: &str = "Sign in or create an account to see price";

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Recommended,
    PriceLowToHigh,
    PriceHighToLow,
    Newest,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order '{0}' (expected recommended, price-asc, price-desc or newest)")]
pub struct ParseSortError(String);

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Recommended,
        SortOrder::PriceLowToHigh,
        SortOrder::PriceHighToLow,
        SortOrder::Newest,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Recommended => "RECOMMENDED",
            SortOrder::PriceLowToHigh => "PRICE: LOW TO HIGH",
            SortOrder::PriceHighToLow => "PRICE: HIGH TO LOW",
            SortOrder::Newest => "NEWEST",
        }
    }

    /// Stable ordering of the visible products for display. `Recommended`
    /// keeps catalog order.
    pub fn arrange<'a>(self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut out: Vec<&Product> = products.iter().collect();
        match self {
            SortOrder::Recommended => {}
            SortOrder::PriceLowToHigh => out.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceHighToLow => out.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOrder::Newest => out.sort_by(|a, b| match (a.facets.new, b.facets.new) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }),
        }
        out
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recommended" | "" => Ok(SortOrder::Recommended),
            "price-asc" | "price-low-to-high" | "price" => Ok(SortOrder::PriceLowToHigh),
            "price-desc" | "price-high-to-low" => Ok(SortOrder::PriceHighToLow),
            "newest" | "new" => Ok(SortOrder::Newest),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductCardVm {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub category: String,
    pub price_label: String,
    pub badges: Vec<&'static str>,
    pub is_favorite: bool,
}

impl ProductCardVm {
    pub fn new(product: &Product, user: Option<&User>, wishlist: &Wishlist) -> Self {
        let mut badges = Vec::new();
        if product.facets.new {
            badges.push("NEW");
        }
        if product.facets.out_of_stock {
            badges.push("OUT OF STOCK");
        }
        if product.facets.customizable {
            badges.push("CUSTOMIZABLE");
        }

        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            price_label: match user {
                Some(_) => format_price(product.price),
                None => SIGN_IN_TO_SEE_PRICE.to_string(),
            },
            badges,
            // Favourites are only shown to a signed-in user.
            is_favorite: user.is_some() && wishlist.contains(&product.id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogVm {
    pub status_label: String,
    pub origin_label: Option<String>,
    pub sort_label: &'static str,
    pub total: usize,
    pub visible_count: usize,
    pub active_filters: Vec<String>,
    pub cards: Vec<ProductCardVm>,
}

fn describe_filters(filters: &FilterSet) -> Vec<String> {
    let mut out: Vec<String> = Facet::ALL
        .into_iter()
        .filter_map(|facet| {
            filters.selection(facet).map(|values| {
                let joined: Vec<&str> = values.iter().map(String::as_str).collect();
                format!("{}: {}", facet.label(), joined.join(", "))
            })
        })
        .collect();
    if filters.availability() {
        out.push("IN STOCK ONLY".into());
    }
    if filters.customizable() {
        out.push("CUSTOMIZABLE".into());
    }
    out
}

pub fn catalog_vm(
    state: &ViewState,
    sort: SortOrder,
    user: Option<&User>,
    wishlist: &Wishlist,
) -> CatalogVm {
    let status_label = match state.status {
        ViewStatus::Loading => "Loading products…".to_string(),
        ViewStatus::Ready => format!("{} of {} ITEMS", state.visible.len(), state.catalog.len()),
    };

    let origin_label = match &state.origin {
        Some(CatalogOrigin::Fallback { .. }) => {
            Some("Showing offline catalog (product source unavailable)".to_string())
        }
        _ => None,
    };

    CatalogVm {
        status_label,
        origin_label,
        sort_label: sort.label(),
        total: state.catalog.len(),
        visible_count: state.visible.len(),
        active_filters: describe_filters(&state.filters),
        cards: sort
            .arrange(&state.visible)
            .into_iter()
            .map(|p| ProductCardVm::new(p, user, wishlist))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storefront_core::{filter, generate_fallback};

    fn ready_state(filters: FilterSet) -> ViewState {
        let catalog = generate_fallback(12);
        ViewState {
            status: ViewStatus::Ready,
            visible: filter::apply(&catalog, &filters),
            catalog: catalog.into(),
            filters,
            origin: Some(CatalogOrigin::Source),
            ..ViewState::default()
        }
    }

    fn ada() -> User {
        User {
            name: "ada".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn price_hidden_until_signed_in() {
        let p = &generate_fallback(1)[0];
        let anon = ProductCardVm::new(p, None, &Wishlist::default());
        assert_eq!(anon.price_label, SIGN_IN_TO_SEE_PRICE);

        let user = ada();
        let card = ProductCardVm::new(p, Some(&user), &Wishlist::default());
        assert_eq!(card.price_label, "$19.99");
    }

    #[test]
    fn badges_follow_flags() {
        // Index 0 is new, out of stock and customizable.
        let p = &generate_fallback(1)[0];
        let card = ProductCardVm::new(p, None, &Wishlist::default());
        assert_eq!(card.badges, vec!["NEW", "OUT OF STOCK", "CUSTOMIZABLE"]);
    }

    #[test]
    fn favourite_requires_user() {
        let p = &generate_fallback(1)[0];
        let mut list = Wishlist::default();
        list.toggle(p, Utc::now());
        assert!(!ProductCardVm::new(p, None, &list).is_favorite);
        assert!(ProductCardVm::new(p, Some(&ada()), &list).is_favorite);
    }

    #[test]
    fn sorting_does_not_touch_visible_set() {
        let state = ready_state(FilterSet::default().with_availability(true));
        let before = state.visible.clone();
        let vm = catalog_vm(&state, SortOrder::PriceHighToLow, None, &Wishlist::default());

        assert_eq!(state.visible, before);
        assert_eq!(vm.visible_count, 10);
        assert_eq!(vm.cards.first().unwrap().id, ProductId::Num(12));
        assert_eq!(vm.status_label, "10 of 12 ITEMS");
    }

    #[test]
    fn newest_first_is_stable() {
        let state = ready_state(FilterSet::default());
        let vm = catalog_vm(&state, SortOrder::Newest, None, &Wishlist::default());
        let ids: Vec<_> = vm.cards.iter().take(4).map(|c| c.id.clone()).collect();
        // New at indices 0, 5, 10 (ids 1, 6, 11), then catalog order.
        assert_eq!(
            ids,
            vec![
                ProductId::Num(1),
                ProductId::Num(6),
                ProductId::Num(11),
                ProductId::Num(2)
            ]
        );
    }

    #[test]
    fn active_filters_are_described() {
        let filters = FilterSet::default()
            .select(Facet::Fabric, "Silk")
            .select(Facet::Fabric, "Cotton")
            .with_availability(true);
        let state = ready_state(filters);
        let vm = catalog_vm(&state, SortOrder::default(), None, &Wishlist::default());
        assert_eq!(vm.active_filters, vec!["FABRIC: Cotton, Silk", "IN STOCK ONLY"]);
    }

    #[test]
    fn parses_sort_names() {
        assert_eq!("price-asc".parse(), Ok(SortOrder::PriceLowToHigh));
        assert_eq!("Newest".parse(), Ok(SortOrder::Newest));
        assert!("popular".parse::<SortOrder>().is_err());
    }

    #[test]
    fn loading_state_label() {
        let vm = catalog_vm(
            &ViewState::default(),
            SortOrder::default(),
            None,
            &Wishlist::default(),
        );
        assert_eq!(vm.status_label, "Loading products…");
        assert!(vm.cards.is_empty());
    }
}
