//! The filter engine: a pure function from `(catalog, filters)` to the visible products.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Facet, Product};

/// The user's selection criteria. Edits return a new value; a `FilterSet` is
/// never changed in place once handed to the coordinator.
///
/// Facets without a selection are absent from `selections`, so two sets that
/// constrain the same things compare equal. Deserialization keeps this: empty
/// value sets are dropped and unknown facet names are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    #[serde(default, deserialize_with = "lenient_selections")]
    selections: BTreeMap<Facet, BTreeSet<String>>,
    #[serde(default)]
    availability: bool,
    #[serde(default)]
    customizable: bool,
}

impl FilterSet {
    /// Builds a filter set from loosely typed `(facet, value)` pairs, such as
    /// query parameters. Unknown facet names impose no constraint.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut out = FilterSet::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            let value: String = value.into();
            match key.to_ascii_lowercase().as_str() {
                "availability" | "in-stock" | "instock" => out.availability = parse_flag(&value),
                "customizable" => out.customizable = parse_flag(&value),
                _ => match key.parse::<Facet>() {
                    Ok(facet) if !value.is_empty() => {
                        out.selections.entry(facet).or_default().insert(value);
                    }
                    Ok(_) => {}
                    Err(e) => debug!("ignoring filter: {e}"),
                },
            }
        }
        out
    }

    pub fn selection(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.selections.get(&facet)
    }

    pub fn is_selected(&self, facet: Facet, value: &str) -> bool {
        self.selection(facet).is_some_and(|s| s.contains(value))
    }

    pub fn availability(&self) -> bool {
        self.availability
    }

    pub fn customizable(&self) -> bool {
        self.customizable
    }

    /// Facets that currently restrict the result, in panel order.
    pub fn active_facets(&self) -> impl Iterator<Item = Facet> + '_ {
        self.selections.keys().copied()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.selections.is_empty() && !self.availability && !self.customizable
    }

    pub fn with_selection<I, V>(&self, facet: Facet, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !v.is_empty())
            .collect();
        let mut next = self.clone();
        if values.is_empty() {
            next.selections.remove(&facet);
        } else {
            next.selections.insert(facet, values);
        }
        next
    }

    pub fn select(&self, facet: Facet, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return self.clone();
        }
        let mut next = self.clone();
        next.selections.entry(facet).or_default().insert(value);
        next
    }

    /// Panel click semantics: the empty string is the "All" option and clears
    /// the facet; any other value is added if absent and removed if present.
    pub fn toggle(&self, facet: Facet, value: &str) -> Self {
        if value.is_empty() {
            return self.clear(facet);
        }
        let mut next = self.clone();
        let set = next.selections.entry(facet).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        if set.is_empty() {
            next.selections.remove(&facet);
        }
        next
    }

    pub fn clear(&self, facet: Facet) -> Self {
        let mut next = self.clone();
        next.selections.remove(&facet);
        next
    }

    pub fn with_availability(&self, in_stock_only: bool) -> Self {
        Self {
            availability: in_stock_only,
            ..self.clone()
        }
    }

    pub fn with_customizable(&self, customizable_only: bool) -> Self {
        Self {
            customizable: customizable_only,
            ..self.clone()
        }
    }
}

fn lenient_selections<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<Facet, BTreeSet<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, BTreeSet<String>>::deserialize(deserializer)?;
    let mut out = BTreeMap::new();
    for (key, values) in raw {
        let facet = match key.parse::<Facet>() {
            Ok(facet) => facet,
            Err(e) => {
                debug!("ignoring filter: {e}");
                continue;
            }
        };
        let values: BTreeSet<String> = values.into_iter().filter(|v| !v.is_empty()).collect();
        if !values.is_empty() {
            out.insert(facet, values);
        }
    }
    Ok(out)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// True when `product` satisfies every active constraint of `filters`.
pub fn matches(product: &Product, filters: &FilterSet) -> bool {
    if filters.availability && product.facets.out_of_stock {
        return false;
    }
    if filters.customizable && !product.facets.customizable {
        return false;
    }
    filters
        .selections
        .iter()
        .all(|(facet, selected)| {
            selected.is_empty() || selected.contains(product.facet(*facet))
        })
}

/// Products of `catalog` matching `filters`, in catalog order.
pub fn apply(catalog: &[Product], filters: &FilterSet) -> Vec<Product> {
    catalog
        .iter()
        .filter(|p| matches(p, filters))
        .cloned()
        .collect()
}

/// Number of catalog products carrying each value of `facet`, in table order.
pub fn facet_counts(catalog: &[Product], facet: Facet) -> Vec<(&'static str, usize)> {
    facet
        .options()
        .iter()
        .map(|opt| {
            let n = catalog.iter().filter(|p| p.facet(facet) == *opt).count();
            (*opt, n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let f = FilterSet::default().toggle(Facet::Fabric, "Silk");
        assert!(f.is_selected(Facet::Fabric, "Silk"));

        let f = f.toggle(Facet::Fabric, "Silk");
        assert!(f.selection(Facet::Fabric).is_none());
        assert_eq!(f, FilterSet::default());
    }

    #[test]
    fn toggle_all_clears_facet() {
        let f = FilterSet::default()
            .select(Facet::Pattern, "Solid")
            .select(Facet::Pattern, "Floral")
            .toggle(Facet::Pattern, "");
        assert!(f.is_unconstrained());
    }

    #[test]
    fn edits_leave_original_untouched() {
        let base = FilterSet::default().select(Facet::Occasion, "Formal");
        let edited = base.with_availability(true).clear(Facet::Occasion);
        assert!(base.is_selected(Facet::Occasion, "Formal"));
        assert!(!base.availability());
        assert!(edited.availability());
        assert!(edited.selection(Facet::Occasion).is_none());
    }

    #[test]
    fn from_pairs_ignores_unknown_facets() {
        let f = FilterSet::from_pairs([
            ("fabric", "Cotton"),
            ("colour", "Red"),
            ("in-stock", "true"),
            ("ideal-for", "Women"),
        ]);
        assert!(f.is_selected(Facet::Fabric, "Cotton"));
        assert!(f.is_selected(Facet::IdealFor, "Women"));
        assert!(f.availability());
        assert!(!f.customizable());
        assert_eq!(f.active_facets().count(), 2);
    }

    #[test]
    fn serde_round_trips_wire_shape() {
        let f = FilterSet::default()
            .select(Facet::SuitableFor, "Party Wear")
            .with_customizable(true);
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["selections"]["suitableFor"][0], "Party Wear");
        assert_eq!(json["customizable"], true);

        let back: FilterSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn empty_selection_from_json_is_unconstrained() {
        let f: FilterSet =
            serde_json::from_str(r#"{"selections":{"fabric":[],"pattern":[""]}}"#).unwrap();
        assert!(f.is_unconstrained());
        assert_eq!(f.active_facets().count(), 0);
        assert_eq!(f, FilterSet::default());

        let catalog = crate::generate_fallback(12);
        assert_eq!(apply(&catalog, &f).len(), 12);
    }

    #[test]
    fn unknown_facet_in_json_is_ignored() {
        let f: FilterSet = serde_json::from_str(
            r#"{"selections":{"colour":["Red"],"fabric":["Cotton"]},"availability":true}"#,
        )
        .unwrap();
        assert_eq!(f.active_facets().collect::<Vec<_>>(), vec![Facet::Fabric]);
        assert!(f.availability());

        let only_unknown: FilterSet =
            serde_json::from_str(r#"{"selections":{"colour":["Red"]}}"#).unwrap();
        assert!(only_unknown.is_unconstrained());
    }
}
