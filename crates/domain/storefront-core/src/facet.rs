use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multi-select product attribute. Declaration order is the filter panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    IdealFor,
    Occasion,
    Work,
    Fabric,
    Segment,
    SuitableFor,
    RawMaterials,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFacetError {
    #[error("unknown facet '{0}'")]
    Unknown(String),
}

impl Facet {
    pub const ALL: [Facet; 8] = [
        Facet::IdealFor,
        Facet::Occasion,
        Facet::Work,
        Facet::Fabric,
        Facet::Segment,
        Facet::SuitableFor,
        Facet::RawMaterials,
        Facet::Pattern,
    ];

    /// Wire name, as used in JSON filter payloads.
    pub fn name(self) -> &'static str {
        match self {
            Facet::IdealFor => "idealFor",
            Facet::Occasion => "occasion",
            Facet::Work => "work",
            Facet::Fabric => "fabric",
            Facet::Segment => "segment",
            Facet::SuitableFor => "suitableFor",
            Facet::RawMaterials => "rawMaterials",
            Facet::Pattern => "pattern",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Facet::IdealFor => "IDEAL FOR",
            Facet::Occasion => "OCCASION",
            Facet::Work => "WORK",
            Facet::Fabric => "FABRIC",
            Facet::Segment => "SEGMENT",
            Facet::SuitableFor => "SUITABLE FOR",
            Facet::RawMaterials => "RAW MATERIALS",
            Facet::Pattern => "PATTERN",
        }
    }

    /// Enumeration table for the facet. Enrichment indexes into it by position,
    /// so the order here is part of the catalog's observable output.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Facet::IdealFor => &["Men", "Women", "Baby & Kids"],
            Facet::Occasion => &["Casual", "Formal", "Business"],
            Facet::Work => &["Embroidery", "Print", "Handloom"],
            Facet::Fabric => &["Cotton", "Silk", "Wool", "Synthetic"],
            Facet::Segment => &["Premium", "Mid-range", "Budget"],
            Facet::SuitableFor => &["Daily Wear", "Party Wear", "Office Wear", "Outdoor Activities"],
            Facet::RawMaterials => &["Organic", "Recycled", "Natural", "Synthetic"],
            Facet::Pattern => &["Solid", "Striped", "Checkered", "Printed", "Floral"],
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts `idealFor`, `ideal-for`, `ideal_for` and any casing thereof.
impl FromStr for Facet {
    type Err = ParseFacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Facet::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(&key))
            .ok_or_else(|| ParseFacetError::Unknown(s.to_string()))
    }
}
