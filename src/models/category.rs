//! Category taxonomy
//!
//! Single source of truth for the fixed category set. Both the write
//! boundary (submission, import) and the statistics breakdowns consume
//! this enum, so the key set of every report is stable across calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed municipal category taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Roads,
    RoadMaintenance,
    GreenSpaces,
    Parks,
    PublicOrder,
    TrafficEnforcement,
    TrafficSafety,
    Parking,
    CyclePaths,
    Sidewalks,
    PublicTransport,
    BusStops,
    Water,
    Culture,
    Sports,
    SocialServices,
    Inspection,
    Advertising,
    InformationTechnology,
    Miscellaneous,
    Other,
}

impl Category {
    /// All categories in the fixed iteration order used for breakdowns
    /// and tie-breaking.
    pub const ALL: [Category; 21] = [
        Category::Roads,
        Category::RoadMaintenance,
        Category::GreenSpaces,
        Category::Parks,
        Category::PublicOrder,
        Category::TrafficEnforcement,
        Category::TrafficSafety,
        Category::Parking,
        Category::CyclePaths,
        Category::Sidewalks,
        Category::PublicTransport,
        Category::BusStops,
        Category::Water,
        Category::Culture,
        Category::Sports,
        Category::SocialServices,
        Category::Inspection,
        Category::Advertising,
        Category::InformationTechnology,
        Category::Miscellaneous,
        Category::Other,
    ];

    /// Stable slug used in JSON payloads and the store file
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Roads => "roads",
            Category::RoadMaintenance => "road-maintenance",
            Category::GreenSpaces => "green-spaces",
            Category::Parks => "parks",
            Category::PublicOrder => "public-order",
            Category::TrafficEnforcement => "traffic-enforcement",
            Category::TrafficSafety => "traffic-safety",
            Category::Parking => "parking",
            Category::CyclePaths => "cycle-paths",
            Category::Sidewalks => "sidewalks",
            Category::PublicTransport => "public-transport",
            Category::BusStops => "bus-stops",
            Category::Water => "water",
            Category::Culture => "culture",
            Category::Sports => "sports",
            Category::SocialServices => "social-services",
            Category::Inspection => "inspection",
            Category::Advertising => "advertising",
            Category::InformationTechnology => "information-technology",
            Category::Miscellaneous => "miscellaneous",
            Category::Other => "other",
        }
    }

    /// Human-readable label for terminal output
    pub fn label(&self) -> &'static str {
        match self {
            Category::Roads => "Roads",
            Category::RoadMaintenance => "Road maintenance",
            Category::GreenSpaces => "Trees and green spaces",
            Category::Parks => "Parks",
            Category::PublicOrder => "Public order",
            Category::TrafficEnforcement => "Traffic enforcement",
            Category::TrafficSafety => "Traffic calming and safety",
            Category::Parking => "Stationary traffic",
            Category::CyclePaths => "Cycle paths",
            Category::Sidewalks => "Footpaths and sidewalks",
            Category::PublicTransport => "Public transport",
            Category::BusStops => "Bus stops",
            Category::Water => "Water supply",
            Category::Culture => "Culture",
            Category::Sports => "Sports facilities",
            Category::SocialServices => "Social services and health",
            Category::Inspection => "Inspection services",
            Category::Advertising => "Advertising",
            Category::InformationTechnology => "Information technology",
            Category::Miscellaneous => "Miscellaneous",
            Category::Other => "Other",
        }
    }

    /// Normalize free-form input to a category.
    ///
    /// Unrecognized values map to `Other`; raw strings are never stored.
    pub fn normalize(input: &str) -> Category {
        let needle = input.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle) || c.label().eq_ignore_ascii_case(needle))
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_slugs_are_distinct() {
        let mut slugs: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), Category::ALL.len());
    }

    #[test]
    fn test_normalize_known_slug() {
        assert_eq!(Category::normalize("roads"), Category::Roads);
        assert_eq!(Category::normalize("  Public-Order "), Category::PublicOrder);
        assert_eq!(Category::normalize("Cycle paths"), Category::CyclePaths);
        assert_eq!(Category::normalize("traffic-enforcement"), Category::TrafficEnforcement);
    }

    #[test]
    fn test_taxonomy_is_complete() {
        assert_eq!(Category::ALL.len(), 21);
    }

    #[test]
    fn test_normalize_unknown_maps_to_other() {
        assert_eq!(Category::normalize("potholes on mars"), Category::Other);
        assert_eq!(Category::normalize(""), Category::Other);
    }

    #[test]
    fn test_serde_roundtrip_uses_slug() {
        let json = serde_json::to_string(&Category::GreenSpaces).unwrap();
        assert_eq!(json, "\"green-spaces\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::GreenSpaces);
    }
}
