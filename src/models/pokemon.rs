use std::fmt;

use serde::{Deserialize, Serialize};

use super::{deserialize_null_default, deserialize_nullable_string};

/// One row of the read-only `pokemon` reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokedexEntry {
    pub id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub description: String,
}

impl PokedexEntry {
    /// Case-insensitive match on name, any type tag, or the decimal id.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .types
                .iter()
                .any(|t| t.to_lowercase().contains(needle))
            || self.id.to_string().contains(needle)
    }
}

/// Regions linked from the home page.
pub const KNOWN_REGIONS: [&str; 9] = [
    "kanto", "johto", "hoenn", "sinnoh", "unova", "kalos", "alola", "galar", "paldea",
];

const DEFAULT_REGION: &str = "kanto";

/// The region label selected by the `region` query parameter.
///
/// Only a label: the Pokédex shows every entry whatever region is selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region(String);

impl Region {
    /// Read the label from an optional query parameter. Absent or empty
    /// selects the default region; any other value is kept as given.
    pub fn from_query(param: Option<&str>) -> Self {
        match param {
            Some(value) if !value.is_empty() => Region(value.to_string()),
            _ => Region::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        KNOWN_REGIONS.contains(&self.0.as_str())
    }

    /// Capitalized label for headings ("kanto" -> "Kanto").
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region(DEFAULT_REGION.to_string())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulbasaur() -> PokedexEntry {
        PokedexEntry {
            id: 1,
            name: "Bulbasaur".to_string(),
            types: vec!["grass".to_string(), "poison".to_string()],
            description: "A strange seed was planted on its back at birth.".to_string(),
        }
    }

    #[test]
    fn test_matches_name_type_and_id() {
        let entry = bulbasaur();
        assert!(entry.matches_lowercase("bulba"));
        assert!(entry.matches_lowercase("poison"));
        assert!(entry.matches_lowercase("1"));
        assert!(!entry.matches_lowercase("fire"));
    }

    #[test]
    fn test_deserialize_null_types() {
        let entry: PokedexEntry =
            serde_json::from_str(r#"{"id": 132, "name": "Ditto", "types": null, "description": null}"#)
                .unwrap();
        assert!(entry.types.is_empty());
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_region_defaults_to_kanto() {
        assert_eq!(Region::from_query(None).as_str(), "kanto");
        assert_eq!(Region::from_query(Some("")).as_str(), "kanto");
        assert_eq!(Region::from_query(Some("johto")).as_str(), "johto");
    }

    #[test]
    fn test_unknown_region_is_kept_as_label() {
        let region = Region::from_query(Some("orre"));
        assert_eq!(region.as_str(), "orre");
        assert!(!region.is_known());
        assert!(Region::default().is_known());
    }

    #[test]
    fn test_region_display_name() {
        assert_eq!(Region::from_query(Some("paldea")).display_name(), "Paldea");
    }
}
