//! City catalog and continent grouping.
//!
//! The catalog is read-only during a tour computation and preserves insertion
//! order so that greedy tie-breaks are reproducible. When loading from a JSON
//! object (unordered), city ids are sorted lexicographically to pin the order.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use serde::Deserialize;

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn as_pair(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// A single city record, keyed in the catalog by its id (airport/city code).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(rename = "contId")]
    pub continent_id: String,
    pub location: Location,
}

/// Insertion-ordered mapping from city id to [`City`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    ids: Vec<String>,
    cities: HashMap<String, City>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a city, keeping first-insertion order. Re-inserting an existing
    /// id replaces the record without changing its position.
    pub fn insert(&mut self, id: impl Into<String>, city: City) {
        let id = id.into();
        if self.cities.insert(id.clone(), city).is_none() {
            self.ids.push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&City> {
        self.cities.get(id)
    }

    /// City ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Parse a catalog from the dataset wire format:
    /// `{"<ID>": {"name": ..., "contId": ..., "location": {"lat": ..., "lon": ...}}}`.
    ///
    /// JSON objects carry no reliable order, so ids are sorted before
    /// insertion to fix the iteration order.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: HashMap<String, City> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Load a catalog from a JSON dataset file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let records: HashMap<String, City> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(records))
    }

    fn from_records(records: HashMap<String, City>) -> Self {
        let mut ids: Vec<String> = records.keys().cloned().collect();
        ids.sort();

        let mut catalog = Self::new();
        for id in ids {
            let city = records[&id].clone();
            catalog.insert(id, city);
        }
        tracing::debug!(cities = catalog.len(), "catalog loaded");
        catalog
    }

    /// Bucket city ids by continent, in catalog order.
    ///
    /// Continents appear in first-seen order; cities within a continent keep
    /// their catalog order. Every listed continent has at least one city.
    pub fn continent_grouping(&self) -> ContinentGrouping {
        let mut grouping = ContinentGrouping::default();
        for id in self.ids() {
            grouping.push(&self.cities[id].continent_id, id);
        }
        grouping
    }
}

impl FromIterator<(String, City)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (String, City)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (id, city) in iter {
            catalog.insert(id, city);
        }
        catalog
    }
}

/// Insertion-ordered mapping from continent id to the city ids it contains.
///
/// "First-listed city" in the planner means the first id appended here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContinentGrouping {
    groups: Vec<(String, Vec<String>)>,
}

impl ContinentGrouping {
    fn push(&mut self, continent_id: &str, city_id: &str) {
        match self.groups.iter_mut().find(|(id, _)| id == continent_id) {
            Some((_, cities)) => cities.push(city_id.to_string()),
            None => self
                .groups
                .push((continent_id.to_string(), vec![city_id.to_string()])),
        }
    }

    /// City ids of a continent, in grouping order.
    pub fn cities(&self, continent_id: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(id, _)| id == continent_id)
            .map(|(_, cities)| cities.as_slice())
    }

    /// Remove a continent from the grouping, returning its city ids.
    pub fn remove(&mut self, continent_id: &str) -> Option<Vec<String>> {
        let position = self.groups.iter().position(|(id, _)| id == continent_id)?;
        Some(self.groups.remove(position).1)
    }

    /// Iterate `(continent id, city ids)` in grouping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(id, cities)| (id.as_str(), cities.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Dataset loading failure.
#[derive(Debug)]
pub enum CatalogError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err)
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read dataset: {err}"),
            CatalogError::Parse(err) => write!(f, "failed to parse dataset: {err}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Parse(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, continent: &str, lat: f64, lon: f64) -> City {
        City {
            name: name.to_string(),
            continent_id: continent.to_string(),
            location: Location::new(lat, lon),
        }
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut catalog = Catalog::new();
        catalog.insert("TYO", city("Tokyo", "asia", 35.68, 139.65));
        catalog.insert("BOM", city("Mumbai", "asia", 19.08, 72.88));
        catalog.insert("LON", city("London", "europe", 51.51, -0.13));

        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["TYO", "BOM", "LON"]);
    }

    #[test]
    fn test_reinsert_replaces_without_reordering() {
        let mut catalog = Catalog::new();
        catalog.insert("TYO", city("Tokio", "asia", 35.68, 139.65));
        catalog.insert("BOM", city("Mumbai", "asia", 19.08, 72.88));
        catalog.insert("TYO", city("Tokyo", "asia", 35.68, 139.65));

        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["TYO", "BOM"]);
        assert_eq!(catalog.get("TYO").unwrap().name, "Tokyo");
    }

    #[test]
    fn test_grouping_buckets_in_catalog_order() {
        let mut catalog = Catalog::new();
        catalog.insert("TYO", city("Tokyo", "asia", 35.68, 139.65));
        catalog.insert("LON", city("London", "europe", 51.51, -0.13));
        catalog.insert("BOM", city("Mumbai", "asia", 19.08, 72.88));

        let grouping = catalog.continent_grouping();
        let continents: Vec<&str> = grouping.iter().map(|(id, _)| id).collect();
        assert_eq!(continents, vec!["asia", "europe"]);
        assert_eq!(grouping.cities("asia").unwrap(), ["TYO", "BOM"]);
        assert_eq!(grouping.cities("europe").unwrap(), ["LON"]);
    }

    #[test]
    fn test_grouping_remove() {
        let mut catalog = Catalog::new();
        catalog.insert("TYO", city("Tokyo", "asia", 35.68, 139.65));
        catalog.insert("LON", city("London", "europe", 51.51, -0.13));

        let mut grouping = catalog.continent_grouping();
        assert_eq!(grouping.remove("asia"), Some(vec!["TYO".to_string()]));
        assert_eq!(grouping.remove("asia"), None);
        assert_eq!(grouping.len(), 1);
    }

    #[test]
    fn test_from_json_str_sorts_ids() {
        let json = r#"{
            "TYO": {"name": "Tokyo", "contId": "asia",
                    "location": {"lat": 35.68, "lon": 139.65}},
            "BOM": {"name": "Mumbai", "contId": "asia",
                    "location": {"lat": 19.08, "lon": 72.88}}
        }"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["BOM", "TYO"]);
        assert_eq!(catalog.get("BOM").unwrap().continent_id, "asia");
        assert_eq!(catalog.get("TYO").unwrap().location.lat, 35.68);
    }

    #[test]
    fn test_from_json_str_rejects_malformed() {
        assert!(matches!(
            Catalog::from_json_str("not json"),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            Catalog::from_json_str(r#"{"TYO": {"name": "Tokyo"}}"#),
            Err(CatalogError::Parse(_))
        ));
    }
}
