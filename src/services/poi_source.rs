use crate::error::{AppError, Result};
use crate::models::Poi;
use async_trait::async_trait;
use std::collections::HashMap;

/// Supplies a ranked, best-first list of candidate POIs for a city.
/// Implementations may return an empty list; the planner degrades to a
/// placeholder itinerary rather than failing.
#[async_trait]
pub trait PoiSource: Send + Sync {
    async fn search(&self, city: &str, preferences: &[String]) -> Result<Vec<Poi>>;
}

/// Keep POIs whose type or tags match any preference (case-insensitive
/// substring match). When nothing matches, the unfiltered pool is returned:
/// preferences narrow the pool but never empty it out.
pub fn filter_by_preferences(pois: Vec<Poi>, preferences: &[String]) -> Vec<Poi> {
    if preferences.is_empty() {
        return pois;
    }

    let preferences_lower: Vec<String> = preferences
        .iter()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();
    if preferences_lower.is_empty() {
        return pois;
    }

    let filtered: Vec<Poi> = pois
        .iter()
        .filter(|poi| {
            let kind = poi.kind.to_lowercase();
            let tags: Vec<String> = poi.tags.iter().map(|t| t.to_lowercase()).collect();
            preferences_lower
                .iter()
                .any(|pref| kind.contains(pref) || tags.iter().any(|tag| tag.contains(pref)))
        })
        .cloned()
        .collect();

    if filtered.is_empty() {
        pois
    } else {
        filtered
    }
}

/// POI source backed by a bundled JSON dataset, used by the demo binary and
/// as an offline fallback when no live travel API is wired in.
pub struct JsonPoiSource {
    cities: HashMap<String, Vec<Poi>>,
}

impl JsonPoiSource {
    /// Load the dataset shipped with the crate.
    pub fn bundled() -> Self {
        // A parse failure here is a packaging bug, not missing data.
        Self::from_json(include_str!("../data/poi_data.json"))
            .expect("bundled poi_data.json must parse")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let cities: HashMap<String, Vec<Poi>> = serde_json::from_str(json)
            .map_err(|e| AppError::TravelData(format!("Failed to parse POI dataset: {}", e)))?;
        Ok(JsonPoiSource { cities })
    }

    /// City lookup tolerant of casing: tries the trimmed input, then
    /// Title Case, lowercase, and UPPERCASE variants.
    fn lookup(&self, city: &str) -> Option<&Vec<Poi>> {
        let normalized = city.trim();
        let candidates = [
            normalized.to_string(),
            title_case(normalized),
            normalized.to_lowercase(),
            normalized.to_uppercase(),
        ];
        candidates.iter().find_map(|key| self.cities.get(key))
    }
}

#[async_trait]
impl PoiSource for JsonPoiSource {
    async fn search(&self, city: &str, _preferences: &[String]) -> Result<Vec<Poi>> {
        Ok(self.lookup(city).cloned().unwrap_or_default())
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pois() -> Vec<Poi> {
        vec![
            Poi::new("Forbidden City", "history").with_tags(&["history", "architecture"]),
            Poi::new("798 Art Zone", "art").with_tags(&["art", "modern"]),
            Poi::new("Wangfujing", "shopping").with_tags(&["food", "shopping"]),
        ]
    }

    #[test]
    fn test_filter_matches_type_and_tags() {
        let prefs = vec!["history".to_string()];
        let filtered = filter_by_preferences(sample_pois(), &prefs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Forbidden City");

        let prefs = vec!["food".to_string()];
        let filtered = filter_by_preferences(sample_pois(), &prefs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Wangfujing");
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let prefs = vec!["HISTORY".to_string()];
        let filtered = filter_by_preferences(sample_pois(), &prefs);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_filter_falls_back_to_full_pool_when_nothing_matches() {
        let prefs = vec!["snorkeling".to_string()];
        let filtered = filter_by_preferences(sample_pois(), &prefs);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_filter_without_preferences_returns_all() {
        let filtered = filter_by_preferences(sample_pois(), &[]);
        assert_eq!(filtered.len(), 3);
    }

    #[tokio::test]
    async fn test_bundled_dataset_lookup_is_casing_tolerant() {
        let source = JsonPoiSource::bundled();

        let exact = source.search("Beijing", &[]).await.unwrap();
        assert!(!exact.is_empty());

        let lower = source.search("beijing", &[]).await.unwrap();
        assert_eq!(exact.len(), lower.len());

        let padded = source.search("  BEIJING  ", &[]).await.unwrap();
        assert_eq!(exact.len(), padded.len());
    }

    #[tokio::test]
    async fn test_unknown_city_returns_empty() {
        let source = JsonPoiSource::bundled();
        let pois = source.search("Atlantis", &[]).await.unwrap();
        assert!(pois.is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("beijing"), "Beijing");
        assert_eq!(title_case("NEW YORK"), "New York");
    }
}
