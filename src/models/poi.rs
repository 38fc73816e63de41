use crate::constants::{DEFAULT_ACTIVITY_RATING, DEFAULT_POI_DURATION_MINUTES};
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// A candidate attraction supplied by a POI source.
///
/// Source data is non-authoritative: fields may be missing or repeated, so
/// everything beyond the name has a serde default and `kind` is a free string
/// rather than an enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poi {
    pub name: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default = "default_price_range")]
    pub price_range: String,
    #[serde(default = "default_price_estimate")]
    pub price_estimate: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
}

fn default_kind() -> String {
    "culture".to_string()
}

fn default_rating() -> f64 {
    DEFAULT_ACTIVITY_RATING
}

fn default_price_range() -> String {
    "$".to_string()
}

fn default_price_estimate() -> f64 {
    50.0
}

fn default_duration() -> u32 {
    DEFAULT_POI_DURATION_MINUTES
}

impl Poi {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Poi {
            name: name.into(),
            kind: kind.into(),
            address: String::new(),
            coordinates: None,
            rating: default_rating(),
            price_range: default_price_range(),
            price_estimate: default_price_estimate(),
            tags: Vec::new(),
            duration_minutes: default_duration(),
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Coordinates::new(lat, lng).ok();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }
}
