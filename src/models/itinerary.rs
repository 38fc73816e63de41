use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trip intensity selected by the user. Controls how many activities are
/// packed into a day and how long each visit runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    #[default]
    Balanced,
    Intense,
}

impl Pace {
    /// Parse a user-supplied label. Accepts the legacy Chinese labels the
    /// upstream dataset uses; anything unrecognized falls back to balanced.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "relaxed" | "佛系" => Pace::Relaxed,
            "balanced" | "中庸" => Pace::Balanced,
            "intense" | "硬核" => Pace::Intense,
            _ => Pace::Balanced,
        }
    }

    pub fn activities_per_day(&self) -> usize {
        match self {
            Pace::Relaxed => 2,
            Pace::Balanced => 3,
            Pace::Intense => 4,
        }
    }

    /// Dwell-time scaling: relaxed trips linger, intense trips rush.
    pub fn duration_multiplier(&self) -> f64 {
        match self {
            Pace::Relaxed => 1.3,
            Pace::Balanced => 1.0,
            Pace::Intense => 0.7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pace::Relaxed => "relaxed",
            Pace::Balanced => "balanced",
            Pace::Intense => "intense",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Driving,
    Walking,
    Transit,
    Bicycling,
    Taxi,
}

impl TransportMode {
    /// Parse a user-supplied label. Unknown modes normalize to transit,
    /// whose 30 km/h is the fallback speed for unrecognized transport.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "driving" => TransportMode::Driving,
            "walking" => TransportMode::Walking,
            "transit" => TransportMode::Transit,
            "bicycling" => TransportMode::Bicycling,
            "taxi" => TransportMode::Taxi,
            _ => TransportMode::Transit,
        }
    }

    /// Average speed used for inter-POI travel-time estimates (km/h).
    pub fn speed_kmh(&self) -> f64 {
        match self {
            TransportMode::Driving => 50.0,
            TransportMode::Walking => 5.0,
            TransportMode::Transit => 30.0,
            TransportMode::Bicycling => 15.0,
            TransportMode::Taxi => 45.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Driving => "driving",
            TransportMode::Walking => "walking",
            TransportMode::Transit => "transit",
            TransportMode::Bicycling => "bicycling",
            TransportMode::Taxi => "taxi",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Format a minute-of-day value as zero-padded "HH:MM".
/// Late schedules can run past midnight and format as "25:30" etc.
pub fn format_minutes(total_minutes: u32) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// A POI scheduled into a concrete time slot within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    pub description: String,
    pub rating: f64,
    pub price_range: String,
    pub price_estimate: f64,
    pub tags: Vec<String>,
    /// 1-based position within the day; unique after merge.
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_number: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_night: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Provenance of a returned itinerary, so callers can tell a fully enriched
/// plan from a degraded or data-less one without treating either as failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ItinerarySource {
    /// Deterministic plan built from real POI data, no LLM involvement.
    Baseline,
    /// Baseline successfully enhanced by the two-stage LLM pass.
    LlmSplit,
    /// LLM enhancement failed; the deterministic baseline was returned.
    Fallback,
    /// No POI data was available; a generic outline was produced.
    Placeholder,
}

impl fmt::Display for ItinerarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItinerarySource::Baseline => "baseline",
            ItinerarySource::LlmSplit => "llm-split",
            ItinerarySource::Fallback => "fallback",
            ItinerarySource::Placeholder => "placeholder",
        };
        write!(f, "{}", s)
    }
}

/// The externally visible artifact. A value type: always handed out as an
/// independent copy, never aliased with cached state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub city: String,
    pub total_days: u32,
    pub pace: Pace,
    pub transport_mode: TransportMode,
    pub source: ItinerarySource,
    pub llm_enhanced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_hotels: Vec<Hotel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
    pub days: Vec<DayPlan>,
}

/// Parameters for one planning request, as received from the caller.
/// Labels stay raw strings here; they are normalized when the pipeline runs.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub city: String,
    pub days: u32,
    pub preferences: Vec<String>,
    pub pace: String,
    pub transport_mode: String,
    pub priority: String,
}

impl PlanRequest {
    pub fn new(
        city: impl Into<String>,
        days: u32,
        preferences: &[&str],
        pace: &str,
        transport_mode: &str,
        priority: &str,
    ) -> Self {
        PlanRequest {
            city: city.into(),
            days,
            preferences: preferences.iter().map(|p| p.to_string()).collect(),
            pace: pace.to_string(),
            transport_mode: transport_mode.to_string(),
            priority: priority.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.city.trim().is_empty() {
            return Err("city must not be empty".to_string());
        }
        if self.days < 1 {
            return Err("days must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Normalized cache key for a planning request. Two logically identical
/// requests (casing or preference-order differences only) must produce
/// identical fingerprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanFingerprint {
    pub city: String,
    pub days: u32,
    pub preferences: Vec<String>,
    pub pace: &'static str,
    pub transport_mode: &'static str,
    pub priority: String,
}

impl PlanFingerprint {
    pub fn from_request(request: &PlanRequest) -> Self {
        let mut preferences: Vec<String> = request
            .preferences
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        preferences.sort();
        preferences.dedup();

        PlanFingerprint {
            city: request.city.trim().to_lowercase(),
            days: request.days,
            preferences,
            pace: Pace::from_label(&request.pace).label(),
            transport_mode: TransportMode::from_label(&request.transport_mode).label(),
            priority: request.priority.trim().to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pace_from_label() {
        assert_eq!(Pace::from_label("relaxed"), Pace::Relaxed);
        assert_eq!(Pace::from_label("佛系"), Pace::Relaxed);
        assert_eq!(Pace::from_label("INTENSE"), Pace::Intense);
        assert_eq!(Pace::from_label("硬核"), Pace::Intense);
        assert_eq!(Pace::from_label("中庸"), Pace::Balanced);
        // Unknown labels fall back to balanced
        assert_eq!(Pace::from_label("warp-speed"), Pace::Balanced);
    }

    #[test]
    fn test_pace_tables() {
        assert_eq!(Pace::Relaxed.activities_per_day(), 2);
        assert_eq!(Pace::Balanced.activities_per_day(), 3);
        assert_eq!(Pace::Intense.activities_per_day(), 4);
        assert_eq!(Pace::Relaxed.duration_multiplier(), 1.3);
        assert_eq!(Pace::Balanced.duration_multiplier(), 1.0);
        assert_eq!(Pace::Intense.duration_multiplier(), 0.7);
    }

    #[test]
    fn test_transport_mode_speeds() {
        assert_eq!(TransportMode::Driving.speed_kmh(), 50.0);
        assert_eq!(TransportMode::Walking.speed_kmh(), 5.0);
        assert_eq!(TransportMode::Transit.speed_kmh(), 30.0);
        assert_eq!(TransportMode::Bicycling.speed_kmh(), 15.0);
        assert_eq!(TransportMode::Taxi.speed_kmh(), 45.0);
    }

    #[test]
    fn test_unknown_transport_mode_defaults_to_transit_speed() {
        let mode = TransportMode::from_label("hovercraft");
        assert_eq!(mode.speed_kmh(), 30.0);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(540), "09:00");
        assert_eq!(format_minutes(605), "10:05");
        assert_eq!(format_minutes(0), "00:00");
        // Schedules may run past midnight
        assert_eq!(format_minutes(1530), "25:30");
    }

    #[test]
    fn test_itinerary_source_serialization() {
        let json = serde_json::to_value(ItinerarySource::LlmSplit).unwrap();
        assert_eq!(json, "llm-split");
        assert_eq!(ItinerarySource::Placeholder.to_string(), "placeholder");
    }

    #[test]
    fn test_plan_request_validation() {
        let mut req = PlanRequest::new("Beijing", 2, &["culture"], "balanced", "driving", "");
        assert!(req.validate().is_ok());

        req.days = 0;
        assert!(req.validate().is_err());

        req.days = 2;
        req.city = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_fingerprint_normalization() {
        let a = PlanRequest::new(
            "Beijing",
            2,
            &["Culture", "history"],
            "balanced",
            "driving",
            "efficiency",
        );
        let b = PlanRequest::new(
            "  BEIJING ",
            2,
            &["history", "culture", "HISTORY"],
            "中庸",
            "DRIVING",
            "Efficiency",
        );

        assert_eq!(
            PlanFingerprint::from_request(&a),
            PlanFingerprint::from_request(&b)
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_different_requests() {
        let a = PlanRequest::new("Beijing", 2, &["culture"], "balanced", "driving", "");
        let b = PlanRequest::new("Beijing", 3, &["culture"], "balanced", "driving", "");
        let c = PlanRequest::new("Shanghai", 2, &["culture"], "balanced", "driving", "");

        assert_ne!(
            PlanFingerprint::from_request(&a),
            PlanFingerprint::from_request(&b)
        );
        assert_ne!(
            PlanFingerprint::from_request(&a),
            PlanFingerprint::from_request(&c)
        );
    }
}
