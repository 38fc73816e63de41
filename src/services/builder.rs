use crate::constants::{
    DEFAULT_ACTIVITY_RATING, PLACEHOLDER_ACTIVITY_DURATION_MINUTES,
    PLACEHOLDER_PRICE_ESTIMATE_BASE,
};
use crate::models::{
    format_minutes, Activity, DayPlan, Itinerary, ItinerarySource, Pace, Poi, TransportMode,
};
use crate::services::scheduler::DayScheduler;

/// Builds the deterministic baseline itinerary: one `DayPlan` per requested
/// day, consuming the POI pool cyclically so a small pool is reused rather
/// than exhausted. An empty pool produces a placeholder itinerary so the
/// pipeline always returns a structurally valid result.
pub struct ItineraryBuilder {
    pace: Pace,
    transport_mode: TransportMode,
}

impl ItineraryBuilder {
    pub fn new(pace: Pace, transport_mode: TransportMode) -> Self {
        ItineraryBuilder {
            pace,
            transport_mode,
        }
    }

    pub fn build(&self, city: &str, days: u32, preferences: &[String], pois: &[Poi]) -> Itinerary {
        if pois.is_empty() {
            tracing::warn!(city, "No POI data available, building placeholder itinerary");
            return self.placeholder_itinerary(city, days, preferences);
        }

        let scheduler = DayScheduler::new(self.pace, self.transport_mode);
        let per_day = self.pace.activities_per_day().min(pois.len());
        let mut poi_index = 0usize;

        let day_plans: Vec<DayPlan> = (1..=days)
            .map(|day_number| {
                let slice: Vec<Poi> = (0..per_day)
                    .map(|offset| pois[(poi_index + offset) % pois.len()].clone())
                    .collect();
                poi_index += per_day;
                scheduler.plan_day(city, day_number, &slice)
            })
            .collect();

        Itinerary {
            city: city.to_string(),
            total_days: days,
            pace: self.pace,
            transport_mode: self.transport_mode,
            source: ItinerarySource::Baseline,
            llm_enhanced: false,
            summary: None,
            notice: None,
            recommended_hotels: Vec::new(),
            tips: Vec::new(),
            days: day_plans,
        }
    }

    /// Generic fixed-pattern itinerary used when no POI data exists at all.
    fn placeholder_itinerary(&self, city: &str, days: u32, preferences: &[String]) -> Itinerary {
        let day_plans = (1..=days)
            .map(|day_number| self.placeholder_day(city, day_number, preferences))
            .collect();

        Itinerary {
            city: city.to_string(),
            total_days: days,
            pace: self.pace,
            transport_mode: self.transport_mode,
            source: ItinerarySource::Placeholder,
            llm_enhanced: false,
            summary: None,
            notice: Some(format!(
                "No attraction data was found for {}; this outline is generic — verify every stop before booking.",
                city
            )),
            recommended_hotels: Vec::new(),
            tips: Vec::new(),
            days: day_plans,
        }
    }

    fn placeholder_day(&self, city: &str, day_number: u32, preferences: &[String]) -> DayPlan {
        let kind = preferences
            .first()
            .cloned()
            .unwrap_or_else(|| "culture".to_string());

        let activities = (0..self.pace.activities_per_day())
            .map(|slot| {
                // 3-hour blocks from 09:00: 09:00-12:00, 12:00-15:00, ...
                let start = (9 + slot as u32 * 3) * 60;
                let end = start + PLACEHOLDER_ACTIVITY_DURATION_MINUTES;
                Activity {
                    name: format!("{} attraction {}-{}", city, day_number, slot + 1),
                    kind: kind.clone(),
                    address: String::new(),
                    coordinates: None,
                    start_time: format_minutes(start),
                    end_time: format_minutes(end),
                    duration_minutes: PLACEHOLDER_ACTIVITY_DURATION_MINUTES,
                    description: format!("A popular stop in {} worth a visit.", city),
                    rating: DEFAULT_ACTIVITY_RATING,
                    price_range: "$$".to_string(),
                    price_estimate: PLACEHOLDER_PRICE_ESTIMATE_BASE * (slot as f64 + 1.0),
                    tags: vec!["recommended".to_string(), "popular".to_string()],
                    order: slot as u32 + 1,
                }
            })
            .collect();

        DayPlan {
            day_number,
            description: format!("Planned outline for day {}", day_number),
            summary: None,
            theme: None,
            hotel: None,
            tips: Vec::new(),
            activities,
        }
    }
}
