use crate::constants::{ACTIVITY_BUFFER_MINUTES, DAY_START_MINUTES};
use crate::models::{format_minutes, Activity, DayPlan, Pace, Poi, TransportMode};
use crate::services::estimates;

/// Greedily packs one day's POIs into a 09:00-anchored timeline.
///
/// Each activity runs for its pace-scaled duration, followed by a fixed
/// 30-minute meal/rest buffer; when both the current and next stop have
/// coordinates, the estimated travel leg is added before the next slot.
pub struct DayScheduler {
    pace: Pace,
    transport_mode: TransportMode,
}

impl DayScheduler {
    pub fn new(pace: Pace, transport_mode: TransportMode) -> Self {
        DayScheduler {
            pace,
            transport_mode,
        }
    }

    /// Schedule the given POIs, in order, into a single day. A slice shorter
    /// than the pace's activities-per-day simply yields a shorter day.
    pub fn plan_day(&self, city: &str, day_number: u32, pois: &[Poi]) -> DayPlan {
        let mut activities = Vec::with_capacity(pois.len());
        let mut current_time = DAY_START_MINUTES;

        for (index, poi) in pois.iter().enumerate() {
            let duration = estimates::activity_duration(poi, self.pace);
            let start = current_time;
            let end = start + duration;

            activities.push(Activity {
                name: poi.name.clone(),
                kind: poi.kind.clone(),
                address: poi.address.clone(),
                coordinates: poi.coordinates,
                start_time: format_minutes(start),
                end_time: format_minutes(end),
                duration_minutes: duration,
                description: baseline_description(poi, city),
                rating: poi.rating,
                price_range: poi.price_range.clone(),
                price_estimate: poi.price_estimate,
                tags: poi.tags.clone(),
                order: index as u32 + 1,
            });

            current_time = end + ACTIVITY_BUFFER_MINUTES;

            if let Some(next) = pois.get(index + 1) {
                if let (Some(here), Some(there)) = (poi.coordinates, next.coordinates) {
                    let distance = here.distance_to(&there);
                    current_time += estimates::travel_time_minutes(distance, self.transport_mode);
                }
            }
        }

        DayPlan {
            day_number,
            description: format!(
                "Day {} schedule with {} stops",
                day_number,
                activities.len()
            ),
            summary: None,
            theme: None,
            hotel: None,
            tips: Vec::new(),
            activities,
        }
    }
}

/// Deterministic description used before any AI polish.
fn baseline_description(poi: &Poi, city: &str) -> String {
    if poi.tags.is_empty() {
        format!("{} is a well-known attraction in {}.", poi.name, city)
    } else {
        format!(
            "{} is a well-known attraction in {}, known for {}.",
            poi.name,
            city,
            poi.tags.join(", ")
        )
    }
}
