//! Travel-time and dwell-time estimation.

use crate::constants::{MIN_TRAVEL_TIME_MINUTES, TRAVEL_TIME_BUFFER};
use crate::models::{Pace, Poi, TransportMode};

/// Estimate travel time in minutes for a leg of the given length.
/// Adds a 10% buffer over the raw speed table and never goes below 5 minutes.
pub fn travel_time_minutes(distance_km: f64, mode: TransportMode) -> u32 {
    let time_hours = distance_km / mode.speed_kmh();
    let time_minutes = (time_hours * 60.0 * TRAVEL_TIME_BUFFER) as u32;
    time_minutes.max(MIN_TRAVEL_TIME_MINUTES)
}

/// Visit duration for a POI under the given pace, floored to whole minutes.
pub fn activity_duration(poi: &Poi, pace: Pace) -> u32 {
    (poi.duration_minutes as f64 * pace.duration_multiplier()) as u32
}
