//! Structural merge of AI output onto the deterministic baseline.
//!
//! Days are matched by `day_number` and activities by `order`; AI fields only
//! overwrite baseline fields when they are non-null and non-empty, and
//! baseline entries with no AI counterpart are appended rather than dropped.
//! The merge therefore never loses a scheduled stop, no matter how partial or
//! reordered the AI response is.

use crate::constants::{DEFAULT_ACTIVITY_RATING, RECOMMENDED_HOTEL_LIMIT};
use crate::models::{Activity, DayPlan, Hotel, Itinerary};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Partial trip-level plan assembled from the AI passes. Every field is
/// optional; absent fields leave the baseline untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiPlan {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tips: Option<Vec<String>>,
    #[serde(default)]
    pub days: Vec<AiDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiDay {
    #[serde(default)]
    pub day_number: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub hotel: Option<String>,
    #[serde(default)]
    pub tips: Option<Vec<String>>,
    #[serde(default)]
    pub activities: Vec<AiActivity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiActivity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub price_estimate: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub order: Option<u32>,
}

/// Merge an AI plan onto the baseline. `total_days`, `pace` and
/// `transport_mode` stay baseline-authoritative so the structural invariants
/// hold even against a hallucinated response.
pub fn merge_itinerary(base: &Itinerary, plan: &AiPlan, hotels: &[Hotel]) -> Itinerary {
    let mut result = base.clone();

    if let Some(city) = nonempty(&plan.city) {
        result.city = city;
    }
    if let Some(summary) = nonempty(&plan.summary) {
        result.summary = Some(summary);
    }

    let ai_days: HashMap<u32, &AiDay> = plan
        .days
        .iter()
        .enumerate()
        .map(|(index, day)| (day.day_number.unwrap_or(index as u32 + 1), day))
        .collect();

    result.days = base
        .days
        .iter()
        .map(|base_day| match ai_days.get(&base_day.day_number) {
            Some(ai_day) => merge_day(base_day, ai_day),
            None => base_day.clone(),
        })
        .collect();

    if !hotels.is_empty() {
        result.recommended_hotels = hotels
            .iter()
            .take(RECOMMENDED_HOTEL_LIMIT)
            .cloned()
            .collect();
    }
    if let Some(tips) = &plan.tips {
        result.tips = tips.clone();
    }

    result
}

fn merge_day(base_day: &DayPlan, ai_day: &AiDay) -> DayPlan {
    let mut merged = base_day.clone();

    if let Some(description) = nonempty(&ai_day.description) {
        merged.description = description;
    }
    if let Some(summary) = nonempty(&ai_day.summary) {
        merged.summary = Some(summary);
    }
    if let Some(theme) = nonempty(&ai_day.theme) {
        merged.theme = Some(theme);
    }
    if let Some(hotel) = nonempty(&ai_day.hotel) {
        merged.hotel = Some(hotel);
    }
    if let Some(tips) = &ai_day.tips {
        if !tips.is_empty() {
            merged.tips = tips.clone();
        }
    }

    merged.activities = merge_activities(&base_day.activities, &ai_day.activities);
    merged
}

/// Merge activities by `order` (falling back to 1-based position when the AI
/// omits it). Matched activities are overlaid field-by-field; unmatched AI
/// activities are synthesized with centralized defaults; unconsumed baseline
/// activities are appended unchanged. The result is sorted by order and
/// renumbered 1..k to keep orders contiguous and unique.
pub fn merge_activities(base: &[Activity], ai: &[AiActivity]) -> Vec<Activity> {
    if ai.is_empty() {
        return base.to_vec();
    }

    let base_by_order: HashMap<u32, &Activity> =
        base.iter().map(|activity| (activity.order, activity)).collect();

    let mut merged: Vec<Activity> = Vec::with_capacity(base.len().max(ai.len()));
    let mut used_orders: HashSet<u32> = HashSet::new();

    for (index, ai_activity) in ai.iter().enumerate() {
        let order = ai_activity.order.unwrap_or(index as u32 + 1);
        let activity = match base_by_order.get(&order) {
            Some(base_activity) => overlay_activity(base_activity, ai_activity, order),
            None => synthesized_activity(ai_activity, order),
        };
        used_orders.insert(order);
        merged.push(activity);
    }

    for base_activity in base {
        if !used_orders.contains(&base_activity.order) {
            merged.push(base_activity.clone());
        }
    }

    merged.sort_by_key(|activity| activity.order);
    for (index, activity) in merged.iter_mut().enumerate() {
        activity.order = index as u32 + 1;
    }
    merged
}

/// Copy the baseline activity and overlay every AI field that carries a
/// usable value.
fn overlay_activity(base: &Activity, ai: &AiActivity, order: u32) -> Activity {
    let mut merged = base.clone();

    if let Some(name) = nonempty(&ai.name) {
        merged.name = name;
    }
    if let Some(kind) = nonempty(&ai.kind) {
        merged.kind = kind;
    }
    if let Some(address) = nonempty(&ai.address) {
        merged.address = address;
    }
    if let Some(start_time) = nonempty(&ai.start_time) {
        merged.start_time = start_time;
    }
    if let Some(end_time) = nonempty(&ai.end_time) {
        merged.end_time = end_time;
    }
    if let Some(duration) = ai.duration_minutes {
        merged.duration_minutes = duration;
    }
    if let Some(description) = nonempty(&ai.description) {
        merged.description = description;
    }
    if let Some(tags) = &ai.tags {
        if !tags.is_empty() {
            merged.tags = tags.clone();
        }
    }
    if let Some(price_range) = nonempty(&ai.price_range) {
        merged.price_range = price_range;
    }
    if let Some(price_estimate) = ai.price_estimate {
        merged.price_estimate = price_estimate;
    }
    if let Some(rating) = ai.rating {
        merged.rating = rating;
    }

    merged.order = order;
    merged
}

/// Build an activity from AI fields alone. All defaults for activities the
/// baseline never scheduled live here.
fn synthesized_activity(ai: &AiActivity, order: u32) -> Activity {
    Activity {
        name: nonempty(&ai.name).unwrap_or_else(|| format!("Activity {}", order)),
        kind: nonempty(&ai.kind).unwrap_or_else(|| "experience".to_string()),
        address: nonempty(&ai.address).unwrap_or_default(),
        coordinates: None,
        start_time: nonempty(&ai.start_time).unwrap_or_else(|| "09:00".to_string()),
        end_time: nonempty(&ai.end_time).unwrap_or_else(|| "11:00".to_string()),
        duration_minutes: ai.duration_minutes.unwrap_or(120),
        description: nonempty(&ai.description).unwrap_or_default(),
        rating: ai.rating.unwrap_or(DEFAULT_ACTIVITY_RATING),
        price_range: nonempty(&ai.price_range).unwrap_or_else(|| "$$".to_string()),
        price_estimate: ai.price_estimate.unwrap_or(50.0),
        tags: ai.tags.clone().unwrap_or_default(),
        order,
    }
}

fn nonempty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}
