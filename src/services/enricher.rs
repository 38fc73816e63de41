//! Two-stage LLM enrichment of a baseline itinerary.
//!
//! Stage one (meta pass) asks for a trip summary, one highlight per day and
//! practical tips from a compact outline. Stage two (detail pass) reworks one
//! day at a time. Both stages are fallible in isolation: a meta failure
//! aborts enrichment entirely (the planner falls back to the baseline), while
//! a detail failure degrades only that day to a deterministic enhancement.

use crate::constants::{
    DEFAULT_ACTIVITY_RATING, DETAIL_PASS_TEMPERATURE, META_HOTEL_CANDIDATE_LIMIT,
    META_PASS_TEMPERATURE, MIN_ACTIVITY_TAGS, OUTLINE_ACTIVITY_LIMIT, PRICE_TIER_BUDGET,
    PRICE_TIER_MODERATE, PRICE_TIER_PREMIUM,
};
use crate::error::{AppError, Result};
use crate::models::{DayPlan, Hotel, Itinerary, ItinerarySource, PlanRequest};
use crate::services::llm::{ChatMessage, LlmClient};
use crate::services::merge::{AiActivity, AiDay, AiPlan};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of a successful enrichment run. `degraded_days` lists days whose
/// detail pass failed and were filled deterministically instead.
pub struct EnrichedPlan {
    pub plan: AiPlan,
    pub llm_calls: u32,
    pub degraded_days: Vec<u32>,
}

pub struct AiEnricher {
    client: Arc<dyn LlmClient>,
}

impl AiEnricher {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        AiEnricher { client }
    }

    /// Run both passes against the baseline. Errors out only when the meta
    /// pass fails; per-day failures are absorbed.
    pub async fn enrich(
        &self,
        request: &PlanRequest,
        base: &Itinerary,
        hotels: &[Hotel],
    ) -> Result<EnrichedPlan> {
        let mut llm_calls = 1u32;
        let meta = self.meta_pass(request, base, hotels).await?;

        let highlights: HashMap<u32, String> = meta
            .daily_highlights
            .into_iter()
            .map(|h| (h.day_number, h.highlight))
            .collect();

        let is_placeholder = base.source == ItinerarySource::Placeholder;
        let mut days = Vec::with_capacity(base.days.len());
        let mut degraded_days = Vec::new();

        for day in &base.days {
            llm_calls += 1;
            let mut ai_day = match self.detail_pass(&base.city, day, is_placeholder).await {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::warn!(
                        day = day.day_number,
                        "Detail pass failed ({}), using deterministic enhancement",
                        e
                    );
                    degraded_days.push(day.day_number);
                    default_enhanced_day(&base.city, day)
                }
            };
            if let Some(highlight) = highlights.get(&day.day_number) {
                if !highlight.is_empty() {
                    ai_day.summary = Some(highlight.clone());
                }
            }
            days.push(ai_day);
        }

        Ok(EnrichedPlan {
            plan: AiPlan {
                city: None,
                summary: meta.summary,
                tips: if meta.tips.is_empty() {
                    None
                } else {
                    Some(meta.tips)
                },
                days,
            },
            llm_calls,
            degraded_days,
        })
    }

    async fn meta_pass(
        &self,
        request: &PlanRequest,
        base: &Itinerary,
        hotels: &[Hotel],
    ) -> Result<MetaResponse> {
        let outline: Vec<serde_json::Value> = base
            .days
            .iter()
            .map(|day| {
                json!({
                    "day_number": day.day_number,
                    "theme": day.theme.clone().unwrap_or_else(|| day.description.clone()),
                    "activities": day
                        .activities
                        .iter()
                        .take(OUTLINE_ACTIVITY_LIMIT)
                        .map(|a| format!("{} {}", a.start_time, a.name))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        let hotel_candidates: Vec<serde_json::Value> = hotels
            .iter()
            .take(META_HOTEL_CANDIDATE_LIMIT)
            .map(|h| {
                json!({
                    "name": h.name,
                    "rating": h.rating,
                    "price_per_night": h.price_per_night,
                })
            })
            .collect();

        let payload = json!({
            "request": {
                "city": request.city,
                "days": request.days,
                "preferences": request.preferences,
                "pace": request.pace,
                "transport_mode": request.transport_mode,
                "priority": request.priority,
            },
            "outline": outline,
            "hotel_candidates": hotel_candidates,
        });

        let messages = [
            ChatMessage::system(
                "You are a senior travel-itinerary planner. You refine draft \
                 itineraries with engaging but factual summaries, realistic \
                 timing and practical tips.",
            ),
            ChatMessage::user(format!(
                "Based on the trip outline below, write a short trip summary, \
                 one highlight per day, and practical travel tips. Respond \
                 with JSON only, shaped exactly as: {{\"summary\": string, \
                 \"daily_highlights\": [{{\"day_number\": number, \
                 \"highlight\": string}}], \"tips\": [string]}}.\n\n{}",
                payload
            )),
        ];

        let raw = self
            .client
            .chat(&messages, META_PASS_TEMPERATURE, true)
            .await?;
        parse_llm_json(&raw)
    }

    async fn detail_pass(
        &self,
        city: &str,
        day: &DayPlan,
        is_placeholder: bool,
    ) -> Result<AiDay> {
        let payload = json!({
            "city": city,
            "day_number": day.day_number,
            "is_placeholder": is_placeholder,
            "activities": day
                .activities
                .iter()
                .map(|a| {
                    json!({
                        "name": a.name,
                        "type": a.kind,
                        "start_time": a.start_time,
                        "end_time": a.end_time,
                        "tags": a.tags,
                        "description": a.description,
                        "address": a.address,
                    })
                })
                .collect::<Vec<_>>(),
        });

        let messages = [
            ChatMessage::system(
                "You are a travel copywriter. You polish one day of an \
                 itinerary at a time: richer descriptions, useful tags and \
                 price guidance. Keep activity names and times unless they \
                 are clearly wrong.",
            ),
            ChatMessage::user(format!(
                "Rework the day below. If is_placeholder is true the draft \
                 stops are generic filler: replace them with real, well-known \
                 attractions in the city. Respond with JSON only, shaped \
                 exactly as: {{\"day_number\": number, \"description\": \
                 string, \"theme\": string, \"tips\": [string], \
                 \"activities\": [{{\"name\": string, \"start_time\": string, \
                 \"end_time\": string, \"description\": string, \"tags\": \
                 [string], \"price_estimate\": number, \"price_range\": \
                 string, \"rating\": number, \"address\": string, \"order\": \
                 number}}]}}.\n\n{}",
                payload
            )),
        ];

        let raw = self
            .client
            .chat(&messages, DETAIL_PASS_TEMPERATURE, true)
            .await?;
        let mut detail: AiDay = parse_llm_json(&raw)?;
        detail.day_number.get_or_insert(day.day_number);
        polish_activities(day, &mut detail);
        Ok(detail)
    }
}

/// Guarantee that every AI activity carries a rating, a price range and at
/// least three tags, pulling gaps from the matching baseline activity.
fn polish_activities(day: &DayPlan, ai_day: &mut AiDay) {
    for (index, activity) in ai_day.activities.iter_mut().enumerate() {
        let order = activity.order.unwrap_or(index as u32 + 1);
        let base = day.activities.iter().find(|b| b.order == order);

        if activity.rating.is_none() {
            activity.rating = Some(base.map(|b| b.rating).unwrap_or(DEFAULT_ACTIVITY_RATING));
        }

        let estimate = activity
            .price_estimate
            .or_else(|| base.map(|b| b.price_estimate))
            .unwrap_or(50.0);
        activity.price_estimate.get_or_insert(estimate);
        if activity
            .price_range
            .as_ref()
            .map(|p| p.is_empty())
            .unwrap_or(true)
        {
            activity.price_range = Some(price_range_for(estimate).to_string());
        }

        let name = activity
            .name
            .clone()
            .or_else(|| base.map(|b| b.name.clone()))
            .unwrap_or_default();
        let description = activity.description.clone().unwrap_or_default();
        let existing = activity
            .tags
            .clone()
            .filter(|tags| !tags.is_empty())
            .or_else(|| base.map(|b| b.tags.clone()))
            .unwrap_or_default();
        activity.tags = Some(ensure_tags(existing, &name, &description));
    }
}

/// Deterministic stand-in for a failed detail pass: reuse the baseline
/// fields, fill tag/rating/price gaps, never drop the day.
fn default_enhanced_day(city: &str, day: &DayPlan) -> AiDay {
    let activities = day
        .activities
        .iter()
        .map(|activity| {
            let description = if activity.description.is_empty() {
                format!(
                    "{} is a popular {} stop in {}.",
                    activity.name, activity.kind, city
                )
            } else {
                activity.description.clone()
            };
            let price_range = if activity.price_range.is_empty() {
                price_range_for(activity.price_estimate).to_string()
            } else {
                activity.price_range.clone()
            };
            AiActivity {
                order: Some(activity.order),
                description: Some(description),
                tags: Some(ensure_tags(
                    activity.tags.clone(),
                    &activity.name,
                    &activity.description,
                )),
                rating: Some(activity.rating),
                price_estimate: Some(activity.price_estimate),
                price_range: Some(price_range),
                ..Default::default()
            }
        })
        .collect();

    AiDay {
        day_number: Some(day.day_number),
        activities,
        ..Default::default()
    }
}

/// Fixed thresholds mapping a price estimate to a display tier.
pub fn price_range_for(price_estimate: f64) -> &'static str {
    if price_estimate <= 0.0 {
        "free"
    } else if price_estimate < PRICE_TIER_BUDGET {
        "$"
    } else if price_estimate < PRICE_TIER_MODERATE {
        "$$"
    } else if price_estimate < PRICE_TIER_PREMIUM {
        "$$$"
    } else {
        "$$$$"
    }
}

// Keyword table for tag inference over activity names and descriptions.
const TAG_KEYWORDS: &[(&str, &str)] = &[
    ("museum", "history"),
    ("gallery", "art"),
    ("palace", "history"),
    ("temple", "culture"),
    ("church", "architecture"),
    ("cathedral", "architecture"),
    ("park", "nature"),
    ("garden", "nature"),
    ("market", "food"),
    ("tower", "views"),
    ("lake", "scenery"),
    ("mountain", "outdoor"),
    ("beach", "relaxation"),
    ("wall", "landmark"),
];

const GENERIC_TAGS: &[&str] = &["must-see", "popular", "local-favorite"];

/// Infer tags from keyword hits over the name and description.
pub fn infer_tags(name: &str, description: &str) -> Vec<String> {
    let haystack = format!("{} {}", name, description).to_lowercase();
    let mut tags = Vec::new();
    for (keyword, tag) in TAG_KEYWORDS {
        if haystack.contains(keyword) && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Top up a tag list to the minimum: inferred tags first, then generic ones.
pub fn ensure_tags(mut tags: Vec<String>, name: &str, description: &str) -> Vec<String> {
    for tag in infer_tags(name, description) {
        if tags.len() >= MIN_ACTIVITY_TAGS {
            break;
        }
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    for generic in GENERIC_TAGS {
        if tags.len() >= MIN_ACTIVITY_TAGS {
            break;
        }
        let generic = generic.to_string();
        if !tags.contains(&generic) {
            tags.push(generic);
        }
    }
    tags
}

/// Parse an LLM reply that should contain a JSON object, tolerating Markdown
/// fences and prose around the JSON.
pub fn parse_llm_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    if raw.trim().is_empty() {
        return Err(AppError::MalformedLlmResponse(
            "empty response".to_string(),
        ));
    }
    let json_text = extract_json_object(raw)?;
    serde_json::from_str(&json_text).map_err(|e| {
        AppError::MalformedLlmResponse(format!("{} (raw: {})", e, truncate(raw, 200)))
    })
}

/// Locate the first balanced `{...}` span, skipping string literals.
pub fn extract_json_object(text: &str) -> Result<String> {
    let cleaned = strip_code_fences(text);

    let mut start: Option<usize> = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in cleaned.char_indices() {
        if start.is_none() {
            if ch == '{' {
                start = Some(i);
                depth = 1;
            }
            continue;
        }
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(cleaned[start.unwrap_or(0)..=i].to_string());
                }
            }
            _ => {}
        }
    }

    Err(AppError::MalformedLlmResponse(format!(
        "no balanced JSON object found (raw: {})",
        truncate(text, 200)
    )))
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let body = if let Some(pos) = trimmed.find("```json") {
        &trimmed[pos + 7..]
    } else if let Some(pos) = trimmed.find("```") {
        &trimmed[pos + 3..]
    } else {
        return trimmed;
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[derive(Debug, Default, Deserialize)]
struct MetaResponse {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    daily_highlights: Vec<DailyHighlight>,
    #[serde(default)]
    tips: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DailyHighlight {
    day_number: u32,
    #[serde(default)]
    highlight: String,
}
