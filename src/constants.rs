//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.

// --- Daily schedule anchors ---

/// First activity of every day starts at 09:00 (minute-of-day).
pub const DAY_START_MINUTES: u32 = 540;
/// Fixed buffer between activities for meals and rest (minutes).
pub const ACTIVITY_BUFFER_MINUTES: u32 = 30;

// --- Travel-time estimation ---

/// Safety buffer applied to raw travel-time estimates (10%).
pub const TRAVEL_TIME_BUFFER: f64 = 1.1;
/// No leg between two stops is estimated below this (minutes).
pub const MIN_TRAVEL_TIME_MINUTES: u32 = 5;

// --- POI defaults (applied when upstream data omits a field) ---

/// Base visit duration when the source supplies none (minutes).
pub const DEFAULT_POI_DURATION_MINUTES: u32 = 120;
/// Rating assigned to activities that arrive without one.
pub const DEFAULT_ACTIVITY_RATING: f64 = 4.5;

// --- Plan cache defaults (overridden by PLAN_CACHE_* env vars) ---

/// Default plan cache TTL: 6 hours.
pub const DEFAULT_PLAN_CACHE_TTL_SECONDS: u64 = 21_600;
/// Entry ceiling for the plan cache; the oldest entry is evicted beyond it.
pub const DEFAULT_PLAN_CACHE_MAX_ENTRIES: u64 = 50;

// --- AI enrichment ---

/// Temperature for the trip-level meta pass.
pub const META_PASS_TEMPERATURE: f32 = 0.65;
/// Temperature for the per-day detail pass.
pub const DETAIL_PASS_TEMPERATURE: f32 = 0.6;
/// Activities per day included in the meta-pass outline.
pub const OUTLINE_ACTIVITY_LIMIT: usize = 3;
/// Every enriched activity carries at least this many tags.
pub const MIN_ACTIVITY_TAGS: usize = 3;
/// Request timeout for LLM calls (seconds).
pub const LLM_REQUEST_TIMEOUT_SECONDS: u64 = 30;

// --- Price-range derivation thresholds (same currency unit as estimates) ---

/// Below this estimate an activity is tagged `$`.
pub const PRICE_TIER_BUDGET: f64 = 50.0;
/// Below this estimate an activity is tagged `$$`.
pub const PRICE_TIER_MODERATE: f64 = 150.0;
/// Below this estimate an activity is tagged `$$$`; above it, `$$$$`.
pub const PRICE_TIER_PREMIUM: f64 = 300.0;

// --- Hotel candidates ---

/// Hotels attached to the final itinerary.
pub const RECOMMENDED_HOTEL_LIMIT: usize = 5;
/// Hotel candidates shown to the meta pass.
pub const META_HOTEL_CANDIDATE_LIMIT: usize = 3;
/// Hotel availability is probed this many days out from "now".
pub const HOTEL_CHECK_IN_LEAD_DAYS: i64 = 7;

// --- Placeholder itinerary (no POI data available) ---

/// Block length for generic placeholder activities (minutes).
pub const PLACEHOLDER_ACTIVITY_DURATION_MINUTES: u32 = 180;
/// Placeholder price estimate base; scaled by slot position.
pub const PLACEHOLDER_PRICE_ESTIMATE_BASE: f64 = 50.0;
