use crate::cache::{CacheStats, PlanCache, PlanMetrics};
use crate::constants::{HOTEL_CHECK_IN_LEAD_DAYS, RECOMMENDED_HOTEL_LIMIT};
use crate::error::{AppError, Result};
use crate::models::{
    Hotel, Itinerary, ItinerarySource, Pace, PlanFingerprint, PlanRequest, TransportMode,
};
use crate::services::builder::ItineraryBuilder;
use crate::services::enricher::AiEnricher;
use crate::services::hotel_source::HotelSource;
use crate::services::llm::LlmClient;
use crate::services::merge::merge_itinerary;
use crate::services::poi_source::{filter_by_preferences, PoiSource};
use std::sync::Arc;
use std::time::Instant;
use time::{Duration, OffsetDateTime};

/// The planning pipeline: POI lookup → deterministic baseline → optional
/// two-stage LLM enrichment → structural merge, all memoized behind the plan
/// cache. The single entry point is [`TripPlanner::build_itinerary`]; only
/// invalid requests surface as errors, every data or LLM failure degrades to
/// a structurally valid itinerary.
pub struct TripPlanner {
    poi_source: Arc<dyn PoiSource>,
    hotel_source: Arc<dyn HotelSource>,
    enricher: Option<AiEnricher>,
    cache: PlanCache,
}

impl TripPlanner {
    pub fn new(
        poi_source: Arc<dyn PoiSource>,
        hotel_source: Arc<dyn HotelSource>,
        llm_client: Option<Arc<dyn LlmClient>>,
        cache: PlanCache,
    ) -> Self {
        TripPlanner {
            poi_source,
            hotel_source,
            enricher: llm_client.map(AiEnricher::new),
            cache,
        }
    }

    /// Build (or fetch from cache) the itinerary for a request. Identical
    /// requests within the cache TTL share one pipeline execution.
    pub async fn build_itinerary(&self, request: &PlanRequest) -> Result<Itinerary> {
        request.validate().map_err(AppError::InvalidRequest)?;

        let fingerprint = PlanFingerprint::from_request(request);
        let (itinerary, metrics) = self
            .cache
            .get_or_build(fingerprint, || self.run_pipeline(request))
            .await;

        tracing::info!(
            city = %itinerary.city,
            source = %itinerary.source,
            cache_hit = metrics.cache_hit,
            llm_calls = metrics.llm_calls,
            build_ms = metrics.build_ms,
            enrich_ms = metrics.enrich_ms,
            "Itinerary ready"
        );
        Ok(itinerary)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn run_pipeline(&self, request: &PlanRequest) -> (Itinerary, PlanMetrics) {
        let city = request.city.trim();
        let pace = Pace::from_label(&request.pace);
        let transport_mode = TransportMode::from_label(&request.transport_mode);

        let build_started = Instant::now();
        let pois = match self.poi_source.search(city, &request.preferences).await {
            Ok(pois) => pois,
            Err(e) => {
                tracing::warn!(city, "POI lookup failed ({}), continuing without data", e);
                Vec::new()
            }
        };
        let pois = filter_by_preferences(pois, &request.preferences);

        let baseline = ItineraryBuilder::new(pace, transport_mode).build(
            city,
            request.days,
            &request.preferences,
            &pois,
        );
        let build_ms = build_started.elapsed().as_millis() as u64;

        let hotels = self.search_hotels(city, request.days).await;

        let enrich_started = Instant::now();
        let (mut itinerary, llm_calls) = match &self.enricher {
            None => (baseline.clone(), 0),
            Some(enricher) => match enricher.enrich(request, &baseline, &hotels).await {
                Ok(enriched) => {
                    let mut merged = merge_itinerary(&baseline, &enriched.plan, &hotels);
                    // A placeholder keeps its provenance even when enriched.
                    if merged.source == ItinerarySource::Baseline {
                        merged.source = ItinerarySource::LlmSplit;
                    }
                    merged.llm_enhanced = true;
                    if !enriched.degraded_days.is_empty() && merged.notice.is_none() {
                        let days: Vec<String> = enriched
                            .degraded_days
                            .iter()
                            .map(|d| d.to_string())
                            .collect();
                        merged.notice = Some(format!(
                            "AI detail was unavailable for day(s) {}; those days show the deterministic draft.",
                            days.join(", ")
                        ));
                    }
                    (merged, enriched.llm_calls)
                }
                Err(e) => {
                    tracing::warn!(city, "LLM enrichment failed ({}), returning baseline", e);
                    let mut fallback = baseline.clone();
                    if fallback.source == ItinerarySource::Baseline {
                        fallback.source = ItinerarySource::Fallback;
                    }
                    if fallback.notice.is_none() {
                        fallback.notice = Some(
                            "AI enhancement was unavailable; this is the deterministic draft."
                                .to_string(),
                        );
                    }
                    (fallback, 1)
                }
            },
        };

        if itinerary.recommended_hotels.is_empty() && !hotels.is_empty() {
            itinerary.recommended_hotels = hotels
                .iter()
                .take(RECOMMENDED_HOTEL_LIMIT)
                .cloned()
                .collect();
        }
        let enrich_ms = enrich_started.elapsed().as_millis() as u64;

        let metrics = PlanMetrics {
            build_ms,
            enrich_ms,
            llm_calls,
            cache_hit: false,
        };
        (itinerary, metrics)
    }

    /// Best-effort hotel candidates for a window starting a week out, sized
    /// to the trip length. Failures degrade to an empty list.
    async fn search_hotels(&self, city: &str, days: u32) -> Vec<Hotel> {
        let today = OffsetDateTime::now_utc().date();
        let check_in = today + Duration::days(HOTEL_CHECK_IN_LEAD_DAYS);
        let check_out = check_in + Duration::days(days as i64);

        match self
            .hotel_source
            .search(city, check_in, check_out, 2, 1)
            .await
        {
            Ok(hotels) => hotels,
            Err(e) => {
                tracing::warn!(city, "Hotel lookup failed ({}), continuing without candidates", e);
                Vec::new()
            }
        }
    }
}
