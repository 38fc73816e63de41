use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripcraft::cache::PlanCache;
use tripcraft::config::Config;
use tripcraft::models::PlanRequest;
use tripcraft::services::hotel_source::NoHotelSource;
use tripcraft::services::llm::{ChatCompletionsClient, LlmClient};
use tripcraft::services::planner::TripPlanner;
use tripcraft::services::poi_source::JsonPoiSource;

/// Plan a trip from the command line and print the itinerary as JSON.
///
/// Usage: tripcraft [city] [days] [preferences,comma,separated]
///                  [pace] [transport_mode] [priority]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripcraft=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    let args: Vec<String> = std::env::args().collect();
    let city = args.get(1).cloned().unwrap_or_else(|| "Beijing".to_string());
    let days: u32 = args
        .get(2)
        .map(|d| d.parse())
        .transpose()
        .map_err(|_| "days must be a positive integer")?
        .unwrap_or(2);
    let preferences: Vec<String> = args
        .get(3)
        .map(|p| {
            p.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let pace = args.get(4).cloned().unwrap_or_else(|| "balanced".to_string());
    let transport_mode = args.get(5).cloned().unwrap_or_else(|| "driving".to_string());
    let priority = args.get(6).cloned().unwrap_or_else(|| "efficiency".to_string());

    let llm_client: Option<Arc<dyn LlmClient>> = config.llm.as_ref().map(|llm| {
        Arc::new(ChatCompletionsClient::new(
            llm.api_key.clone(),
            llm.base_url.clone(),
            llm.model.clone(),
        )) as Arc<dyn LlmClient>
    });
    match &llm_client {
        Some(_) => tracing::info!("LLM backend configured, enrichment enabled"),
        None => tracing::info!("LLM backend not configured, itineraries stay deterministic"),
    }

    let planner = TripPlanner::new(
        Arc::new(JsonPoiSource::bundled()),
        Arc::new(NoHotelSource),
        llm_client,
        PlanCache::new(config.plan_cache_ttl, config.plan_cache_max_entries),
    );

    let request = PlanRequest {
        city,
        days,
        preferences,
        pace,
        transport_mode,
        priority,
    };
    let itinerary = planner.build_itinerary(&request).await?;

    println!("{}", serde_json::to_string_pretty(&itinerary)?);
    Ok(())
}
