use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::Date;
use tripcraft::models::{Hotel, Poi};
use tripcraft::services::hotel_source::HotelSource;
use tripcraft::services::llm::{ChatMessage, LlmClient};
use tripcraft::services::poi_source::PoiSource;
use tripcraft::{AppError, Result};

/// POI source over a fixed pool that counts how often it is queried, so
/// tests can assert how many pipeline executions actually happened.
pub struct CountingPoiSource {
    pois: Vec<Poi>,
    calls: AtomicUsize,
}

impl CountingPoiSource {
    pub fn new(pois: Vec<Poi>) -> Arc<Self> {
        Arc::new(CountingPoiSource {
            pois,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoiSource for CountingPoiSource {
    async fn search(&self, _city: &str, _preferences: &[String]) -> Result<Vec<Poi>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pois.clone())
    }
}

/// LLM client that fails every call.
pub struct FailingLlm;

#[async_trait]
impl LlmClient for FailingLlm {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _temperature: f32,
        _force_json: bool,
    ) -> Result<String> {
        Err(AppError::LlmApi("backend unreachable".to_string()))
    }
}

/// LLM client that replays a fixed queue of responses.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedLlm {
    #[allow(dead_code)]
    pub fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(ScriptedLlm {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
        })
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _temperature: f32,
        _force_json: bool,
    ) -> Result<String> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::LlmApi("script exhausted".to_string()))
    }
}

/// Hotel source returning a fixed candidate list.
pub struct StaticHotelSource {
    hotels: Vec<Hotel>,
}

impl StaticHotelSource {
    #[allow(dead_code)]
    pub fn new(count: usize) -> Arc<Self> {
        let hotels = (1..=count)
            .map(|i| Hotel {
                name: format!("Hotel {}", i),
                address: Some(format!("{} Main Street", i)),
                rating: Some(4.0 + i as f64 * 0.1),
                price_per_night: Some(80.0 + i as f64 * 10.0),
                currency: Some("USD".to_string()),
            })
            .collect();
        Arc::new(StaticHotelSource { hotels })
    }
}

#[async_trait]
impl HotelSource for StaticHotelSource {
    async fn search(
        &self,
        _city: &str,
        _check_in: Date,
        _check_out: Date,
        _adults: u32,
        _rooms: u32,
    ) -> Result<Vec<Hotel>> {
        Ok(self.hotels.clone())
    }
}

/// Five POIs with coordinates around central Beijing, 120 minutes each.
#[allow(dead_code)]
pub fn five_pois() -> Vec<Poi> {
    (1..=5)
        .map(|i| {
            Poi::new(format!("POI {}", i), "culture")
                .with_coordinates(39.90 + i as f64 * 0.01, 116.40 + i as f64 * 0.01)
                .with_tags(&["culture", "history"])
                .with_duration(120)
        })
        .collect()
}
