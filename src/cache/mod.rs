//! In-memory memoization of the full planning pipeline.
//!
//! Keyed by the normalized request fingerprint, bounded by a TTL and an entry
//! ceiling with least-recently-used eviction. Values are handed out as deep
//! copies so callers can never mutate cached state. Concurrent misses for the
//! same fingerprint coalesce behind a single pipeline execution.

use crate::models::{Itinerary, PlanFingerprint};
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Observability data recorded alongside each cached plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlanMetrics {
    /// Time spent building the deterministic baseline (ms).
    pub build_ms: u64,
    /// Time spent in enrichment + merge (ms); zero when skipped.
    pub enrich_ms: u64,
    /// Number of LLM calls issued for this plan.
    pub llm_calls: u32,
    /// Whether this response was served from cache.
    pub cache_hit: bool,
}

struct CachedPlan {
    itinerary: Itinerary,
    metrics: PlanMetrics,
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entry_count: u64,
}

pub struct PlanCache {
    plans: Cache<PlanFingerprint, Arc<CachedPlan>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PlanCache {
    pub fn new(ttl_seconds: u64, max_entries: u64) -> Self {
        let plans = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_entries)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        PlanCache {
            plans,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a fresh entry. Returns an independent copy of the plan with
    /// `cache_hit` set on its metrics.
    pub async fn get(&self, fingerprint: &PlanFingerprint) -> Option<(Itinerary, PlanMetrics)> {
        match self.plans.get(fingerprint).await {
            Some(cached) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(city = %fingerprint.city, "Plan cache hit");
                let mut metrics = cached.metrics.clone();
                metrics.cache_hit = true;
                Some((cached.itinerary.clone(), metrics))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(city = %fingerprint.city, "Plan cache miss");
                None
            }
        }
    }

    /// Store a plan. The cache keeps its own copy.
    pub async fn insert(
        &self,
        fingerprint: PlanFingerprint,
        itinerary: Itinerary,
        metrics: PlanMetrics,
    ) {
        self.plans
            .insert(fingerprint, Arc::new(CachedPlan { itinerary, metrics }))
            .await;
    }

    /// Return the cached plan for `fingerprint`, or run `build` exactly once
    /// to produce it. Concurrent callers with the same fingerprint share one
    /// execution of `build`.
    pub async fn get_or_build<F, Fut>(
        &self,
        fingerprint: PlanFingerprint,
        build: F,
    ) -> (Itinerary, PlanMetrics)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = (Itinerary, PlanMetrics)>,
    {
        let city = fingerprint.city.clone();
        let entry = self
            .plans
            .entry(fingerprint)
            .or_insert_with(async {
                let (itinerary, metrics) = build().await;
                Arc::new(CachedPlan { itinerary, metrics })
            })
            .await;

        let fresh = entry.is_fresh();
        if fresh {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(city = %city, "Plan cache miss, pipeline executed");
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(city = %city, "Plan cache hit");
        }

        let cached = entry.into_value();
        let mut metrics = cached.metrics.clone();
        metrics.cache_hit = !fresh;
        (cached.itinerary.clone(), metrics)
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            entry_count: self.plans.entry_count(),
        }
    }
}
