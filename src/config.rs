use crate::constants::{DEFAULT_PLAN_CACHE_MAX_ENTRIES, DEFAULT_PLAN_CACHE_TTL_SECONDS};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Chat-completions backend; enrichment is skipped entirely when absent.
    pub llm: Option<LlmConfig>,
    pub plan_cache_ttl: u64,
    pub plan_cache_max_entries: u64,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let llm = match env::var("OPENAI_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => Some(LlmConfig {
                api_key,
                base_url: env::var("OPENAI_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            }),
            _ => None,
        };

        let plan_cache_ttl: u64 = env::var("PLAN_CACHE_TTL")
            .unwrap_or_else(|_| DEFAULT_PLAN_CACHE_TTL_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid PLAN_CACHE_TTL")?;
        if plan_cache_ttl == 0 {
            return Err("PLAN_CACHE_TTL must be positive".to_string());
        }

        let plan_cache_max_entries: u64 = env::var("PLAN_CACHE_MAX_ENTRIES")
            .unwrap_or_else(|_| DEFAULT_PLAN_CACHE_MAX_ENTRIES.to_string())
            .parse()
            .map_err(|_| "Invalid PLAN_CACHE_MAX_ENTRIES")?;

        Ok(Config {
            llm,
            plan_cache_ttl,
            plan_cache_max_entries,
        })
    }
}
