//! Environment-driven configuration

use crate::llm::DEFAULT_BASE_URL;
use crate::runtime::{DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_ROUNDS_PER_PASS};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_ORDER_API_URL: &str = "http://localhost:8080/api/orders";
const DEFAULT_ORDER_API_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub temperature: f32,
    pub order_api_url: String,
    pub order_api_timeout: Duration,
    pub catalog_api_url: Option<String>,
    pub max_iterations: usize,
    pub max_rounds_per_pass: usize,
    pub system_prompt_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable numbers fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = var("ORDER_DESK_DB_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.order-desk/history.db"))
            },
            PathBuf::from,
        );

        Self {
            db_path,
            llm_api_key: var("LLM_API_KEY"),
            llm_base_url: var("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            llm_model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parsed(&var, "LLM_TEMPERATURE").unwrap_or(DEFAULT_TEMPERATURE),
            order_api_url: var("ORDER_API_URL").unwrap_or_else(|| DEFAULT_ORDER_API_URL.to_string()),
            order_api_timeout: Duration::from_secs(
                parsed(&var, "ORDER_API_TIMEOUT_SECS").unwrap_or(DEFAULT_ORDER_API_TIMEOUT_SECS),
            ),
            catalog_api_url: var("CATALOG_API_URL"),
            max_iterations: parsed(&var, "MAX_ITERATIONS").unwrap_or(DEFAULT_MAX_ITERATIONS),
            max_rounds_per_pass: parsed(&var, "MAX_ROUNDS_PER_PASS").unwrap_or(DEFAULT_MAX_ROUNDS_PER_PASS),
            system_prompt_path: var("SYSTEM_PROMPT_PATH").map(PathBuf::from),
        }
    }
}

fn parsed<T: FromStr>(var: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = var(key)?;
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value = %value, "Ignoring unparseable setting");
    }
    parsed
}
