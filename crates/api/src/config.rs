use std::env;
use std::time::Duration;

use safar_agents::ChatCompletionsConfig;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// `None` runs the service offline: every plan is synthesized.
    pub model: Option<ChatCompletionsConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 30,
            allowed_origins: Vec::new(),
            model: None,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind = env::var("SAFAR_BIND")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.bind);
        let rate_limit_window = env::var("SAFAR_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_limit_window);
        let rate_limit_max = env::var("SAFAR_RATE_LIMIT_MAX")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(defaults.rate_limit_max);
        let allowed_origins = env::var("SAFAR_ALLOWED_ORIGINS")
            .ok()
            .map(|value| parse_origins(&value))
            .unwrap_or_default();

        Self {
            bind,
            rate_limit_window,
            rate_limit_max,
            allowed_origins,
            model: ChatCompletionsConfig::from_env(),
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
