use crate::error::{ConfigError, RecommenderError};
use std::path::PathBuf;

pub const DEFAULT_MODEL_NAME: &str = "llama-3.1-8b-instant";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_DATA_PATH: &str = "data/anime_with_synopsis.csv";
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 10;

/// Number of documents the retriever hands to the prompt.
pub const RETRIEVER_TOP_K: usize = 3;

/// Runtime configuration shared by the pipeline and the API server.
#[derive(Debug, Clone)]
pub struct Settings {
    pub groq_api_key: String,
    pub model_name: String,
    pub groq_base_url: String,
    /// Sampling temperature; zero keeps answers deterministic.
    pub temperature: f32,
    pub data_path: PathBuf,
    pub vector_store_path: Option<PathBuf>,
    pub api_address: String,
    pub rate_limit_per_minute: u32,
}

impl Settings {
    /// Startup entry point: like [`Settings::from_env`], with configuration
    /// problems reported as [`RecommenderError::Config`].
    pub fn load() -> crate::error::Result<Self> {
        Self::from_env().map_err(RecommenderError::from)
    }

    pub fn load_from<F>(lookup: F) -> crate::error::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(lookup).map_err(RecommenderError::from)
    }

    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let groq_api_key = get("GROQ_API_KEY").ok_or(ConfigError::MissingVar("GROQ_API_KEY"))?;

        let groq_base_url = get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string());
        if !(groq_base_url.starts_with("http://") || groq_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidFormat {
                var: "GROQ_BASE_URL",
                reason: "must start with http:// or https://",
            });
        }

        let rate_limit_per_minute = match get("RATE_LIMIT_PER_MINUTE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: "RATE_LIMIT_PER_MINUTE",
                        reason: "expected a positive integer",
                    })
                }
            },
            None => DEFAULT_RATE_LIMIT_PER_MINUTE,
        };

        Ok(Self {
            groq_api_key,
            model_name: get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            groq_base_url: groq_base_url.trim_end_matches('/').to_string(),
            temperature: 0.0,
            data_path: get("ANIME_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            vector_store_path: get("VECTOR_STORE_PATH").map(PathBuf::from),
            api_address: get("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string()),
            rate_limit_per_minute,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let settings = Settings::from_lookup(lookup(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(settings.model_name, DEFAULT_MODEL_NAME);
        assert_eq!(settings.groq_base_url, DEFAULT_GROQ_BASE_URL);
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.api_address, DEFAULT_API_ADDRESS);
        assert_eq!(settings.rate_limit_per_minute, 10);
        assert!(settings.vector_store_path.is_none());
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        let err = Settings::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("GROQ_API_KEY"));

        let err = Settings::from_lookup(lookup(&[("GROQ_API_KEY", "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("GROQ_API_KEY"));
    }

    #[test]
    fn startup_loading_reports_config_failures() {
        let err = Settings::load_from(lookup(&[("GROQ_API_KEY", "k"), ("RATE_LIMIT_PER_MINUTE", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            RecommenderError::Config(ConfigError::InvalidNumber { var: "RATE_LIMIT_PER_MINUTE", .. })
        ));
        assert!(err.to_string().starts_with("invalid number in RATE_LIMIT_PER_MINUTE"));

        assert!(Settings::load_from(lookup(&[("GROQ_API_KEY", "k")])).is_ok());
    }

    #[test]
    fn overrides_are_read() {
        let settings = Settings::from_lookup(lookup(&[
            ("GROQ_API_KEY", "k"),
            ("MODEL_NAME", "llama-3.3-70b-versatile"),
            ("GROQ_BASE_URL", "http://localhost:9999/v1/"),
            ("RATE_LIMIT_PER_MINUTE", "30"),
            ("VECTOR_STORE_PATH", "store.json"),
        ]))
        .unwrap();
        assert_eq!(settings.model_name, "llama-3.3-70b-versatile");
        assert_eq!(settings.groq_base_url, "http://localhost:9999/v1");
        assert_eq!(settings.rate_limit_per_minute, 30);
        assert_eq!(settings.vector_store_path, Some(PathBuf::from("store.json")));
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = Settings::from_lookup(lookup(&[
            ("GROQ_API_KEY", "k"),
            ("RATE_LIMIT_PER_MINUTE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: "RATE_LIMIT_PER_MINUTE", .. }));

        let err = Settings::from_lookup(lookup(&[
            ("GROQ_API_KEY", "k"),
            ("GROQ_BASE_URL", "api.groq.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat { var: "GROQ_BASE_URL", .. }));
    }
}
