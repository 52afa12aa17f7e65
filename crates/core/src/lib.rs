pub mod assistant;
pub mod domain;
pub mod error;
pub mod geo;
pub mod itinerary;
pub mod llm;
pub mod planner;
pub mod storage;
pub mod weather;

pub use error::TripError;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub gemini_api_key: Option<String>,
        pub weather_api_key: Option<String>,
        pub maptiler_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                gemini_api_key: non_empty_var("GEMINI_API_KEY"),
                weather_api_key: non_empty_var("WEATHER_API_KEY"),
                maptiler_api_key: non_empty_var("MAPTILER_API_KEY"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_gemini_api_key(&self) -> anyhow::Result<&str> {
            self.gemini_api_key
                .as_deref()
                .context("GEMINI_API_KEY is required")
        }

        pub fn require_weather_api_key(&self) -> anyhow::Result<&str> {
            self.weather_api_key
                .as_deref()
                .context("WEATHER_API_KEY is required")
        }

        pub fn require_maptiler_api_key(&self) -> anyhow::Result<&str> {
            self.maptiler_api_key
                .as_deref()
                .context("MAPTILER_API_KEY is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Builds an HTTP client for an upstream service. A timeout is only applied when
    /// `timeout_env` is set; otherwise the transport default holds.
    pub fn http_client(timeout_env: &str) -> anyhow::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = std::env::var(timeout_env)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .with_context(|| format!("failed to build http client ({timeout_env})"))
    }
}
