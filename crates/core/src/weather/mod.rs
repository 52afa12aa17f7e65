pub mod weatherapi;

use crate::domain::weather::WeatherSummary;

/// Most forecast days the provider returns for a single request.
pub const MAX_FORECAST_DAYS: u32 = 10;

#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Current conditions plus a forecast covering up to `days` days
    /// (capped at [`MAX_FORECAST_DAYS`]).
    async fn forecast(&self, place: &str, days: u32) -> anyhow::Result<WeatherSummary>;
}
