use crate::config::Settings;
use crate::domain::weather::{CurrentWeather, ForecastDay, WeatherSummary};
use crate::weather::{WeatherProvider, MAX_FORECAST_DAYS};
use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";
const FORECAST_PATH: &str = "/v1/forecast.json";

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_weather_api_key()?.to_string();
        let base_url =
            std::env::var("WEATHER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let http = crate::config::http_client("WEATHER_TIMEOUT_SECS")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}{FORECAST_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// Query pairs for one forecast call. `days` is capped at what the provider serves.
    fn query(&self, place: &str, days: u32) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.api_key.clone()),
            ("q", place.to_string()),
            ("days", days.min(MAX_FORECAST_DAYS).to_string()),
            ("aqi", "no".to_string()),
            ("alerts", "no".to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl WeatherProvider for WeatherApiClient {
    fn provider_name(&self) -> &'static str {
        "weatherapi"
    }

    async fn forecast(&self, place: &str, days: u32) -> Result<WeatherSummary> {
        let res = self
            .http
            .get(self.url())
            .query(&self.query(place, days))
            .send()
            .await
            .context("weather request failed")?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("Weather API error: {status}");
        }

        let parsed = res
            .json::<ForecastResponse>()
            .await
            .context("failed to parse weather forecast response")?;
        Ok(summarize(parsed))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ForecastResponse {
    current: Current,
    forecast: Forecast,
}

#[derive(Debug, Clone, Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
}

#[derive(Debug, Clone, Deserialize)]
struct Condition {
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Forecast {
    #[serde(default)]
    forecastday: Vec<ForecastDayRaw>,
}

#[derive(Debug, Clone, Deserialize)]
struct ForecastDayRaw {
    date: String,
    day: DaySummary,
}

#[derive(Debug, Clone, Deserialize)]
struct DaySummary {
    maxtemp_c: f64,
    mintemp_c: f64,
    condition: Condition,
}

fn summarize(res: ForecastResponse) -> WeatherSummary {
    WeatherSummary {
        current: CurrentWeather {
            temperature: res.current.temp_c,
            condition: res.current.condition.text,
            icon: res.current.condition.icon,
        },
        forecast: res
            .forecast
            .forecastday
            .into_iter()
            .map(|d| ForecastDay {
                date: d.date,
                max_temp: d.day.maxtemp_c,
                min_temp: d.day.mintemp_c,
                condition: d.day.condition.text,
                icon: d.day.condition.icon,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_provider_forecast() {
        let v = json!({
            "location": {"name": "Lisbon", "country": "Portugal"},
            "current": {
                "temp_c": 19.0,
                "condition": {"text": "Sunny", "icon": "//cdn/113.png", "code": 1000}
            },
            "forecast": {
                "forecastday": [
                    {
                        "date": "2026-10-16",
                        "day": {
                            "maxtemp_c": 22.4,
                            "mintemp_c": 14.1,
                            "condition": {"text": "Sunny", "icon": "//cdn/113.png"}
                        }
                    },
                    {
                        "date": "2026-10-17",
                        "day": {
                            "maxtemp_c": 20.0,
                            "mintemp_c": 13.0,
                            "condition": {"text": "Patchy rain nearby", "icon": "//cdn/176.png"}
                        }
                    }
                ]
            }
        });

        let parsed: ForecastResponse = serde_json::from_value(v).unwrap();
        let summary = summarize(parsed);
        assert_eq!(summary.current.temperature, 19.0);
        assert_eq!(summary.current.condition, "Sunny");
        assert_eq!(summary.forecast.len(), 2);
        assert_eq!(summary.forecast[1].date, "2026-10-17");
        assert_eq!(summary.forecast[1].condition, "Patchy rain nearby");

        let out = serde_json::to_value(&summary.forecast[0]).unwrap();
        assert_eq!(out["maxTemp"], 22.4);
        assert_eq!(out["minTemp"], 14.1);
    }

    fn client() -> WeatherApiClient {
        WeatherApiClient {
            http: reqwest::Client::new(),
            base_url: "http://weather.test/".to_string(),
            api_key: "k".to_string(),
        }
    }

    fn days_param<'a>(pairs: &'a [(&'static str, String)]) -> &'a str {
        pairs
            .iter()
            .find(|(k, _)| *k == "days")
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn forecast_days_are_capped() {
        let c = client();
        assert_eq!(days_param(&c.query("Rome", 15)), "10");
        assert_eq!(days_param(&c.query("Rome", 10)), "10");
        assert_eq!(days_param(&c.query("Rome", 3)), "3");

        let q = c.query("Rome, Italy", 3);
        assert!(q.contains(&("q", "Rome, Italy".to_string())));
        assert!(q.contains(&("key", "k".to_string())));
        assert_eq!(c.url(), "http://weather.test/v1/forecast.json");
    }

    #[test]
    fn rejects_response_without_current_block() {
        let v = json!({"forecast": {"forecastday": []}});
        assert!(serde_json::from_value::<ForecastResponse>(v).is_err());
    }
}
