use crate::config::Settings;
use crate::domain::weather::Coordinates;
use crate::geo::Geocoder;
use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.maptiler.com";
const STATIC_MAP_STYLE: &str = "basic-v2";
const STATIC_MAP_SIZE: &str = "400x300";

#[derive(Debug, Clone)]
pub struct MapTilerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MapTilerClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_maptiler_api_key()?.to_string();
        let base_url =
            std::env::var("MAPTILER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let http = crate::config::http_client("MAPTILER_TIMEOUT_SECS")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn geocoding_url(&self, place: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(self.base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid MAPTILER_BASE_URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("MAPTILER_BASE_URL cannot be a base"))?
            .pop_if_empty()
            .push("geocoding")
            .push(&format!("{place}.json"));
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Geocoder for MapTilerClient {
    fn provider_name(&self) -> &'static str {
        "maptiler"
    }

    async fn geocode(&self, place: &str) -> Result<Coordinates> {
        let url = self.geocoding_url(place)?;
        let res = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .context("MapTiler request failed")?;

        let status = res.status();
        if !status.is_success() {
            anyhow::bail!("MapTiler API error: {status}");
        }

        let parsed = res
            .json::<FeatureCollection>()
            .await
            .context("failed to parse MapTiler geocoding response")?;
        first_feature_coordinates(&parsed)
            .with_context(|| format!("Location not found: {place}"))
    }

    fn static_map_url(&self, at: Coordinates, zoom: u8) -> String {
        format!(
            "{}/maps/{STATIC_MAP_STYLE}/static/{},{},{zoom}/{STATIC_MAP_SIZE}.png?key={}",
            self.base_url.trim_end_matches('/'),
            at.lng,
            at.lat,
            self.api_key
        )
    }
}

// GeoJSON positions are [lng, lat].
fn first_feature_coordinates(collection: &FeatureCollection) -> Option<Coordinates> {
    let feature = collection.features.first()?;
    match feature.geometry.coordinates.as_slice() {
        [lng, lat, ..] => Some(Coordinates {
            lat: *lat,
            lng: *lng,
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
struct Geometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}
