pub mod maptiler;

use crate::domain::weather::Coordinates;

pub const DEFAULT_MAP_ZOOM: u8 = 12;

#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Resolves a free-text place name to the best-matching point.
    async fn geocode(&self, place: &str) -> anyhow::Result<Coordinates>;

    /// URL of a static map image centred on `at`.
    fn static_map_url(&self, at: Coordinates, zoom: u8) -> String;
}
