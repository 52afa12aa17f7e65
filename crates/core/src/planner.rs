use crate::config::Settings;
use crate::domain::record::{NewRecord, PlannedTrip};
use crate::domain::trip::TripRequest;
use crate::error::TripError;
use crate::geo::maptiler::MapTilerClient;
use crate::geo::Geocoder;
use crate::itinerary::{ItineraryGenerator, ItineraryInput, OutputMode};
use crate::llm::LlmClient;
use crate::storage::ItineraryStore;
use crate::weather::weatherapi::WeatherApiClient;
use crate::weather::WeatherProvider;
use std::sync::Arc;

/// Runs one trip request end to end: validate, geocode, fetch weather, generate
/// the itinerary, store it. Stages run strictly in order and the first failure
/// aborts the rest; the store is only written once everything else succeeded.
pub struct TripPlanner {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    generator: ItineraryGenerator,
    store: Arc<ItineraryStore>,
}

impl TripPlanner {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        generator: ItineraryGenerator,
        store: Arc<ItineraryStore>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            generator,
            store,
        }
    }

    /// Wires the production clients. Fails when any upstream key is missing.
    pub fn from_settings(
        settings: &Settings,
        llm: Arc<dyn LlmClient>,
        store: Arc<ItineraryStore>,
    ) -> anyhow::Result<Self> {
        let geocoder = Arc::new(MapTilerClient::from_settings(settings)?);
        let weather = Arc::new(WeatherApiClient::from_settings(settings)?);
        let generator = ItineraryGenerator::new(llm, OutputMode::from_env());
        Ok(Self::new(geocoder, weather, generator, store))
    }

    pub async fn plan(&self, request: &TripRequest) -> Result<PlannedTrip, TripError> {
        let trip = request.validate()?;
        tracing::info!(destination = %trip.destination, days = trip.days, "planning trip");

        let coordinates = self
            .geocoder
            .geocode(&trip.destination)
            .await
            .map_err(|e| TripError::upstream(self.geocoder.provider_name(), e))?;
        tracing::debug!(lat = coordinates.lat, lng = coordinates.lng, "resolved destination");

        let weather = self
            .weather
            .forecast(&trip.destination, trip.days)
            .await
            .map_err(|e| TripError::upstream(self.weather.provider_name(), e))?;
        tracing::debug!(forecast_days = weather.forecast.len(), "fetched weather");

        let input = ItineraryInput {
            destination: trip.destination.clone(),
            budget: trip.budget.clone(),
            days: trip.days,
            weather,
            coordinates,
        };
        let itinerary = self.generator.generate(&input).await?;

        let stored = self
            .store
            .put(NewRecord {
                destination: trip.destination.clone(),
                budget: trip.budget.clone(),
                days: trip.days_text.clone(),
                itinerary: Some(itinerary.clone()),
                weather: Some(input.weather.clone()),
            })
            .await;
        tracing::info!(id = %stored.id, destination = %trip.destination, "itinerary stored");

        Ok(PlannedTrip {
            id: stored.id,
            destination: trip.destination,
            budget: trip.budget,
            days: trip.days_text,
            itinerary,
            weather: input.weather,
            coordinates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::{Coordinates, WeatherSummary};
    use crate::itinerary::tests::{day_list_json, sample_weather, ScriptedLlm};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    pub(crate) struct FixedGeocoder {
        pub(crate) calls: AtomicUsize,
        pub(crate) fail: bool,
    }

    #[async_trait::async_trait]
    impl Geocoder for FixedGeocoder {
        fn provider_name(&self) -> &'static str {
            "fixed-geocoder"
        }

        async fn geocode(&self, place: &str) -> anyhow::Result<Coordinates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("Location not found: {place}");
            }
            Ok(Coordinates {
                lat: 41.9028,
                lng: 12.4964,
            })
        }

        fn static_map_url(&self, at: Coordinates, zoom: u8) -> String {
            format!("map://{},{},{zoom}", at.lng, at.lat)
        }
    }

    #[derive(Default)]
    pub(crate) struct FixedWeather {
        pub(crate) calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl WeatherProvider for FixedWeather {
        fn provider_name(&self) -> &'static str {
            "fixed-weather"
        }

        async fn forecast(&self, _place: &str, _days: u32) -> anyhow::Result<WeatherSummary> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_weather())
        }
    }

    struct Harness {
        planner: TripPlanner,
        geocoder: Arc<FixedGeocoder>,
        weather: Arc<FixedWeather>,
        llm: Arc<ScriptedLlm>,
        store: Arc<ItineraryStore>,
    }

    fn harness(llm: Arc<ScriptedLlm>, geocoder: FixedGeocoder) -> Harness {
        let geocoder = Arc::new(geocoder);
        let weather = Arc::new(FixedWeather::default());
        let store = Arc::new(ItineraryStore::new());
        let planner = TripPlanner::new(
            geocoder.clone(),
            weather.clone(),
            ItineraryGenerator::new(llm.clone(), OutputMode::Schema),
            store.clone(),
        );
        Harness {
            planner,
            geocoder,
            weather,
            llm,
            store,
        }
    }

    #[tokio::test]
    async fn invalid_request_makes_no_upstream_calls() {
        let h = harness(ScriptedLlm::replying(day_list_json(3)), FixedGeocoder::default());
        for req in [
            TripRequest::new("Rome", "$900", "0"),
            TripRequest::new("Rome", "$900", "31"),
            TripRequest::new("Rome", "$900", "abc"),
            TripRequest::new("", "$900", "3"),
        ] {
            let err = h.planner.plan(&req).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
        assert!(h.llm.requests.lock().unwrap().is_empty());
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn successful_plan_is_stored_and_returned() {
        let h = harness(ScriptedLlm::replying(day_list_json(3)), FixedGeocoder::default());
        let planned = h
            .planner
            .plan(&TripRequest::new("Rome", "$900", "3"))
            .await
            .unwrap();

        assert_eq!(planned.destination, "Rome");
        assert_eq!(planned.days, "3");
        assert_eq!(planned.coordinates.lat, 41.9028);
        assert_eq!(planned.itinerary.days.len(), 3);

        let stored = h.store.get(&planned.id.to_string()).await.unwrap();
        assert_eq!(stored.itinerary.as_ref(), Some(&planned.itinerary));
        assert_eq!(stored.weather.as_ref(), Some(&planned.weather));
        assert_eq!(stored.budget, "$900");
    }

    #[tokio::test]
    async fn geocoder_failure_stops_pipeline() {
        let h = harness(
            ScriptedLlm::replying(day_list_json(3)),
            FixedGeocoder {
                fail: true,
                ..Default::default()
            },
        );
        let err = h
            .planner
            .plan(&TripRequest::new("Atlantis", "$900", "3"))
            .await
            .unwrap_err();
        assert!(matches!(err, TripError::Upstream { service: "fixed-geocoder", .. }));
        assert!(err.to_string().contains("Location not found: Atlantis"));
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
        assert!(h.llm.requests.lock().unwrap().is_empty());
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn empty_ai_reply_stores_nothing() {
        let h = harness(ScriptedLlm::replying(""), FixedGeocoder::default());
        let err = h
            .planner
            .plan(&TripRequest::new("Rome", "$900", "3"))
            .await
            .unwrap_err();
        assert!(matches!(err, TripError::Generation(_)));
        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn day_count_mismatch_still_succeeds() {
        let h = harness(ScriptedLlm::replying(day_list_json(4)), FixedGeocoder::default());
        let planned = h
            .planner
            .plan(&TripRequest::new("Rome", "$900", "6"))
            .await
            .unwrap();
        assert_eq!(planned.itinerary.days.len(), 4);
        assert_eq!(h.store.len().await, 1);
    }
}
