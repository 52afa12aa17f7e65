use crate::error::ApiError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tripwise_core::assistant::{ChatAssistant, ConversationMessage};
use tripwise_core::domain::record::{PlannedTrip, StoredRecord};
use tripwise_core::domain::trip::{TripRequest, MAX_DAYS, MIN_DAYS};
use tripwise_core::domain::weather::Coordinates;
use tripwise_core::geo::{Geocoder, DEFAULT_MAP_ZOOM};
use tripwise_core::planner::TripPlanner;
use tripwise_core::storage::ItineraryStore;
use tripwise_core::TripError;

/// Collaborators are optional so the server can start without upstream keys;
/// requests that need a missing one fail with a configuration error.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ItineraryStore>,
    pub planner: Option<Arc<TripPlanner>>,
    pub assistant: Option<Arc<ChatAssistant>>,
    pub maps: Option<Arc<dyn Geocoder>>,
}

impl AppState {
    fn planner(&self) -> Result<&TripPlanner, TripError> {
        self.planner.as_deref().ok_or_else(|| {
            TripError::Configuration(
                "itinerary planning is unavailable (GEMINI_API_KEY, WEATHER_API_KEY and MAPTILER_API_KEY are required)"
                    .into(),
            )
        })
    }

    fn assistant(&self) -> Result<&ChatAssistant, TripError> {
        self.assistant.as_deref().ok_or_else(|| {
            TripError::Configuration("chat is unavailable (GEMINI_API_KEY is required)".into())
        })
    }

    fn maps(&self) -> Result<&dyn Geocoder, TripError> {
        self.maps.as_deref().ok_or_else(|| {
            TripError::Configuration("maps are unavailable (MAPTILER_API_KEY is required)".into())
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/itinerary", post(create_itinerary))
        .route("/itinerary/summary", post(summarize_trip))
        .route("/itinerary/:id", get(get_itinerary))
        .route("/chat", post(chat))
        .route("/map", get(map_url))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, TripError> {
    body.map(|Json(v)| v)
        .map_err(|e| TripError::Validation(format!("invalid request body: {}", e.body_text())))
}

async fn create_itinerary(
    State(state): State<AppState>,
    body: Result<Json<TripRequest>, JsonRejection>,
) -> Result<Json<PlannedTrip>, ApiError> {
    let request = json_body(body)?;
    // Validate before anything else so bad input never depends on configuration.
    request.validate()?;
    let planned = state.planner()?.plan(&request).await?;
    Ok(Json(planned))
}

async fn get_itinerary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredRecord>, ApiError> {
    state.store.get(&id).await.map(Json).ok_or(ApiError::NotFound)
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    conversation: Vec<ConversationMessage>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let req = json_body(body)?;
    let response = state
        .assistant()?
        .reply(&req.message, &req.conversation)
        .await?;
    Ok(Json(ChatResponse { response }))
}

#[derive(Debug, Deserialize)]
struct SummaryRequest {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    days: u32,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    summary: String,
}

async fn summarize_trip(
    State(state): State<AppState>,
    body: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let req = json_body(body)?;
    let destination = req.destination.trim();
    if destination.is_empty() {
        return Err(TripError::Validation("Destination is required".into()).into());
    }
    if !(MIN_DAYS..=MAX_DAYS).contains(&req.days) {
        return Err(TripError::Validation(format!(
            "Days must be a number between {MIN_DAYS} and {MAX_DAYS}"
        ))
        .into());
    }

    let summary = state.assistant()?.summarize(destination, req.days).await;
    Ok(Json(SummaryResponse { summary }))
}

#[derive(Debug, Deserialize)]
struct MapQuery {
    lat: f64,
    lng: f64,
    zoom: Option<u8>,
}

#[derive(Debug, Serialize)]
struct MapResponse {
    url: String,
}

async fn map_url(
    State(state): State<AppState>,
    query: Result<Query<MapQuery>, QueryRejection>,
) -> Result<Json<MapResponse>, ApiError> {
    let Query(q) = query
        .map_err(|e| TripError::Validation(format!("invalid query: {}", e.body_text())))?;
    let url = state.maps()?.static_map_url(
        Coordinates {
            lat: q.lat,
            lng: q.lng,
        },
        q.zoom.unwrap_or(DEFAULT_MAP_ZOOM),
    );
    Ok(Json(MapResponse { url }))
}
