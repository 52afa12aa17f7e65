use crate::domain::itinerary::Itinerary;
use crate::domain::weather::{Coordinates, WeatherSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything needed to store a record except the id and creation time, which
/// the store assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub destination: String,
    pub budget: String,
    pub days: String,
    pub itinerary: Option<Itinerary>,
    pub weather: Option<WeatherSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: Uuid,
    pub destination: String,
    pub budget: String,
    pub days: String,
    pub itinerary: Option<Itinerary>,
    pub weather: Option<WeatherSummary>,
    pub created_at: DateTime<Utc>,
}

/// Response body of a successful planning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedTrip {
    pub id: Uuid,
    pub destination: String,
    pub budget: String,
    pub days: String,
    pub itinerary: Itinerary,
    pub weather: WeatherSummary,
    pub coordinates: Coordinates,
}
