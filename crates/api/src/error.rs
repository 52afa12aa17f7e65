use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tripwise_core::TripError;

/// Response-side error. Every pipeline failure is a flat 500 with the error
/// message; only lookups of unknown ids are distinguished.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Trip(TripError),
}

impl From<TripError> for ApiError {
    fn from(e: TripError) -> Self {
        ApiError::Trip(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Trip(err) => {
                if err.is_validation() {
                    tracing::warn!(error = %err, "rejected request");
                } else {
                    sentry::capture_error(&err);
                    tracing::error!(error = %err, "request failed");
                }
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (code, Json(serde_json::json!({ "message": message }))).into_response()
    }
}
