use thiserror::Error;

/// Failure taxonomy of an itinerary request. Every variant surfaces to the
/// caller as a flat message; none of them are retried.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("{0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{service} error: {detail}")]
    Upstream {
        service: &'static str,
        detail: String,
    },

    #[error("failed to generate itinerary: {0}")]
    Generation(String),
}

impl TripError {
    pub fn upstream(service: &'static str, err: anyhow::Error) -> Self {
        TripError::Upstream {
            service,
            detail: format!("{err:#}"),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TripError::Validation(_))
    }
}
