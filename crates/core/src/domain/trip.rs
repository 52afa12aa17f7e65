use crate::error::TripError;
use serde::{Deserialize, Serialize};

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 30;

/// Trip form as submitted by the browser. Every field is free text; nothing is
/// trusted until [`TripRequest::validate`] succeeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripRequest {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub days: String,
}

/// A trip request that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTrip {
    pub destination: String,
    pub budget: String,
    pub days: u32,
    /// The day count exactly as the caller sent it; echoed back in responses.
    pub days_text: String,
}

impl TripRequest {
    pub fn new(
        destination: impl Into<String>,
        budget: impl Into<String>,
        days: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            budget: budget.into(),
            days: days.into(),
        }
    }

    pub fn validate(&self) -> Result<ValidTrip, TripError> {
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(TripError::Validation("Destination is required".into()));
        }

        let budget = self.budget.trim();
        if budget.is_empty() {
            return Err(TripError::Validation("Budget is required".into()));
        }

        let days_text = self.days.trim();
        if days_text.is_empty() {
            return Err(TripError::Validation("Days is required".into()));
        }
        let days = days_text
            .parse::<u32>()
            .ok()
            .filter(|d| (MIN_DAYS..=MAX_DAYS).contains(d))
            .ok_or_else(|| {
                TripError::Validation(format!(
                    "Days must be a number between {MIN_DAYS} and {MAX_DAYS}"
                ))
            })?;

        Ok(ValidTrip {
            destination: destination.to_string(),
            budget: budget.to_string(),
            days,
            days_text: self.days.clone(),
        })
    }
}
