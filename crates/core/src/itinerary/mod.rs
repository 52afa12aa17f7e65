pub mod fallback;

use crate::domain::itinerary::Itinerary;
use crate::domain::weather::{Coordinates, WeatherSummary};
use crate::error::TripError;
use crate::llm::json::{self, ParsedItinerary};
use crate::llm::{CompletionRequest, LlmClient};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ItineraryInput {
    pub destination: String,
    pub budget: String,
    pub days: u32,
    pub weather: WeatherSummary,
    pub coordinates: Coordinates,
}

/// How the model is asked for the itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Provider enforces the itinerary JSON schema.
    Schema,
    /// Plain text; the first `{...}` span is extracted and parsed.
    FreeText,
}

impl OutputMode {
    pub fn from_env() -> Self {
        match std::env::var("GEMINI_STRUCTURED_OUTPUT") {
            Ok(v) if matches!(v.trim(), "0" | "false" | "no" | "off") => OutputMode::FreeText,
            _ => OutputMode::Schema,
        }
    }
}

pub struct ItineraryGenerator {
    llm: Arc<dyn LlmClient>,
    mode: OutputMode,
}

impl ItineraryGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, mode: OutputMode) -> Self {
        Self { llm, mode }
    }

    pub async fn generate(&self, input: &ItineraryInput) -> Result<Itinerary, TripError> {
        let mut req = CompletionRequest::prompt(user_prompt(input)).with_system(system_prompt());
        if self.mode == OutputMode::Schema {
            req = req.with_schema(itinerary_schema());
        }

        let text = self
            .llm
            .complete(req)
            .await
            .map_err(|e| TripError::upstream("AI provider", e))?;
        if text.trim().is_empty() {
            return Err(TripError::Generation(format!(
                "empty response from {:?}",
                self.llm.provider()
            )));
        }

        let itinerary = match json::parse_itinerary(&text)? {
            ParsedItinerary::Structured(itinerary) => itinerary,
            ParsedItinerary::Unparseable(raw) => {
                tracing::warn!(
                    destination = %input.destination,
                    raw_len = raw.len(),
                    "model reply is not JSON; using fallback itinerary"
                );
                fallback::fallback_itinerary(&input.destination, &input.budget, input.days)
            }
        };

        if itinerary.days.is_empty() {
            return Err(TripError::Generation(
                "invalid itinerary structure".to_string(),
            ));
        }

        if itinerary.days.len() != input.days as usize {
            tracing::warn!(
                destination = %input.destination,
                expected = input.days,
                got = itinerary.days.len(),
                "itinerary day count differs from request"
            );
        }

        Ok(itinerary)
    }
}

fn system_prompt() -> String {
    [
        "You are an expert travel planner. Create a detailed, personalized travel itinerary based on the provided information.",
        "",
        "Consider the following:",
        "- Weather conditions and seasonal activities",
        "- Budget constraints and cost-effective recommendations",
        "- Popular attractions and hidden gems",
        "- Local culture, food, and experiences",
        "- Practical transportation and timing",
        "- Realistic daily budgets and activity costs",
        "",
        "Return ONLY a single JSON object with this shape:",
        "{",
        "  \"overview\": {\"destination\": \"...\", \"totalDays\": 3, \"totalBudget\": \"...\", \"highlights\": [\"...\"]},",
        "  \"days\": [",
        "    {\"title\": \"...\", \"budget\": \"...\", \"activities\": [",
        "      {\"time\": \"9:00 AM\", \"title\": \"...\", \"description\": \"...\", \"cost\": \"...\", \"category\": \"sightseeing\"}",
        "    ]}",
        "  ],",
        "  \"budgetBreakdown\": {\"accommodation\": \"...\", \"food\": \"...\", \"activities\": \"...\", \"transportation\": \"...\"},",
        "  \"tips\": [\"...\"]",
        "}",
    ]
    .join("\n")
}

fn user_prompt(input: &ItineraryInput) -> String {
    let forecast = serde_json::to_string(&input.weather).unwrap_or_default();
    format!(
        "Create a {days}-day travel itinerary for {destination} with a total budget of {budget}.\n\n\
Weather forecast: {forecast}\n\
Location coordinates: {lat}, {lng}\n\n\
Requirements:\n\
- Exactly {days} entries in \"days\", one per day\n\
- Daily activities with specific times and costs\n\
- Budget breakdown across categories\n\
- Consider weather conditions for activity recommendations\n\
- Include mix of must-see attractions and local experiences\n\
- Provide realistic cost estimates in local currency\n\
- Include transportation recommendations\n\
- Add practical tips for travelers",
        days = input.days,
        destination = input.destination,
        budget = input.budget,
        lat = input.coordinates.lat,
        lng = input.coordinates.lng,
    )
}

/// Response schema in the provider's OpenAPI subset; mirrors [`Itinerary`].
pub fn itinerary_schema() -> serde_json::Value {
    let string = serde_json::json!({"type": "STRING"});
    let strings = serde_json::json!({"type": "ARRAY", "items": {"type": "STRING"}});

    serde_json::json!({
        "type": "OBJECT",
        "required": ["overview", "days", "budgetBreakdown", "tips"],
        "properties": {
            "overview": {
                "type": "OBJECT",
                "required": ["destination", "totalDays", "totalBudget", "highlights"],
                "properties": {
                    "destination": string,
                    "totalDays": {"type": "INTEGER"},
                    "totalBudget": string,
                    "highlights": strings,
                }
            },
            "days": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "required": ["title", "budget", "activities"],
                    "properties": {
                        "title": string,
                        "budget": string,
                        "activities": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "required": ["time", "title", "description", "category"],
                                "properties": {
                                    "time": string,
                                    "title": string,
                                    "description": string,
                                    "cost": string,
                                    "category": string,
                                }
                            }
                        }
                    }
                }
            },
            "budgetBreakdown": {
                "type": "OBJECT",
                "required": ["accommodation", "food", "activities", "transportation"],
                "properties": {
                    "accommodation": string,
                    "food": string,
                    "activities": string,
                    "transportation": string,
                }
            },
            "tips": strings,
        }
    })
}
