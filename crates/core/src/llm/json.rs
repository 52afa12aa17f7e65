use crate::domain::itinerary::Itinerary;
use crate::error::TripError;
use serde_json::Value;

/// Outcome of reading a model reply as an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedItinerary {
    Structured(Itinerary),
    /// The reply held no parseable JSON object; carries the raw text.
    Unparseable(String),
}

/// Span from the first `{` to the last `}` of a model reply. Markdown fences,
/// language tags and surrounding prose all fall outside it, whether or not the
/// fence sits on its own line.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Reads a model reply as an itinerary.
///
/// Text with no decodable JSON object is `Unparseable` and left to the caller's
/// fallback, and so is an object whose fields have types the itinerary cannot
/// absorb. Only an object with no non-empty `days` array is a hard
/// [`TripError::Generation`].
pub fn parse_itinerary(text: &str) -> Result<ParsedItinerary, TripError> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim());
    let value = match serde_json::from_str::<Value>(json_str) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "model reply is not valid JSON");
            return Ok(ParsedItinerary::Unparseable(text.to_string()));
        }
    };

    match value.get("days") {
        Some(Value::Array(days)) if !days.is_empty() => {}
        _ => {
            return Err(TripError::Generation(
                "invalid itinerary structure".to_string(),
            ))
        }
    }

    match serde_json::from_value::<Itinerary>(value) {
        Ok(itinerary) => Ok(ParsedItinerary::Structured(itinerary)),
        Err(err) => {
            tracing::warn!(error = %err, "model itinerary has unexpected field types");
            Ok(ParsedItinerary::Unparseable(text.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn itinerary_json(days: usize) -> Value {
        let days: Vec<_> = (1..=days)
            .map(|i| {
                json!({
                    "title": format!("Day {i}"),
                    "budget": "$100",
                    "activities": [{
                        "time": "9:00 AM",
                        "title": "Castle walk",
                        "description": "Walk up to the castle",
                        "cost": "$10",
                        "category": "sightseeing"
                    }]
                })
            })
            .collect();
        json!({
            "overview": {
                "destination": "Lisbon",
                "totalDays": days.len(),
                "totalBudget": "$300",
                "highlights": ["Alfama"]
            },
            "days": days,
            "budgetBreakdown": {
                "accommodation": "$120",
                "food": "$90",
                "activities": "$60",
                "transportation": "$30"
            },
            "tips": ["Wear good shoes"]
        })
    }

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let body = "{\"a\":1}";
        let fenced = format!("```json\n{body}\n```\n");
        assert_eq!(extract_json(&fenced), Some(body));
    }

    #[test]
    fn extract_json_handles_single_line_fence() {
        let text = "```json {\"days\":[{\"title\":\"Day 1\"}]}```";
        assert_eq!(extract_json(text), Some("{\"days\":[{\"title\":\"Day 1\"}]}"));

        let ParsedItinerary::Structured(itinerary) = parse_itinerary(text).unwrap() else {
            panic!("expected structured itinerary");
        };
        assert_eq!(itinerary.days[0].title, "Day 1");
    }

    #[test]
    fn extract_json_spans_first_to_last_brace() {
        let s = "Here you go: {\"a\":{\"b\":1}} enjoy!";
        assert_eq!(extract_json(s), Some("{\"a\":{\"b\":1}}"));
        assert_eq!(extract_json("no braces here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn parses_itinerary_wrapped_in_prose() {
        let text = format!("Sure! Here is your plan:\n{}\nHave fun.", itinerary_json(3));
        let ParsedItinerary::Structured(itinerary) = parse_itinerary(&text).unwrap() else {
            panic!("expected structured itinerary");
        };
        assert_eq!(itinerary.days.len(), 3);
        assert_eq!(itinerary.overview.destination, "Lisbon");
        assert_eq!(itinerary.days[0].activities[0].cost.as_deref(), Some("$10"));
    }

    #[test]
    fn prose_reply_is_unparseable() {
        let text = "Day 1: see the castle. Day 2: eat pastel de nata.";
        assert_eq!(
            parse_itinerary(text).unwrap(),
            ParsedItinerary::Unparseable(text.to_string())
        );
    }

    #[test]
    fn broken_json_is_unparseable() {
        let text = "{\"days\": [ {\"title\": \"Day 1\", }";
        assert!(matches!(
            parse_itinerary(text).unwrap(),
            ParsedItinerary::Unparseable(_)
        ));
    }

    #[test]
    fn json_without_day_list_is_rejected() {
        for v in [
            json!({"overview": {}}),
            json!({"days": "three"}),
            json!({"days": []}),
        ] {
            let err = parse_itinerary(&v.to_string()).unwrap_err();
            assert!(matches!(err, TripError::Generation(_)), "{v}");
        }
    }

    #[test]
    fn missing_optional_sections_default() {
        let text = json!({"days": [{"title": "Day 1"}]}).to_string();
        let ParsedItinerary::Structured(itinerary) = parse_itinerary(&text).unwrap() else {
            panic!("expected structured itinerary");
        };
        assert!(itinerary.tips.is_empty());
        assert!(itinerary.days[0].activities.is_empty());
        assert_eq!(itinerary.budget_breakdown.food, "");
    }

    #[test]
    fn numeric_costs_and_string_day_counts_are_absorbed() {
        let text = format!(
            "Here is your plan: {}",
            json!({
                "overview": {"destination": "Lisbon", "totalDays": "2", "totalBudget": 600, "highlights": []},
                "days": [
                    {"title": "Day 1", "budget": 300, "activities": [
                        {"time": "9:00 AM", "title": "Tram 28", "description": "Ride", "cost": 25, "category": "transport"}
                    ]},
                    {"title": "Day 2", "budget": 300.5, "activities": []}
                ],
                "budgetBreakdown": {"accommodation": 240, "food": "$180", "activities": 120, "transportation": 60}
            })
        );
        let ParsedItinerary::Structured(itinerary) = parse_itinerary(&text).unwrap() else {
            panic!("expected structured itinerary");
        };
        assert_eq!(itinerary.overview.total_days, 2);
        assert_eq!(itinerary.overview.total_budget, "600");
        assert_eq!(itinerary.days[0].budget, "300");
        assert_eq!(itinerary.days[1].budget, "300.5");
        assert_eq!(itinerary.days[0].activities[0].cost.as_deref(), Some("25"));
        assert_eq!(itinerary.budget_breakdown.accommodation, "240");
        assert_eq!(itinerary.budget_breakdown.food, "$180");
    }

    #[test]
    fn unabsorbable_field_types_fall_back() {
        let text = json!({
            "days": [{"title": "Day 1", "activities": "walk around"}]
        })
        .to_string();
        assert!(matches!(
            parse_itinerary(&text).unwrap(),
            ParsedItinerary::Unparseable(_)
        ));
    }
}
