//! Deterministic itinerary used when the model reply cannot be read as JSON.

use crate::domain::itinerary::{Activity, BudgetBreakdown, Itinerary, ItineraryDay, Overview};

/// Numeric value of a free-form budget string: every digit is kept, everything
/// else (currency symbols, separators, letters) is dropped. No digits reads as 0.
pub fn budget_amount(budget: &str) -> u64 {
    let digits: String = budget.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().unwrap_or(0)
}

/// Rounds half away from zero, matching how shares of a budget are displayed.
fn share(amount: f64, fraction: f64) -> u64 {
    (amount * fraction).round() as u64
}

fn dollars(amount: u64) -> String {
    format!("${amount}")
}

// Shares are rounded independently, so they need not add up to the total exactly.
const ACTIVITY_SHARES: [(&str, &str, &str, f64, &str); 4] = [
    (
        "9:00 AM",
        "Morning Exploration",
        "Start your day exploring the main attractions",
        0.3,
        "sightseeing",
    ),
    ("1:00 PM", "Local Lunch", "Try authentic local cuisine", 0.2, "food"),
    (
        "3:00 PM",
        "Afternoon Activities",
        "Cultural sites and local experiences",
        0.3,
        "culture",
    ),
    (
        "7:00 PM",
        "Evening Dining",
        "Dinner at a recommended restaurant",
        0.2,
        "food",
    ),
];

pub fn fallback_itinerary(destination: &str, budget: &str, days: u32) -> Itinerary {
    let total = budget_amount(budget);
    let daily = if days == 0 {
        0
    } else {
        (total as f64 / f64::from(days)).round() as u64
    };

    let days_out = (1..=days)
        .map(|n| ItineraryDay {
            title: format!("Day {n} in {destination}"),
            budget: dollars(daily),
            activities: ACTIVITY_SHARES
                .iter()
                .map(|(time, title, description, fraction, category)| Activity {
                    time: (*time).to_string(),
                    title: (*title).to_string(),
                    description: (*description).to_string(),
                    cost: Some(dollars(share(daily as f64, *fraction))),
                    category: (*category).to_string(),
                })
                .collect(),
        })
        .collect();

    let total = total as f64;
    Itinerary {
        overview: Overview {
            destination: destination.to_string(),
            total_days: days,
            total_budget: budget.to_string(),
            highlights: vec![
                format!("Explore {destination}'s top attractions"),
                "Experience local culture and cuisine".to_string(),
                "Visit must-see landmarks".to_string(),
                "Enjoy authentic local experiences".to_string(),
            ],
        },
        days: days_out,
        budget_breakdown: BudgetBreakdown {
            accommodation: dollars(share(total, 0.4)),
            food: dollars(share(total, 0.3)),
            activities: dollars(share(total, 0.2)),
            transportation: dollars(share(total, 0.1)),
        },
        tips: vec![
            format!("Book accommodations in {destination} in advance"),
            "Try local transportation for authentic experiences".to_string(),
            "Learn basic local phrases".to_string(),
            "Always carry local currency".to_string(),
            "Check weather forecasts before outdoor activities".to_string(),
        ],
    }
}
