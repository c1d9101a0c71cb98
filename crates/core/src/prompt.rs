use serde_json::json;

use crate::catalog::ISLAND_DESTINATIONS;
use crate::models::{TravelMode, TripRequest, CURRENCY_CODE, CURRENCY_SYMBOL};

fn mode_description(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Cheap => {
            "budget-friendly with hostels, street food, public transport, and free attractions"
        }
        TravelMode::Balanced => {
            "mid-range with comfortable hotels, local restaurants, and a mix of paid/free activities"
        }
        TravelMode::Premium => {
            "luxury with 5-star hotels, fine dining, private tours, and VIP experiences"
        }
    }
}

/// Per-person daily spend band as (low, high). Premium has no ceiling.
pub fn daily_budget_band(mode: TravelMode) -> (u64, Option<u64>) {
    match mode {
        TravelMode::Cheap => (800, Some(1_500)),
        TravelMode::Balanced => (2_000, Some(4_000)),
        TravelMode::Premium => (8_000, None),
    }
}

fn band_label(low: u64, high: Option<u64>) -> String {
    match high {
        Some(high) => format!("{CURRENCY_SYMBOL}{low}-{high}"),
        None => format!("{CURRENCY_SYMBOL}{low}+"),
    }
}

fn transport_rule(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Cheap => "recommend the absolute cheapest option (usually Bus or a Sleeper Train)",
        TravelMode::Balanced => "recommend Train (3AC/2AC), or Flight if the fare is competitive",
        TravelMode::Premium => "recommend Flight (direct or business where possible)",
    }
}

fn response_shape(request: &TripRequest) -> serde_json::Value {
    let option = |kind: &str, cost: u64, duration: &str, details: String, recommended: bool| {
        json!({
            "type": kind,
            "estimatedCost": cost,
            "duration": duration,
            "details": details,
            "recommended": recommended,
        })
    };
    let meal = json!({ "place": "Restaurant name", "cuisine": "Type", "estimatedCost": 0 });

    json!({
        "tripSummary": {
            "from": request.from,
            "to": request.to,
            "startDate": request.start_date.to_string(),
            "endDate": request.end_date.to_string(),
            "totalDays": request.num_days(),
            "travelers": request.travelers,
            "mode": request.mode.as_str(),
            "estimatedTotalCost": "total cost with currency symbol",
            "estimatedTravelCost": "outbound plus return fare (number only)",
            "currency": CURRENCY_CODE,
            "currencySymbol": CURRENCY_SYMBOL,
        },
        "route": {
            "overview": "Brief description of the outbound route",
            "transportation": "Main recommended transportation method",
            "travelOptions": [
                option("Flight", 5000, "2h 15m", format!("Direct flight from {} to {}", request.from, request.to), true),
                option("Train", 1200, "16h 00m", "Sleeper/AC classes available".to_string(), false),
                option("Bus", 800, "18h 30m", "AC Volvo or sleeper buses".to_string(), false),
            ],
        },
        "returnRoute": {
            "overview": "Brief description of the return route",
            "transportation": "Main recommended transportation method",
            "travelOptions": [
                option("Flight", 5000, "2h 15m", format!("Direct flight from {} to {}", request.to, request.from), true),
            ],
        },
        "days": [{
            "day": 1,
            "date": "YYYY-MM-DD",
            "title": "Catchy day title",
            "activities": [{
                "time": "09:00 AM",
                "activity": "Activity name",
                "description": "Brief description",
                "location": "Specific location",
                "estimatedCost": 0,
                "duration": "2 hours",
                "tips": "Helpful tip",
            }],
            "meals": { "breakfast": meal.clone(), "lunch": meal.clone(), "dinner": meal },
            "accommodation": {
                "name": "Hotel/Hostel name",
                "type": "Hotel/Hostel/Airbnb",
                "estimatedCost": 0,
                "location": "Area/Neighborhood",
            },
            "dailyTotal": 0,
        }],
        "packingTips": ["tip1", "tip2", "tip3"],
        "localTips": ["tip1", "tip2", "tip3"],
    })
}

/// Renders the instruction text sent to the completion model.
///
/// The prompt is a pure function of the request so that a given trip always
/// produces the same model input.
pub fn build_prompt(request: &TripRequest) -> String {
    let days = request.num_days();
    let travelers = request.travelers;
    let mode = request.mode;
    let (low, high) = daily_budget_band(mode);
    let group_band = band_label(low * travelers as u64, high.map(|h| h * travelers as u64));
    let islands = ISLAND_DESTINATIONS
        .iter()
        .map(|name| {
            let mut chars = name.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(", ");
    let shape = serde_json::to_string_pretty(&response_shape(request)).unwrap_or_default();

    format!(
        "You are a professional travel planner. Generate a detailed {days}-day travel itinerary from {from} to {to} for {travelers} traveler(s).

Trip details:
- Start date: {start}
- End date: {end}
- Travelers: {travelers}
- Budget mode: {mode_upper} ({mode_description})
- Daily budget: {person_band}/day per person

COST RULES:
- Every amount is in Indian Rupees ({CURRENCY_CODE}).
- Every amount is the TOTAL for all {travelers} travelers combined, not per person.
- The daily total for the whole group should be about {group_band}.
- Accommodation covers every traveler (two per room), meals cover every traveler, and activity costs are total entry fees.
- Use realistic Indian domestic prices.

GEOGRAPHY:
- If {from} or {to} is an island ({islands}), offer ONLY Flight and Ship/Ferry options. Train and bus are impossible.
- Andaman/Nicobar: ships sail 3-4 times per month from Chennai/Kolkata (50-60 hour journey).
- Lakshadweep: flights only, from Kochi.
- Island flights typically cost {CURRENCY_SYMBOL}8,000-15,000 per person.

Respond with JSON in exactly this structure (no markdown, no commentary):
{shape}

Requirements:
1. The \"days\" array has exactly {days} entries, one per date from {start} to {end}.
2. Activities are specific to {to} and never repeat across days. Long trips include day trips to nearby places.
3. Breakfast, lunch and dinner are at a different venue every day.
4. Every day has a unique, descriptive title. Never use \"Day X Adventure\" style titles.
5. Name real transit services: specific trains with number and class (3AC, 2AC, SL), specific bus operators.
6. Mark exactly one recommended option per route. For {mode_name} mode, {transport_rule}.
7. The recommended option's details give the full route plan with costs.
8. tripSummary.estimatedTravelCost equals the recommended outbound fare plus the recommended return fare.
9. Only destinations and routes inside India.

Return ONLY valid JSON.",
        from = request.from,
        to = request.to,
        start = request.start_date,
        end = request.end_date,
        mode_upper = mode.as_str().to_uppercase(),
        mode_description = mode_description(mode),
        person_band = band_label(low, high),
        mode_name = mode.as_str(),
        transport_rule = transport_rule(mode),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(mode: TravelMode, travelers: u32) -> TripRequest {
        TripRequest {
            from: "Mumbai".to_string(),
            to: "Goa".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            mode,
            travelers,
        }
    }

    #[test]
    fn carries_trip_parameters_and_group_budget() {
        let prompt = build_prompt(&request(TravelMode::Balanced, 4));
        assert!(prompt.contains("4-day travel itinerary from Mumbai to Goa for 4 traveler(s)"));
        assert!(prompt.contains("BALANCED (mid-range with comfortable hotels"));
        assert!(prompt.contains("₹2000-4000/day per person"));
        assert!(prompt.contains("about ₹8000-16000"));
        assert!(prompt.contains("Andaman, Nicobar, Lakshadweep"));
    }

    #[test]
    fn premium_band_is_open_ended() {
        let prompt = build_prompt(&request(TravelMode::Premium, 1));
        assert!(prompt.contains("₹8000+/day per person"));
        assert!(prompt.contains("recommend Flight"));
    }

    #[test]
    fn embeds_a_parseable_response_shape() {
        let prompt = build_prompt(&request(TravelMode::Cheap, 2));
        let start = prompt.find("{\n").unwrap();
        let end = prompt.rfind('}').unwrap();
        let shape: serde_json::Value = serde_json::from_str(&prompt[start..=end]).unwrap();
        assert_eq!(shape["tripSummary"]["totalDays"], 4);
        assert_eq!(shape["tripSummary"]["mode"], "cheap");
        assert_eq!(shape["returnRoute"]["travelOptions"][0]["details"], "Direct flight from Goa to Mumbai");
    }

    #[test]
    fn sections_follow_in_order() {
        let prompt = build_prompt(&request(TravelMode::Balanced, 2));
        let positions = ["Trip details:", "COST RULES:", "GEOGRAPHY:", "Requirements:"]
            .map(|heading| prompt.find(heading).unwrap());
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(prompt.contains("1. The \"days\" array has exactly 4 entries, one per date from 2025-01-10 to 2025-01-13."));
        assert!(prompt.ends_with("Return ONLY valid JSON."));
    }

    #[test]
    fn is_deterministic() {
        let trip = request(TravelMode::Cheap, 3);
        assert_eq!(build_prompt(&trip), build_prompt(&trip));
    }
}
