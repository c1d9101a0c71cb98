use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::error::PlanError;
use crate::extract::decode_model_text;
use crate::models::{
    Accommodation, Activity, DayPlan, Meal, Meals, RouteInfo, Rupees, TravelOption, TripPlan,
    TripRequest, TripSummary,
};
use crate::transport::{preferred_transport, reassign_recommended, Geography, TransportKind};

/// Ceiling for any single coerced cost (₹100 crore). Larger model values are
/// clamped so that plan totals stay far from `u64` overflow.
pub const MAX_ITEM_AMOUNT: Rupees = 1_000_000_000;

/// Turns raw model text into a plan whose totals are derived from its leaf
/// costs. Fails with [`PlanError::MalformedResponse`] when no usable object can
/// be recovered.
pub fn normalize(raw: &str, request: &TripRequest) -> Result<TripPlan, PlanError> {
    let value = decode_model_text(raw)?;
    plan_from_value(&value, request)
}

/// Converts an untyped plan tree into a [`TripPlan`], recomputing every
/// aggregate on the way. Totals supplied by the model are ignored.
pub fn plan_from_value(value: &Value, request: &TripRequest) -> Result<TripPlan, PlanError> {
    let raw_days = value
        .get("days")
        .and_then(Value::as_array)
        .ok_or_else(|| PlanError::malformed("model reply has no days array"))?;

    let expected = request.num_days() as usize;
    if raw_days.len() != expected {
        return Err(PlanError::malformed(format!(
            "model reply covers {} days, expected {}",
            raw_days.len(),
            expected
        )));
    }

    let mut seen_titles = HashSet::new();
    let days = raw_days
        .iter()
        .enumerate()
        .map(|(index, raw)| day_from_value(raw, index as u32, request, &mut seen_titles))
        .collect::<Vec<_>>();

    let preferred = preferred_transport(
        request.mode,
        Geography::classify(&request.from, &request.to),
    );
    let route = route_from_value(value.get("route"), preferred);
    let return_route = route_from_value(value.get("returnRoute"), preferred);

    let travel_cost = match (route.recommended(), return_route.recommended()) {
        (Some(outbound), Some(inbound)) => outbound
            .estimated_cost
            .saturating_add(inbound.estimated_cost),
        _ => amount(value.pointer("/tripSummary/estimatedTravelCost")),
    };

    let days_total = days
        .iter()
        .fold(0, |total: Rupees, day| total.saturating_add(day.daily_total));

    Ok(TripPlan {
        trip_summary: TripSummary::for_request(request, days_total, travel_cost),
        route,
        return_route,
        days,
        packing_tips: string_list(value.get("packingTips")),
        local_tips: string_list(value.get("localTips")),
    })
}

fn day_from_value(
    value: &Value,
    index: u32,
    request: &TripRequest,
    seen_titles: &mut HashSet<String>,
) -> DayPlan {
    let day = index + 1;
    let activities = value
        .get("activities")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(activity_from_value).collect())
        .unwrap_or_default();

    let meals = value.get("meals");
    let meals = Meals {
        breakfast: meal_from_value(meals.and_then(|m| m.get("breakfast"))),
        lunch: meal_from_value(meals.and_then(|m| m.get("lunch"))),
        dinner: meal_from_value(meals.and_then(|m| m.get("dinner"))),
    };

    let stay = value.get("accommodation");
    let accommodation = Accommodation {
        name: text(stay.and_then(|s| s.get("name"))),
        kind: text(stay.and_then(|s| s.get("type"))),
        estimated_cost: amount(stay.and_then(|s| s.get("estimatedCost"))),
        location: text(stay.and_then(|s| s.get("location"))),
    };

    let title = unique_title(text(value.get("title")), day, &request.to, seen_titles);

    let mut plan = DayPlan {
        day,
        date: request.date_for_day(index),
        title,
        activities,
        meals,
        accommodation,
        daily_total: 0,
    };
    plan.daily_total = plan.itemized_total();
    plan
}

fn activity_from_value(value: &Value) -> Activity {
    Activity {
        time: text(value.get("time")),
        activity: text(value.get("activity")),
        description: text(value.get("description")),
        location: text(value.get("location")),
        estimated_cost: amount(value.get("estimatedCost")),
        duration: text(value.get("duration")),
        tips: text(value.get("tips")),
    }
}

fn meal_from_value(value: Option<&Value>) -> Meal {
    Meal {
        place: text(value.and_then(|v| v.get("place"))),
        cuisine: text(value.and_then(|v| v.get("cuisine"))),
        estimated_cost: amount(value.and_then(|v| v.get("estimatedCost"))),
    }
}

fn route_from_value(value: Option<&Value>, preferred: TransportKind) -> RouteInfo {
    let mut travel_options = value
        .and_then(|v| v.get("travelOptions"))
        .and_then(Value::as_array)
        .map(|items| items.iter().map(travel_option_from_value).collect::<Vec<_>>())
        .unwrap_or_default();

    let transportation = match reassign_recommended(&mut travel_options, preferred) {
        Some(index) => travel_options[index].kind.clone(),
        None => text(value.and_then(|v| v.get("transportation"))),
    };

    RouteInfo {
        overview: text(value.and_then(|v| v.get("overview"))),
        transportation,
        travel_options,
    }
}

fn travel_option_from_value(value: &Value) -> TravelOption {
    TravelOption {
        kind: text(value.get("type")),
        estimated_cost: amount(value.get("estimatedCost")),
        duration: text(value.get("duration")),
        details: text(value.get("details")),
        recommended: value
            .get("recommended")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn unique_title(title: String, day: u32, destination: &str, seen: &mut HashSet<String>) -> String {
    let base = if title.trim().is_empty() {
        format!("{} Day {}", destination, day)
    } else {
        title.trim().to_string()
    };

    let mut candidate = base.clone();
    let mut attempt = 1;
    while seen.contains(&candidate) {
        candidate = if attempt == 1 {
            format!("{} (Day {})", base, day)
        } else {
            format!("{} (Day {}, {})", base, day, attempt)
        };
        attempt += 1;
    }

    if candidate != title {
        debug!(day, title = %candidate, "repaired day title");
    }
    seen.insert(candidate.clone());
    candidate
}

/// Coerces a cost field to whole rupees, clamped to [`MAX_ITEM_AMOUNT`].
/// Anything that is not a finite, positive number (or a string holding one)
/// counts as zero.
pub fn amount(value: Option<&Value>) -> Rupees {
    match value {
        Some(Value::Number(number)) => number.as_f64().map(whole_rupees).unwrap_or(0),
        Some(Value::String(raw)) => parse_amount_text(raw),
        _ => 0,
    }
}

fn parse_amount_text(raw: &str) -> Rupees {
    let trimmed = raw.trim();
    let unprefixed = ["₹", "INR", "Rs.", "Rs"]
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);
    let digits = unprefixed
        .trim()
        .chars()
        .filter(|ch| *ch != ',')
        .collect::<String>();
    digits.parse::<f64>().map(whole_rupees).unwrap_or(0)
}

fn whole_rupees(value: f64) -> Rupees {
    if value.is_finite() && value > 0.0 {
        value.round().min(MAX_ITEM_AMOUNT as f64) as Rupees
    } else {
        0
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(raw)) => raw.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TravelMode;
    use serde_json::json;

    fn request(days: u32, travelers: u32) -> TripRequest {
        let start: chrono::NaiveDate = "2025-02-01".parse().unwrap();
        TripRequest {
            from: "Mumbai".to_string(),
            to: "Goa".to_string(),
            start_date: start,
            end_date: start + chrono::Duration::days(i64::from(days) - 1),
            mode: TravelMode::Balanced,
            travelers,
        }
    }

    fn model_day(title: &str, activity_cost: Value) -> Value {
        json!({
            "day": 9,
            "date": "YYYY-MM-DD",
            "title": title,
            "activities": [
                { "time": "09:00 AM", "activity": "Fort Aguada", "estimatedCost": activity_cost },
                { "time": "02:00 PM", "activity": "Spice farm", "estimatedCost": 400 }
            ],
            "meals": {
                "breakfast": { "place": "Cafe A", "cuisine": "Goan", "estimatedCost": 200 },
                "lunch": { "place": "Cafe B", "cuisine": "Goan", "estimatedCost": "300" },
                "dinner": { "place": "Cafe C", "cuisine": "Seafood", "estimatedCost": 700.4 }
            },
            "accommodation": { "name": "Sea Breeze", "type": "Hotel", "estimatedCost": 2500, "location": "Calangute" },
            "dailyTotal": 999999
        })
    }

    fn model_reply(days: Vec<Value>) -> String {
        let body = json!({
            "tripSummary": {
                "travelers": 7,
                "estimatedTotalCost": "₹1",
                "estimatedTravelCost": "9999"
            },
            "route": {
                "overview": "Coastal run",
                "transportation": "Flight",
                "travelOptions": [
                    { "type": "Flight", "estimatedCost": 9000, "recommended": true },
                    { "type": "Train", "estimatedCost": 3000, "recommended": false },
                    { "type": "Bus", "estimatedCost": 1600, "recommended": true }
                ]
            },
            "returnRoute": {
                "overview": "Back home",
                "travelOptions": [
                    { "type": "Flight", "estimatedCost": 9500, "recommended": true },
                    { "type": "Train (2AC)", "estimatedCost": "3,200" }
                ]
            },
            "days": days,
            "packingTips": ["Sunscreen", 4],
            "localTips": ["Rent a scooter"]
        });
        format!(
            "Sure! Here is the itinerary:\n```json\n{}\n```\nLet me know if you want changes.",
            serde_json::to_string_pretty(&body).unwrap()
        )
    }

    fn assert_consistent(plan: &TripPlan) {
        for day in &plan.days {
            assert_eq!(day.daily_total, day.itemized_total());
        }
        assert_eq!(
            plan.trip_summary.estimated_total_amount(),
            Some(plan.days_total() + plan.trip_summary.estimated_travel_cost)
        );
    }

    #[test]
    fn recomputes_totals_from_messy_reply() {
        let raw = model_reply(vec![
            model_day("Beaches", json!("150")),
            model_day("Forts", json!("free")),
        ]);
        let plan = normalize(&raw, &request(2, 2)).unwrap();

        assert_consistent(&plan);
        assert_eq!(plan.days[0].daily_total, 150 + 400 + 200 + 300 + 700 + 2500);
        assert_eq!(plan.days[1].daily_total, 400 + 200 + 300 + 700 + 2500);
        assert_eq!(plan.trip_summary.travelers, 2);
        assert_eq!(plan.trip_summary.total_days, 2);
        assert_eq!(plan.days[1].day, 2);
        assert_eq!(plan.days[1].date.to_string(), "2025-02-02");
        assert_eq!(plan.packing_tips, vec!["Sunscreen".to_string()]);
    }

    #[test]
    fn recommended_flags_follow_mode_policy() {
        let raw = model_reply(vec![model_day("Beaches", json!(100))]);
        let plan = normalize(&raw, &request(1, 2)).unwrap();

        for route in [&plan.route, &plan.return_route] {
            let flagged = route
                .travel_options
                .iter()
                .filter(|option| option.recommended)
                .collect::<Vec<_>>();
            assert_eq!(flagged.len(), 1);
            assert!(flagged[0].kind.starts_with("Train"));
            assert_eq!(route.transportation, flagged[0].kind);
        }
        assert_eq!(plan.trip_summary.estimated_travel_cost, 3000 + 3200);
    }

    #[test]
    fn falls_back_to_model_travel_cost_without_options() {
        let raw = json!({
            "tripSummary": { "estimatedTravelCost": "4200" },
            "days": [model_day("Beaches", json!(100))]
        })
        .to_string();
        let plan = normalize(&raw, &request(1, 1)).unwrap();
        assert_eq!(plan.trip_summary.estimated_travel_cost, 4200);
        assert!(plan.route.travel_options.is_empty());
        assert_consistent(&plan);
    }

    #[test]
    fn repeated_and_blank_titles_become_unique() {
        let raw = model_reply(vec![
            model_day("Beaches", json!(100)),
            model_day("Beaches", json!(100)),
            model_day("  ", json!(100)),
        ]);
        let plan = normalize(&raw, &request(3, 1)).unwrap();
        let titles = plan.days.iter().map(|d| d.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Beaches", "Beaches (Day 2)", "Goa Day 3"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = model_reply(vec![
            model_day("Beaches", json!("150")),
            model_day("Beaches", json!(" ₹1,250 ")),
        ]);
        let request = request(2, 3);
        let first = normalize(&raw, &request).unwrap();
        let second = normalize(&serde_json::to_string(&first).unwrap(), &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn wrong_day_count_is_malformed() {
        let raw = model_reply(vec![model_day("Beaches", json!(100))]);
        let err = normalize(&raw, &request(3, 1)).unwrap_err();
        assert!(matches!(err, PlanError::MalformedResponse(_)));
    }

    #[test]
    fn reversed_braces_are_malformed() {
        let err = normalize("Sorry :} try again {", &request(1, 1)).unwrap_err();
        assert!(matches!(err, PlanError::MalformedResponse(_)));
    }

    #[test]
    fn absurd_costs_are_clamped_without_overflow() {
        let raw = model_reply(vec![
            model_day("Beaches", json!(1e19)),
            model_day("Forts", json!("1e19")),
        ]);
        let plan = normalize(&raw, &request(2, 1)).unwrap();

        assert_consistent(&plan);
        assert_eq!(plan.days[0].activities[0].estimated_cost, MAX_ITEM_AMOUNT);
        assert_eq!(plan.days[1].activities[0].estimated_cost, MAX_ITEM_AMOUNT);
        assert_eq!(
            plan.days[0].daily_total,
            MAX_ITEM_AMOUNT + 400 + 200 + 300 + 700 + 2500
        );
    }

    #[test]
    fn missing_days_is_malformed() {
        let err = normalize("{\"tripSummary\": {}}", &request(1, 1)).unwrap_err();
        assert!(matches!(err, PlanError::MalformedResponse(_)));
    }

    #[test]
    fn coerces_cost_shapes() {
        assert_eq!(amount(Some(&json!(150))), 150);
        assert_eq!(amount(Some(&json!("150"))), 150);
        assert_eq!(amount(Some(&json!("Rs. 2,400"))), 2400);
        assert_eq!(amount(Some(&json!(99.6))), 100);
        assert_eq!(amount(Some(&json!(-40))), 0);
        assert_eq!(amount(Some(&json!("about 300"))), 0);
        assert_eq!(amount(Some(&json!(null))), 0);
        assert_eq!(amount(Some(&json!(1e19))), MAX_ITEM_AMOUNT);
        assert_eq!(amount(Some(&json!("₹1e19"))), MAX_ITEM_AMOUNT);
        assert_eq!(amount(None), 0);
    }
}
