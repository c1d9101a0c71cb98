use crate::catalog::{Theme, LOCAL_TIPS, MEAL_VENUES, PACKING_TIPS, THEMES};
use crate::cost::{CostModel, BASE_COSTS};
use crate::models::{
    Accommodation, Activity, DayPlan, Meal, Meals, RouteInfo, TravelMode, TripPlan, TripRequest,
    TripSummary,
};
use crate::transport::{is_island, TransportPlan};

const ACTIVITY_TIMES: [&str; 3] = ["09:00 AM", "02:00 PM", "07:00 PM"];
const ACTIVITY_DURATIONS: [&str; 3] = ["3 hours", "4 hours", "3 hours"];
const ACTIVITY_TIPS: [&str; 3] = [
    "Start early to avoid crowds",
    "Don't forget your camera",
    "Try local street food",
];
/// Theme offsets of the morning, afternoon and evening slots.
const THEME_OFFSETS: [usize; 3] = [0, 2, 4];
/// Item offsets within each slot's theme.
const ITEM_OFFSETS: [usize; 3] = [0, 1, 2];
const REPEAT_SUFFIXES: [&str; 5] = ["", " II", " III", " IV", " V"];

/// Builds a complete itinerary from the request alone. Output depends only on
/// the request, so equal requests give identical plans.
pub fn synthesize(request: &TripRequest) -> TripPlan {
    let cost = CostModel::new(request.mode, request.travelers);
    let num_days = request.num_days();

    let days = (0..num_days)
        .map(|index| build_day(request, &cost, index, num_days))
        .collect::<Vec<_>>();
    let days_total = days.iter().map(|day| day.daily_total).sum();

    let transport = TransportPlan::for_request(request, &cost);
    let travel_cost = transport.travel_cost();
    let recommended_label = transport.preferred.label().to_string();

    let outbound_overview = if is_island(&request.to) {
        format!(
            "Travel from {} to {} (island destination) via {}",
            request.from, request.to, recommended_label
        )
    } else {
        format!(
            "Travel from {} to {} for an amazing {}-day adventure",
            request.from, request.to, num_days
        )
    };

    TripPlan {
        trip_summary: TripSummary::for_request(request, days_total, travel_cost),
        route: RouteInfo {
            overview: outbound_overview,
            transportation: recommended_label.clone(),
            travel_options: transport.outbound,
        },
        return_route: RouteInfo {
            overview: format!("Return from {} to {}", request.to, request.from),
            transportation: recommended_label,
            travel_options: transport.inbound,
        },
        days,
        packing_tips: PACKING_TIPS.iter().map(|tip| tip.to_string()).collect(),
        local_tips: LOCAL_TIPS.iter().map(|tip| tip.to_string()).collect(),
    }
}

fn build_day(request: &TripRequest, cost: &CostModel, index: u32, num_days: u32) -> DayPlan {
    let i = index as usize;
    let slot_themes = THEME_OFFSETS.map(|offset| &THEMES[(i + offset) % THEMES.len()]);

    let activities = (0..3)
        .map(|slot| {
            let (activity, description, location) = if index == 0 {
                arrival_slot(slot, &request.to)
            } else {
                let theme = slot_themes[slot];
                let item = &theme.items[(i + ITEM_OFFSETS[slot]) % theme.items.len()];
                (
                    item.activity.to_string(),
                    item.description.to_string(),
                    item.location.to_string(),
                )
            };
            Activity {
                time: ACTIVITY_TIMES[slot].to_string(),
                activity,
                description,
                location,
                estimated_cost: cost.per_traveler(BASE_COSTS.activities[slot]),
                duration: ACTIVITY_DURATIONS[slot].to_string(),
                tips: ACTIVITY_TIPS[slot].to_string(),
            }
        })
        .collect::<Vec<_>>();

    let venues = &MEAL_VENUES[i % MEAL_VENUES.len()];
    let meal = |place: &str, cuisine: &str, base| Meal {
        place: place.to_string(),
        cuisine: cuisine.to_string(),
        estimated_cost: cost.per_traveler(base),
    };
    let meals = Meals {
        breakfast: meal(venues.breakfast, "Local", BASE_COSTS.breakfast),
        lunch: meal(venues.lunch, "Local", BASE_COSTS.lunch),
        dinner: meal(venues.dinner, "International", BASE_COSTS.dinner),
    };

    let (stay_name, stay_kind) = match request.mode {
        TravelMode::Premium => ("Luxury Hotel", "5-Star Hotel"),
        TravelMode::Balanced => ("Comfortable Hotel", "3-Star Hotel"),
        TravelMode::Cheap => ("Budget Hostel", "Hostel"),
    };
    let accommodation = Accommodation {
        name: stay_name.to_string(),
        kind: stay_kind.to_string(),
        estimated_cost: cost.accommodation(BASE_COSTS.accommodation_per_room),
        location: format!("{} Central", request.to),
    };

    let mut day = DayPlan {
        day: index + 1,
        date: request.date_for_day(index),
        title: day_title(index, num_days, slot_themes[0], &request.to),
        activities,
        meals,
        accommodation,
        daily_total: 0,
    };
    day.daily_total = day.itemized_total();
    day
}

fn arrival_slot(slot: usize, destination: &str) -> (String, String, String) {
    match slot {
        0 => (
            "Arrival & Check-in".to_string(),
            format!("Welcome to {}! Settle into your accommodation.", destination),
            format!("{} Central District", destination),
        ),
        1 => (
            "Initial Sightseeing".to_string(),
            format!("Take a stroll around the main highlights of {}.", destination),
            format!("{} Landmarks", destination),
        ),
        _ => (
            "Evening Introduction".to_string(),
            "Enjoy your first evening with a walk in a lively area.".to_string(),
            format!("{} Entertainment Hub", destination),
        ),
    }
}

/// Middle days are named after their primary theme. Day 0 is the arrival
/// day, so a theme has titled `(index - 1) / THEMES.len()` earlier middle days
/// and later visits carry a numeral to keep titles unique.
fn day_title(index: u32, num_days: u32, primary: &Theme, destination: &str) -> String {
    if index == 0 {
        return "Arrival & Exploration".to_string();
    }
    if index + 1 == num_days {
        return "Final Day & Departure".to_string();
    }

    let earlier = (index as usize - 1) / THEMES.len();
    let suffix = REPEAT_SUFFIXES
        .get(earlier)
        .map(|suffix| suffix.to_string())
        .unwrap_or_else(|| format!(" {}", earlier + 1));
    format!("{} & {} Discovery{}", primary.name, destination, suffix)
}
