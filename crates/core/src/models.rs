use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Whole Indian Rupees. Every cost in a plan is an integer amount.
pub type Rupees = u64;

pub const CURRENCY_CODE: &str = "INR";
pub const CURRENCY_SYMBOL: &str = "₹";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Cheap,
    Balanced,
    Premium,
}

impl TravelMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "cheap" | "budget" => Some(Self::Cheap),
            "balanced" | "mid" | "mid-range" => Some(Self::Balanced),
            "premium" | "luxury" => Some(Self::Premium),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cheap => "cheap",
            Self::Balanced => "balanced",
            Self::Premium => "premium",
        }
    }

    /// Scales every per-person baseline in the cost model.
    pub fn cost_multiplier(self) -> u64 {
        match self {
            Self::Cheap => 1,
            Self::Balanced => 2,
            Self::Premium => 4,
        }
    }
}

/// Request body as it arrives from the caller, before the trip policy runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequestInput {
    pub from: Option<String>,
    pub to: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub mode: Option<String>,
    pub travelers: Option<u32>,
}

/// A validated trip request. Construct through [`crate::TripPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub from: String,
    pub to: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mode: TravelMode,
    pub travelers: u32,
}

impl TripRequest {
    /// Inclusive number of calendar days covered by the trip.
    pub fn num_days(&self) -> u32 {
        let span = (self.end_date - self.start_date).num_days() + 1;
        span.max(0) as u32
    }

    pub fn date_for_day(&self, index: u32) -> NaiveDate {
        self.start_date + Duration::days(i64::from(index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub trip_summary: TripSummary,
    pub route: RouteInfo,
    pub return_route: RouteInfo,
    pub days: Vec<DayPlan>,
    pub packing_tips: Vec<String>,
    pub local_tips: Vec<String>,
}

impl TripPlan {
    pub fn days_total(&self) -> Rupees {
        self.days
            .iter()
            .fold(0, |total: Rupees, day| total.saturating_add(day.daily_total))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub from: String,
    pub to: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: u32,
    pub travelers: u32,
    pub mode: TravelMode,
    pub estimated_total_cost: String,
    pub estimated_travel_cost: Rupees,
    pub currency: String,
    pub currency_symbol: String,
}

impl TripSummary {
    /// Echoes the request and formats the grand total. Both the normalizer and
    /// the synthesizer build their summaries here.
    pub fn for_request(request: &TripRequest, days_total: Rupees, travel_cost: Rupees) -> Self {
        Self {
            from: request.from.clone(),
            to: request.to.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            total_days: request.num_days(),
            travelers: request.travelers,
            mode: request.mode,
            estimated_total_cost: format!(
                "{}{}",
                CURRENCY_SYMBOL,
                days_total.saturating_add(travel_cost)
            ),
            estimated_travel_cost: travel_cost,
            currency: CURRENCY_CODE.to_string(),
            currency_symbol: CURRENCY_SYMBOL.to_string(),
        }
    }

    /// Numeric part of `estimated_total_cost`.
    pub fn estimated_total_amount(&self) -> Option<Rupees> {
        self.estimated_total_cost
            .strip_prefix(self.currency_symbol.as_str())
            .unwrap_or(&self.estimated_total_cost)
            .trim()
            .parse()
            .ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub overview: String,
    pub transportation: String,
    pub travel_options: Vec<TravelOption>,
}

impl RouteInfo {
    pub fn recommended(&self) -> Option<&TravelOption> {
        self.travel_options.iter().find(|option| option.recommended)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub estimated_cost: Rupees,
    pub duration: String,
    pub details: String,
    pub recommended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: u32,
    pub date: NaiveDate,
    pub title: String,
    pub activities: Vec<Activity>,
    pub meals: Meals,
    pub accommodation: Accommodation,
    pub daily_total: Rupees,
}

impl DayPlan {
    /// Sum of every itemized cost of the day, independent of `daily_total`.
    pub fn itemized_total(&self) -> Rupees {
        self.activities
            .iter()
            .fold(0, |total: Rupees, activity| {
                total.saturating_add(activity.estimated_cost)
            })
            .saturating_add(self.meals.total())
            .saturating_add(self.accommodation.estimated_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub time: String,
    pub activity: String,
    pub description: String,
    pub location: String,
    pub estimated_cost: Rupees,
    pub duration: String,
    pub tips: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub place: String,
    pub cuisine: String,
    pub estimated_cost: Rupees,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
}

impl Meals {
    pub fn total(&self) -> Rupees {
        self.breakfast
            .estimated_cost
            .saturating_add(self.lunch.estimated_cost)
            .saturating_add(self.dinner.estimated_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub estimated_cost: Rupees,
    pub location: String,
}
