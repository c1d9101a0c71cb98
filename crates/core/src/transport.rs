use crate::catalog::{ISLAND_DESTINATIONS, KNOWN_ISLAND_GROUP};
use crate::cost::{CostModel, BASE_COSTS};
use crate::models::{Rupees, TravelMode, TravelOption, TripRequest};

const ISLAND_FLIGHT_PER_PERSON: Rupees = 8000;
const KNOWN_ISLAND_SHIP_PER_PERSON: Rupees = 4000;
const MAINLAND_FLIGHT_PER_PERSON: Rupees = 4500;
const TRAIN_PER_PERSON: Rupees = 1500;
const BUS_PER_PERSON: Rupees = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Flight,
    Train,
    Bus,
    ShipFerry,
}

impl TransportKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Train => "Train",
            Self::Bus => "Bus",
            Self::ShipFerry => "Ship/Ferry",
        }
    }

    /// Loose match against an option type written by the model,
    /// e.g. "Train (3AC)" or "Ferry".
    pub fn matches(self, label: &str) -> bool {
        let lower = label.trim().to_lowercase();
        match self {
            Self::ShipFerry => lower.starts_with("ship") || lower.starts_with("ferry"),
            _ => lower.starts_with(&self.label().to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geography {
    Mainland,
    /// `known_group` is set when either endpoint is in the island group with
    /// published sailing schedules.
    Island { known_group: bool },
}

impl Geography {
    pub fn classify(from: &str, to: &str) -> Self {
        if !is_island(from) && !is_island(to) {
            return Self::Mainland;
        }
        let known_group = [from, to]
            .iter()
            .any(|place| place.to_lowercase().contains(KNOWN_ISLAND_GROUP));
        Self::Island { known_group }
    }
}

pub fn is_island(place: &str) -> bool {
    let lower = place.to_lowercase();
    ISLAND_DESTINATIONS
        .iter()
        .any(|island| lower.contains(island))
}

/// The single option a leg recommends for a given budget tier.
pub fn preferred_transport(mode: TravelMode, geography: Geography) -> TransportKind {
    match (geography, mode) {
        (Geography::Island { .. }, TravelMode::Cheap) => TransportKind::ShipFerry,
        (Geography::Island { .. }, _) => TransportKind::Flight,
        (Geography::Mainland, TravelMode::Premium) => TransportKind::Flight,
        (Geography::Mainland, TravelMode::Balanced) => TransportKind::Train,
        (Geography::Mainland, TravelMode::Cheap) => TransportKind::Bus,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Outbound,
    Return,
}

#[derive(Debug, Clone)]
pub struct TransportPlan {
    pub geography: Geography,
    pub preferred: TransportKind,
    pub outbound: Vec<TravelOption>,
    pub inbound: Vec<TravelOption>,
}

impl TransportPlan {
    pub fn for_request(request: &TripRequest, cost: &CostModel) -> Self {
        let geography = Geography::classify(&request.from, &request.to);
        let preferred = preferred_transport(request.mode, geography);
        Self {
            geography,
            preferred,
            outbound: leg_options(request, Leg::Outbound, geography, preferred, cost),
            inbound: leg_options(request, Leg::Return, geography, preferred, cost),
        }
    }

    /// Recommended outbound plus recommended return fare. Both legs are
    /// summed independently.
    pub fn travel_cost(&self) -> Rupees {
        recommended_cost(&self.outbound) + recommended_cost(&self.inbound)
    }
}

fn recommended_cost(options: &[TravelOption]) -> Rupees {
    options
        .iter()
        .find(|option| option.recommended)
        .map(|option| option.estimated_cost)
        .unwrap_or(0)
}

fn leg_options(
    request: &TripRequest,
    leg: Leg,
    geography: Geography,
    preferred: TransportKind,
    cost: &CostModel,
) -> Vec<TravelOption> {
    let (origin, destination) = match leg {
        Leg::Outbound => (request.from.as_str(), request.to.as_str()),
        Leg::Return => (request.to.as_str(), request.from.as_str()),
    };

    let option = |kind: TransportKind, per_person: Rupees, duration: &str, details: String| {
        TravelOption {
            kind: kind.label().to_string(),
            estimated_cost: cost.per_traveler(per_person),
            duration: duration.to_string(),
            details,
            recommended: kind == preferred,
        }
    };

    match geography {
        Geography::Island { known_group: true } => vec![
            option(
                TransportKind::Flight,
                ISLAND_FLIGHT_PER_PERSON,
                "2-4 hours",
                format!(
                    "Direct flight from {} to {} (Air India/IndiGo). Limited daily flights.",
                    origin, destination
                ),
            ),
            option(
                TransportKind::ShipFerry,
                KNOWN_ISLAND_SHIP_PER_PERSON,
                "50-60 hours",
                match leg {
                    Leg::Outbound => "Passenger ship from Chennai/Kolkata to Port Blair. Sails 3-4 times per month. Book in advance.".to_string(),
                    Leg::Return => "Passenger ship from Port Blair to Chennai/Kolkata. Sails 3-4 times per month.".to_string(),
                },
            ),
        ],
        Geography::Island { known_group: false } => vec![
            option(
                TransportKind::Flight,
                ISLAND_FLIGHT_PER_PERSON,
                "2-4 hours",
                format!("Flight from {} to {}. Check availability.", origin, destination),
            ),
            option(
                TransportKind::ShipFerry,
                BASE_COSTS.travel_leg,
                "Variable",
                "Check ferry availability and schedules.".to_string(),
            ),
        ],
        Geography::Mainland => vec![
            option(
                TransportKind::Flight,
                MAINLAND_FLIGHT_PER_PERSON,
                "2-3 hours",
                format!(
                    "Domestic flight from {} to {} (Indigo/Air India)",
                    origin, destination
                ),
            ),
            option(
                TransportKind::Train,
                TRAIN_PER_PERSON,
                "14-22 hours",
                "Express Train (Sleeper/3AC Class). Affordable and scenic.".to_string(),
            ),
            option(
                TransportKind::Bus,
                BUS_PER_PERSON,
                "16-24 hours",
                "Intercity AC Sleeper/Volvo Bus. Most budget-friendly.".to_string(),
            ),
        ],
    }
}

/// Sets exactly one `recommended` flag in a list of options the model wrote.
/// Prefers the policy's transport type, then whatever the model flagged first,
/// then the first entry. Returns the index that was chosen.
pub fn reassign_recommended(options: &mut [TravelOption], preferred: TransportKind) -> Option<usize> {
    let chosen = options
        .iter()
        .position(|option| preferred.matches(&option.kind))
        .or_else(|| options.iter().position(|option| option.recommended))
        .or(if options.is_empty() { None } else { Some(0) })?;

    for (index, option) in options.iter_mut().enumerate() {
        option.recommended = index == chosen;
    }
    Some(chosen)
}
