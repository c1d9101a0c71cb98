use crate::models::{Rupees, TravelMode};

/// Per-person baselines in INR before the mode multiplier. Accommodation is
/// priced per room.
#[derive(Debug, Clone, Copy)]
pub struct BaseCosts {
    pub activities: [Rupees; 3],
    pub breakfast: Rupees,
    pub lunch: Rupees,
    pub dinner: Rupees,
    pub accommodation_per_room: Rupees,
    pub travel_leg: Rupees,
}

pub const BASE_COSTS: BaseCosts = BaseCosts {
    activities: [200, 300, 200],
    breakfast: 150,
    lunch: 250,
    dinner: 400,
    accommodation_per_room: 1500,
    travel_leg: 2000,
};

pub const TRAVELERS_PER_ROOM: u64 = 2;

/// Scales baselines by mode and party size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    multiplier: u64,
    travelers: u64,
}

impl CostModel {
    pub fn new(mode: TravelMode, travelers: u32) -> Self {
        Self {
            multiplier: mode.cost_multiplier(),
            travelers: u64::from(travelers),
        }
    }

    /// Items every traveler pays for individually: activities, meals, tickets.
    pub fn per_traveler(&self, base: Rupees) -> Rupees {
        base * self.multiplier * self.travelers
    }

    pub fn rooms(&self) -> u64 {
        self.travelers.div_ceil(TRAVELERS_PER_ROOM)
    }

    pub fn accommodation(&self, base_per_room: Rupees) -> Rupees {
        base_per_room * self.multiplier * self.rooms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooms_round_up_to_pairs() {
        assert_eq!(CostModel::new(TravelMode::Cheap, 1).rooms(), 1);
        assert_eq!(CostModel::new(TravelMode::Cheap, 2).rooms(), 1);
        assert_eq!(CostModel::new(TravelMode::Cheap, 3).rooms(), 2);
        assert_eq!(CostModel::new(TravelMode::Cheap, 4).rooms(), 2);
    }

    #[test]
    fn premium_quadruples_baselines() {
        let model = CostModel::new(TravelMode::Premium, 3);
        assert_eq!(model.per_traveler(BASE_COSTS.dinner), 400 * 4 * 3);
        assert_eq!(model.accommodation(BASE_COSTS.accommodation_per_room), 1500 * 4 * 2);
    }
}
