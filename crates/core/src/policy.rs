use chrono::NaiveDate;

use crate::error::PlanError;
use crate::models::{TravelMode, TripRequest, TripRequestInput};

pub const MAX_TRIP_DAYS: u32 = 30;
pub const MAX_TRAVELERS: u32 = 50;

const MISSING_FIELDS: &str = "Missing required fields: from, to, startDate, endDate, mode";
const BAD_DURATION: &str = "Trip duration must be between 1 and 30 days";

/// Gate in front of the planner: turns caller input into a [`TripRequest`] or
/// an [`PlanError::InvalidRequest`] explaining what is wrong.
#[derive(Debug, Clone)]
pub struct TripPolicy {
    max_days: u32,
    max_travelers: u32,
}

impl Default for TripPolicy {
    fn default() -> Self {
        Self {
            max_days: MAX_TRIP_DAYS,
            max_travelers: MAX_TRAVELERS,
        }
    }
}

impl TripPolicy {
    pub fn new(max_days: u32, max_travelers: u32) -> Self {
        Self {
            max_days,
            max_travelers,
        }
    }

    pub fn max_days(&self) -> u32 {
        self.max_days
    }

    pub fn evaluate(&self, input: &TripRequestInput) -> Result<TripRequest, PlanError> {
        let (Some(from), Some(to), Some(start), Some(end), Some(mode)) = (
            required(&input.from),
            required(&input.to),
            required(&input.start_date),
            required(&input.end_date),
            required(&input.mode),
        ) else {
            return Err(PlanError::invalid(MISSING_FIELDS));
        };

        let start_date = parse_date(start, "startDate")?;
        let end_date = parse_date(end, "endDate")?;

        let mode = TravelMode::parse(mode).ok_or_else(|| {
            PlanError::invalid(format!(
                "mode must be one of cheap, balanced, premium (got \"{}\")",
                mode
            ))
        })?;

        let travelers = input.travelers.unwrap_or(1);
        if travelers == 0 {
            return Err(PlanError::invalid("travelers must be a positive integer"));
        }
        if travelers > self.max_travelers {
            return Err(PlanError::invalid(format!(
                "travelers must be at most {}",
                self.max_travelers
            )));
        }

        let request = TripRequest {
            from: from.to_string(),
            to: to.to_string(),
            start_date,
            end_date,
            mode,
            travelers,
        };

        if end_date < start_date || request.num_days() > self.max_days {
            return Err(PlanError::invalid(if self.max_days == MAX_TRIP_DAYS {
                BAD_DURATION.to_string()
            } else {
                format!("Trip duration must be between 1 and {} days", self.max_days)
            }));
        }

        Ok(request)
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, PlanError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        PlanError::invalid(format!(
            "{} must be a calendar date in YYYY-MM-DD form (got \"{}\")",
            field, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: &str, end: &str) -> TripRequestInput {
        TripRequestInput {
            from: Some("Delhi".to_string()),
            to: Some("Manali".to_string()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            mode: Some("Balanced".to_string()),
            travelers: None,
        }
    }

    #[test]
    fn accepts_a_valid_trip_and_defaults_travelers() {
        let request = TripPolicy::default()
            .evaluate(&input("2025-05-01", "2025-05-05"))
            .unwrap();
        assert_eq!(request.travelers, 1);
        assert_eq!(request.mode, TravelMode::Balanced);
        assert_eq!(request.num_days(), 5);
    }

    #[test]
    fn rejects_missing_fields() {
        let mut missing = input("2025-05-01", "2025-05-05");
        missing.to = Some("   ".to_string());
        let err = TripPolicy::default().evaluate(&missing).unwrap_err();
        assert_eq!(err, PlanError::invalid(MISSING_FIELDS));
    }

    #[test]
    fn enforces_duration_bounds() {
        let policy = TripPolicy::default();
        assert!(policy.evaluate(&input("2025-05-01", "2025-05-30")).is_ok());
        assert_eq!(
            policy.evaluate(&input("2025-05-01", "2025-05-31")).unwrap_err(),
            PlanError::invalid(BAD_DURATION)
        );
        assert_eq!(
            policy.evaluate(&input("2025-05-02", "2025-05-01")).unwrap_err(),
            PlanError::invalid(BAD_DURATION)
        );
    }

    #[test]
    fn rejects_unknown_mode_bad_dates_and_empty_party() {
        let policy = TripPolicy::default();

        let mut bad_mode = input("2025-05-01", "2025-05-02");
        bad_mode.mode = Some("first-class".to_string());
        assert!(matches!(policy.evaluate(&bad_mode), Err(PlanError::InvalidRequest(_))));

        assert!(matches!(
            policy.evaluate(&input("05/01/2025", "2025-05-02")),
            Err(PlanError::InvalidRequest(_))
        ));

        let mut nobody = input("2025-05-01", "2025-05-02");
        nobody.travelers = Some(0);
        assert!(matches!(policy.evaluate(&nobody), Err(PlanError::InvalidRequest(_))));
    }
}
