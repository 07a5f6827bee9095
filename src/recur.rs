//! Recurrence engine: computes the next occurrence of a recurring entity.
//!
//! All dates are `chrono::NaiveDate` — no time component and no timezone, so
//! occurrence arithmetic can never shift a date across a day boundary and
//! serialization is always zero-padded `YYYY-MM-DD`.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often a recurring entity repeats.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Recurrence metadata carried by a Task or Transaction.
///
/// For tasks, completing the task advances its due date by `frequency`
/// instead of terminating it. For transactions the flag is informational
/// only; nothing spawns the next occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Recurrence {
    pub frequency: Frequency,
}

impl Recurrence {
    pub fn new(frequency: Frequency) -> Self {
        Self { frequency }
    }
}

/// Returns the occurrence that follows `current` at the given frequency.
///
/// Monthly and yearly steps preserve the day of month; when the target month
/// is shorter, calendar arithmetic clamps to its last day (2024-01-31 + one
/// month is 2024-02-29).
pub fn next_occurrence(current: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Daily => current + Days::new(1),
        Frequency::Weekly => current + Days::new(7),
        Frequency::Monthly => current + Months::new(1),
        Frequency::Yearly => current + Months::new(12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn daily_advances_one_day() {
        assert_eq!(
            next_occurrence(date("2024-03-10"), Frequency::Daily),
            date("2024-03-11")
        );
    }

    #[test]
    fn daily_crosses_year_boundary() {
        assert_eq!(
            next_occurrence(date("2024-12-31"), Frequency::Daily),
            date("2025-01-01")
        );
    }

    #[test]
    fn weekly_advances_seven_days() {
        assert_eq!(
            next_occurrence(date("2024-02-26"), Frequency::Weekly),
            date("2024-03-04")
        );
    }

    #[test]
    fn monthly_preserves_day_of_month() {
        assert_eq!(
            next_occurrence(date("2024-01-15"), Frequency::Monthly),
            date("2024-02-15")
        );
    }

    #[test]
    fn monthly_clamps_to_short_month() {
        assert_eq!(
            next_occurrence(date("2024-01-31"), Frequency::Monthly),
            date("2024-02-29")
        );
    }

    #[test]
    fn yearly_advances_one_year() {
        assert_eq!(
            next_occurrence(date("2023-07-04"), Frequency::Yearly),
            date("2024-07-04")
        );
    }

    #[test]
    fn yearly_from_leap_day_clamps() {
        assert_eq!(
            next_occurrence(date("2024-02-29"), Frequency::Yearly),
            date("2025-02-28")
        );
    }

    #[test]
    fn serialized_dates_are_zero_padded() {
        let next = next_occurrence(date("2024-02-26"), Frequency::Weekly);
        assert_eq!(serde_json::to_string(&next).unwrap(), "\"2024-03-04\"");
    }
}
