//! The one-task-per-future-day scheduling rule.

use chrono::NaiveDate;
use thiserror::Error;

use crate::day;

/// Something occupying a calendar day in the task schedule.
pub trait ScheduledItem {
    /// Identifier of the item.
    fn id(&self) -> i64;

    /// The calendar day the item occupies.
    fn scheduled_day(&self) -> NaiveDate;
}

/// Why a task cannot be scheduled on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleRejection {
    /// The day is today or earlier.
    #[error("Tasks can only be scheduled for a future day")]
    PastOrPresentDate,

    /// Another task already occupies the day.
    #[error("Another task is already scheduled for this day")]
    DateAlreadyTaken,

    /// The description is blank.
    #[error("Task description cannot be empty")]
    EmptyDescription,

    /// The date could not be parsed.
    #[error("Scheduled date is not a valid date")]
    InvalidDate,
}

impl ScheduleRejection {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleRejection::PastOrPresentDate => "PastOrPresentDate",
            ScheduleRejection::DateAlreadyTaken => "DateAlreadyTaken",
            ScheduleRejection::EmptyDescription => "EmptyDescription",
            ScheduleRejection::InvalidDate => "InvalidDate",
        }
    }
}

/// Check whether a task may occupy `candidate`, using the current local day.
///
/// See [`validate_schedule_on`].
pub fn validate_schedule<T: ScheduledItem>(
    candidate: NaiveDate,
    existing: &[T],
    exclude_id: Option<i64>,
) -> Result<(), ScheduleRejection> {
    validate_schedule_on(candidate, existing, exclude_id, day::today())
}

/// Check whether a task may occupy `candidate` given the day `today`.
///
/// Only strictly future days are schedulable, and no other item in `existing`
/// may sit on the same day. `exclude_id` names the task being edited so it
/// does not collide with its own slot.
pub fn validate_schedule_on<T: ScheduledItem>(
    candidate: NaiveDate,
    existing: &[T],
    exclude_id: Option<i64>,
    today: NaiveDate,
) -> Result<(), ScheduleRejection> {
    if candidate <= today {
        return Err(ScheduleRejection::PastOrPresentDate);
    }

    let taken = existing
        .iter()
        .filter(|item| Some(item.id()) != exclude_id)
        .any(|item| item.scheduled_day() == candidate);

    if taken {
        return Err(ScheduleRejection::DateAlreadyTaken);
    }

    Ok(())
}

/// Validate a task description.
pub fn validate_description(description: &str) -> Result<(), ScheduleRejection> {
    if description.trim().is_empty() {
        return Err(ScheduleRejection::EmptyDescription);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::{normalize, parse_date_time};
    use chrono::Duration;

    struct Slot {
        id: i64,
        day: NaiveDate,
    }

    impl ScheduledItem for Slot {
        fn id(&self) -> i64 {
            self.id
        }

        fn scheduled_day(&self) -> NaiveDate {
            self.day
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_today_and_past() {
        let today = ymd(2026, 6, 10);
        let none: Vec<Slot> = Vec::new();

        assert_eq!(
            validate_schedule_on(today, &none, None, today),
            Err(ScheduleRejection::PastOrPresentDate)
        );
        assert_eq!(
            validate_schedule_on(ymd(2026, 6, 9), &none, None, today),
            Err(ScheduleRejection::PastOrPresentDate)
        );
        assert!(validate_schedule_on(ymd(2026, 6, 11), &none, None, today).is_ok());
    }

    #[test]
    fn test_time_of_day_does_not_matter() {
        let today = ymd(2026, 6, 10);
        let none: Vec<Slot> = Vec::new();

        let late_today = parse_date_time("2026-06-10T23:59:59").unwrap();
        let early_tomorrow = parse_date_time("2026-06-11T00:00:01").unwrap();

        assert_eq!(
            validate_schedule_on(normalize(late_today), &none, None, today),
            Err(ScheduleRejection::PastOrPresentDate)
        );
        assert!(validate_schedule_on(normalize(early_tomorrow), &none, None, today).is_ok());
    }

    #[test]
    fn test_rejects_taken_day() {
        let today = ymd(2026, 6, 10);
        let existing = vec![Slot { id: 1, day: ymd(2026, 6, 12) }];

        let morning = normalize(parse_date_time("2026-06-12T08:00").unwrap());
        assert_eq!(
            validate_schedule_on(morning, &existing, None, today),
            Err(ScheduleRejection::DateAlreadyTaken)
        );
        assert!(validate_schedule_on(ymd(2026, 6, 13), &existing, None, today).is_ok());
    }

    #[test]
    fn test_edit_excludes_own_slot() {
        let today = ymd(2026, 6, 10);
        let existing = vec![
            Slot { id: 1, day: ymd(2026, 6, 12) },
            Slot { id: 2, day: ymd(2026, 6, 14) },
        ];

        assert!(validate_schedule_on(ymd(2026, 6, 12), &existing, Some(1), today).is_ok());
        assert_eq!(
            validate_schedule_on(ymd(2026, 6, 14), &existing, Some(1), today),
            Err(ScheduleRejection::DateAlreadyTaken)
        );
    }

    #[test]
    fn test_past_check_wins_over_collision() {
        let today = ymd(2026, 6, 10);
        let existing = vec![Slot { id: 1, day: today }];
        assert_eq!(
            validate_schedule_on(today, &existing, None, today),
            Err(ScheduleRejection::PastOrPresentDate)
        );
    }

    #[test]
    fn test_validate_schedule_uses_current_day() {
        let none: Vec<Slot> = Vec::new();
        let now = day::today();

        assert_eq!(
            validate_schedule(now, &none, None),
            Err(ScheduleRejection::PastOrPresentDate)
        );
        assert!(validate_schedule(now + Duration::days(1), &none, None).is_ok());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("Read 20 pages").is_ok());
        assert_eq!(
            validate_description("   "),
            Err(ScheduleRejection::EmptyDescription)
        );
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(ScheduleRejection::PastOrPresentDate.code(), "PastOrPresentDate");
        assert_eq!(ScheduleRejection::DateAlreadyTaken.code(), "DateAlreadyTaken");
        assert_eq!(
            ScheduleRejection::DateAlreadyTaken.to_string(),
            "Another task is already scheduled for this day"
        );
    }
}
