//! Per-day status classification.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one scheduled day for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// The user finished the task.
    Completed,
    /// The task was missed and the fine has been paid.
    PaidFine,
    /// The task was missed and a fine is outstanding.
    UnpaidFine,
    /// The day has passed without a resolving record.
    Missed,
    /// The day has not been resolved yet.
    Future,
    /// The day predates the user joining.
    NotJoined,
}

impl DayStatus {
    /// The snake_case tag used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Completed => "completed",
            DayStatus::PaidFine => "paid_fine",
            DayStatus::UnpaidFine => "unpaid_fine",
            DayStatus::Missed => "missed",
            DayStatus::Future => "future",
            DayStatus::NotJoined => "not_joined",
        }
    }

    /// Whether the day counts towards the completion percentage.
    pub fn is_active(&self) -> bool {
        match self {
            DayStatus::Completed
            | DayStatus::PaidFine
            | DayStatus::UnpaidFine
            | DayStatus::Missed => true,
            DayStatus::Future | DayStatus::NotJoined => false,
        }
    }

    /// CSS class used by the dashboard grid.
    pub fn css_class(&self) -> &'static str {
        match self {
            DayStatus::Completed => "cell-completed",
            DayStatus::PaidFine => "cell-paid",
            DayStatus::UnpaidFine | DayStatus::Missed => "cell-failed",
            DayStatus::Future | DayStatus::NotJoined => "cell-empty",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When an incomplete, unpaid record counts as an outstanding fine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinePolicy {
    /// Only once a fine has been applied to the record.
    #[default]
    Gated,
    /// As soon as the record is incomplete and unpaid.
    Immediate,
}

impl FinePolicy {
    /// Whether an incomplete, unpaid record is an outstanding fine.
    pub fn fine_applies(&self, penalty_applied: bool) -> bool {
        match self {
            FinePolicy::Gated => penalty_applied,
            FinePolicy::Immediate => true,
        }
    }
}

impl FromStr for FinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gated" => Ok(FinePolicy::Gated),
            "immediate" => Ok(FinePolicy::Immediate),
            other => Err(format!("unknown fine policy: {other}")),
        }
    }
}

/// The stored facts about one user's attempt at one task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub completed: bool,
    pub penalty_paid: bool,
    pub penalty_applied: bool,
}

impl Outcome {
    /// Resolve the record to a status, if it resolves one at all.
    fn resolve(&self, policy: FinePolicy) -> Option<DayStatus> {
        if self.completed {
            Some(DayStatus::Completed)
        } else if self.penalty_paid {
            Some(DayStatus::PaidFine)
        } else if policy.fine_applies(self.penalty_applied) {
            Some(DayStatus::UnpaidFine)
        } else {
            None
        }
    }
}

/// Classify one scheduled day for a user.
///
/// Precedence: not joined, then future, then the stored outcome, then missed.
/// The current day stays [`DayStatus::Future`] until a record resolves it.
pub fn classify(
    day: NaiveDate,
    joined: NaiveDate,
    today: NaiveDate,
    outcome: Option<&Outcome>,
    policy: FinePolicy,
) -> DayStatus {
    if day < joined {
        return DayStatus::NotJoined;
    }
    if day > today {
        return DayStatus::Future;
    }

    match outcome.and_then(|o| o.resolve(policy)) {
        Some(status) => status,
        None if day < today => DayStatus::Missed,
        None => DayStatus::Future,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    const DONE: Outcome = Outcome {
        completed: true,
        penalty_paid: false,
        penalty_applied: false,
    };
    const PAID: Outcome = Outcome {
        completed: false,
        penalty_paid: true,
        penalty_applied: true,
    };
    const FINED: Outcome = Outcome {
        completed: false,
        penalty_paid: false,
        penalty_applied: true,
    };
    const PENDING: Outcome = Outcome {
        completed: false,
        penalty_paid: false,
        penalty_applied: false,
    };

    #[test]
    fn test_not_joined_beats_everything() {
        let status = classify(ymd(3), ymd(10), ymd(20), Some(&DONE), FinePolicy::Gated);
        assert_eq!(status, DayStatus::NotJoined);
    }

    #[test]
    fn test_future_beats_outcome() {
        let status = classify(ymd(25), ymd(1), ymd(20), Some(&DONE), FinePolicy::Gated);
        assert_eq!(status, DayStatus::Future);
    }

    #[test]
    fn test_explicit_outcomes() {
        let policy = FinePolicy::Gated;
        assert_eq!(classify(ymd(5), ymd(1), ymd(20), Some(&DONE), policy), DayStatus::Completed);
        assert_eq!(classify(ymd(5), ymd(1), ymd(20), Some(&PAID), policy), DayStatus::PaidFine);
        assert_eq!(classify(ymd(5), ymd(1), ymd(20), Some(&FINED), policy), DayStatus::UnpaidFine);
    }

    #[test]
    fn test_missing_record_is_missed() {
        assert_eq!(
            classify(ymd(5), ymd(1), ymd(20), None, FinePolicy::Gated),
            DayStatus::Missed
        );
    }

    #[test]
    fn test_fine_policy_gates_unpaid() {
        assert_eq!(
            classify(ymd(5), ymd(1), ymd(20), Some(&PENDING), FinePolicy::Gated),
            DayStatus::Missed
        );
        assert_eq!(
            classify(ymd(5), ymd(1), ymd(20), Some(&PENDING), FinePolicy::Immediate),
            DayStatus::UnpaidFine
        );
    }

    #[test]
    fn test_today_is_pending_until_resolved() {
        let today = ymd(20);
        assert_eq!(classify(today, ymd(1), today, None, FinePolicy::Gated), DayStatus::Future);
        assert_eq!(
            classify(today, ymd(1), today, Some(&PENDING), FinePolicy::Gated),
            DayStatus::Future
        );
        assert_eq!(
            classify(today, ymd(1), today, Some(&DONE), FinePolicy::Gated),
            DayStatus::Completed
        );
    }

    #[test]
    fn test_join_day_itself_is_evaluated() {
        assert_eq!(
            classify(ymd(10), ymd(10), ymd(20), None, FinePolicy::Gated),
            DayStatus::Missed
        );
    }

    #[test]
    fn test_active_days() {
        assert!(DayStatus::Completed.is_active());
        assert!(DayStatus::Missed.is_active());
        assert!(!DayStatus::Future.is_active());
        assert!(!DayStatus::NotJoined.is_active());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&DayStatus::UnpaidFine).unwrap();
        assert_eq!(json, "\"unpaid_fine\"");
        assert_eq!(DayStatus::NotJoined.to_string(), "not_joined");
    }

    #[test]
    fn test_fine_policy_from_str() {
        assert_eq!("gated".parse::<FinePolicy>(), Ok(FinePolicy::Gated));
        assert_eq!(" Immediate ".parse::<FinePolicy>(), Ok(FinePolicy::Immediate));
        assert!("sometimes".parse::<FinePolicy>().is_err());
        assert_eq!(FinePolicy::default(), FinePolicy::Gated);
    }
}
