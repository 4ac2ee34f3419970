//! Scheduling rules and dashboard aggregation for the daily task tracker.
//!
//! This crate holds the pure logic shared by the persistence layer and the
//! admin web server. It performs no I/O:
//!
//! - [`day`] - Collapsing date-times to calendar days
//! - [`schedule`] - The one-task-per-future-day rule
//! - [`status`] - Per-day status classification for a user
//! - [`dashboard`] - Paginated status grid, completion percentage and streak
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tracker_core::schedule::{validate_schedule_on, ScheduleRejection, ScheduledItem};
//!
//! struct Slot(i64, NaiveDate);
//!
//! impl ScheduledItem for Slot {
//!     fn id(&self) -> i64 {
//!         self.0
//!     }
//!
//!     fn scheduled_day(&self) -> NaiveDate {
//!         self.1
//!     }
//! }
//!
//! let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
//! let taken = vec![Slot(1, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap())];
//!
//! let candidate = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
//! assert_eq!(
//!     validate_schedule_on(candidate, &taken, None, today),
//!     Err(ScheduleRejection::DateAlreadyTaken)
//! );
//! assert!(validate_schedule_on(candidate, &taken, Some(1), today).is_ok());
//! ```

pub mod dashboard;
pub mod day;
pub mod schedule;
pub mod status;

pub use dashboard::{build_row, sort_by_percentage, DashboardRow, DayCell, Member, ViewOptions};
pub use day::{normalize, normalize_instant, parse_date_time, today};
pub use schedule::{
    validate_description, validate_schedule, validate_schedule_on, ScheduleRejection, ScheduledItem,
};
pub use status::{classify, DayStatus, FinePolicy, Outcome};
