//! Dashboard aggregation.
//!
//! Turns a user's completion records into the rows shown on the dashboard: a
//! page of per-day statuses, a completion percentage and the current streak.
//! Everything here is recomputed from stored facts on every request.

use std::collections::HashMap;
use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::day;
use crate::schedule::ScheduledItem;
use crate::status::{classify, DayStatus, FinePolicy, Outcome};

/// Default number of days shown per dashboard page.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// The user a dashboard row describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub telegram_id: String,
    pub joined_at: NaiveDateTime,
}

/// Parameters for building dashboard rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Days per page.
    pub page_size: usize,
    /// Requested page, 1-indexed. Clamped when out of range.
    pub page: usize,
    /// Rule for counting unpaid fines.
    pub policy: FinePolicy,
    /// The day considered "today".
    pub today: NaiveDate,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
            policy: FinePolicy::default(),
            today: day::today(),
        }
    }
}

/// One cell of the dashboard grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    /// 1-based position of the day in the full schedule.
    pub day: usize,
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// A user's dashboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    pub id: i64,
    pub name: String,
    pub telegram_id: String,
    pub joined_at: NaiveDateTime,
    pub percentage: f64,
    pub task_data: Vec<DayCell>,
    pub total_days: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub completed_days: usize,
    pub total_active_days: usize,
    pub streak: u32,
}

/// A resolved page within a sequence of days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub total_pages: usize,
    pub current_page: usize,
    pub range: Range<usize>,
}

/// Split `total` days into pages of `page_size` and resolve `page`.
///
/// An empty schedule still reports a single, empty page.
pub fn paginate(total: usize, page_size: usize, page: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let total_pages = total.div_ceil(page_size).max(1);
    let current_page = page.clamp(1, total_pages);

    let start = ((current_page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);

    PageWindow {
        total_pages,
        current_page,
        range: start..end,
    }
}

/// Share of active days that were completed, as a percentage.
pub fn percentage(statuses: &[DayStatus]) -> f64 {
    let (completed, active) = tally(statuses);
    if active == 0 {
        return 0.0;
    }
    completed as f64 / active as f64 * 100.0
}

/// Count of trailing completed days, walking back from the newest day.
///
/// Days that cannot be evaluated are skipped; any failed day ends the streak.
pub fn streak(statuses: &[DayStatus]) -> u32 {
    let mut count = 0;
    for status in statuses.iter().rev() {
        match status {
            DayStatus::NotJoined | DayStatus::Future => continue,
            DayStatus::Completed => count += 1,
            DayStatus::Missed | DayStatus::PaidFine | DayStatus::UnpaidFine => break,
        }
    }
    count
}

/// Classify every task in `tasks` for a member, oldest first.
pub fn statuses<T: ScheduledItem>(
    member: &Member,
    tasks: &[T],
    outcomes: &HashMap<i64, Outcome>,
    policy: FinePolicy,
    today: NaiveDate,
) -> Vec<(NaiveDate, DayStatus)> {
    let joined = day::normalize(member.joined_at);

    let mut days: Vec<(i64, NaiveDate)> = tasks
        .iter()
        .map(|task| (task.id(), task.scheduled_day()))
        .collect();
    days.sort_by_key(|(_, date)| *date);

    days.into_iter()
        .map(|(task_id, date)| {
            let status = classify(date, joined, today, outcomes.get(&task_id), policy);
            (date, status)
        })
        .collect()
}

/// Build a member's dashboard row.
///
/// `outcomes` maps task ids to the member's stored outcomes. Percentage and
/// streak cover the full schedule; `task_data` holds only the requested page.
pub fn build_row<T: ScheduledItem>(
    member: &Member,
    tasks: &[T],
    outcomes: &HashMap<i64, Outcome>,
    options: &ViewOptions,
) -> DashboardRow {
    let classified = statuses(member, tasks, outcomes, options.policy, options.today);
    let sequence: Vec<DayStatus> = classified.iter().map(|(_, status)| *status).collect();

    let (completed_days, total_active_days) = tally(&sequence);
    let window = paginate(classified.len(), options.page_size, options.page);

    let task_data = classified[window.range.clone()]
        .iter()
        .zip(window.range.clone())
        .map(|((date, status), index)| DayCell {
            day: index + 1,
            date: *date,
            status: *status,
        })
        .collect();

    DashboardRow {
        id: member.id,
        name: member.name.clone(),
        telegram_id: member.telegram_id.clone(),
        joined_at: member.joined_at,
        percentage: percentage(&sequence),
        task_data,
        total_days: classified.len(),
        total_pages: window.total_pages,
        current_page: window.current_page,
        completed_days,
        total_active_days,
        streak: streak(&sequence),
    }
}

/// Order rows by completion percentage, highest first. Ties keep their order.
pub fn sort_by_percentage(rows: &mut [DashboardRow]) {
    rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
}

fn tally(statuses: &[DayStatus]) -> (usize, usize) {
    statuses.iter().fold((0, 0), |(completed, active), status| {
        (
            completed + usize::from(*status == DayStatus::Completed),
            active + usize::from(status.is_active()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use DayStatus::*;

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

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    /// Day `n` of the schedule, 1-indexed.
    fn nth(n: i64) -> NaiveDate {
        base() + Duration::days(n - 1)
    }

    fn slots(count: i64) -> Vec<Slot> {
        (1..=count).map(|n| Slot { id: n, day: nth(n) }).collect()
    }

    fn member(joined_day: i64) -> Member {
        Member {
            id: 7,
            name: "Dilnoza".to_string(),
            telegram_id: "100200".to_string(),
            joined_at: day::start_of(nth(joined_day)) + Duration::hours(15),
        }
    }

    fn done() -> Outcome {
        Outcome {
            completed: true,
            ..Outcome::default()
        }
    }

    #[test]
    fn test_streak_skips_future() {
        assert_eq!(streak(&[Missed, Completed, Completed, Future]), 2);
    }

    #[test]
    fn test_streak_skips_not_joined() {
        assert_eq!(streak(&[Missed, NotJoined, Completed, Completed, Future]), 2);
    }

    #[test]
    fn test_streak_breaks_on_fine() {
        assert_eq!(streak(&[Missed, Completed, UnpaidFine, Future]), 0);
        assert_eq!(streak(&[Completed, PaidFine, Completed]), 1);
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(streak(&[]), 0);
        assert_eq!(streak(&[Future, NotJoined]), 0);
    }

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(percentage(&[]), 0.0);
        assert_eq!(percentage(&[Future, NotJoined]), 0.0);
        assert_eq!(percentage(&[Completed, Completed]), 100.0);
        assert_eq!(percentage(&[Completed, Missed, Future, NotJoined]), 50.0);
        assert_eq!(percentage(&[PaidFine, UnpaidFine, Missed, Completed]), 25.0);
    }

    #[test]
    fn test_paginate_partial_last_page() {
        let window = paginate(65, 30, 3);
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.current_page, 3);
        assert_eq!(window.range.len(), 5);
        assert_eq!(window.range, 60..65);
    }

    #[test]
    fn test_paginate_clamps_page() {
        assert_eq!(paginate(65, 30, 0).current_page, 1);
        assert_eq!(paginate(65, 30, 9).current_page, 3);
        assert_eq!(paginate(60, 30, 2).range, 30..60);
    }

    #[test]
    fn test_paginate_empty_schedule() {
        let window = paginate(0, 30, 4);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.current_page, 1);
        assert!(window.range.is_empty());
    }

    #[test]
    fn test_days_before_joining_are_not_joined() {
        let tasks = slots(20);
        let mut outcomes = HashMap::new();
        for id in 1..=20 {
            outcomes.insert(id, done());
        }
        let options = ViewOptions {
            today: nth(30),
            ..ViewOptions::default()
        };

        let row = build_row(&member(10), &tasks, &outcomes, &options);

        for cell in &row.task_data[..9] {
            assert_eq!(cell.status, NotJoined, "day {}", cell.day);
        }
        for cell in &row.task_data[9..] {
            assert_eq!(cell.status, Completed, "day {}", cell.day);
        }
        assert_eq!(row.total_active_days, 11);
        assert_eq!(row.completed_days, 11);
        assert_eq!(row.percentage, 100.0);
        assert_eq!(row.streak, 11);
    }

    #[test]
    fn test_build_row_pages() {
        let tasks = slots(65);
        let options = ViewOptions {
            page: 3,
            today: nth(100),
            ..ViewOptions::default()
        };

        let row = build_row(&member(1), &tasks, &HashMap::new(), &options);

        assert_eq!(row.total_days, 65);
        assert_eq!(row.total_pages, 3);
        assert_eq!(row.current_page, 3);
        assert_eq!(row.task_data.len(), 5);
        assert_eq!(row.task_data[0].day, 61);
        assert_eq!(row.task_data[0].date, nth(61));
        assert!(row.task_data.iter().all(|cell| cell.status == Missed));
        assert_eq!(row.percentage, 0.0);
    }

    #[test]
    fn test_build_row_uses_full_history() {
        let tasks = slots(40);
        let mut outcomes = HashMap::new();
        for id in 31..=35 {
            outcomes.insert(id, done());
        }
        let options = ViewOptions {
            page: 1,
            today: nth(35),
            ..ViewOptions::default()
        };

        let row = build_row(&member(31), &tasks, &outcomes, &options);

        assert_eq!(row.task_data.len(), 30);
        assert!(row.task_data.iter().all(|cell| cell.status == NotJoined));
        assert_eq!(row.streak, 5);
        assert_eq!(row.completed_days, 5);
        assert_eq!(row.percentage, 100.0);
    }

    #[test]
    fn test_build_row_sorts_tasks_chronologically() {
        let tasks = vec![
            Slot { id: 3, day: nth(3) },
            Slot { id: 1, day: nth(1) },
            Slot { id: 2, day: nth(2) },
        ];
        let mut outcomes = HashMap::new();
        outcomes.insert(3, done());
        outcomes.insert(2, done());
        let options = ViewOptions {
            today: nth(5),
            ..ViewOptions::default()
        };

        let row = build_row(&member(1), &tasks, &outcomes, &options);
        let dates: Vec<NaiveDate> = row.task_data.iter().map(|cell| cell.date).collect();

        assert_eq!(dates, vec![nth(1), nth(2), nth(3)]);
        assert_eq!(row.streak, 2);
    }

    #[test]
    fn test_sort_by_percentage_is_descending_and_stable() {
        let options = ViewOptions {
            today: nth(10),
            ..ViewOptions::default()
        };
        let tasks = slots(2);
        let mut full = HashMap::new();
        full.insert(1, done());
        full.insert(2, done());
        let mut half = HashMap::new();
        half.insert(1, done());

        let mut rows = vec![
            build_row(&Member { id: 1, ..member(1) }, &tasks, &half, &options),
            build_row(&Member { id: 2, ..member(1) }, &tasks, &HashMap::new(), &options),
            build_row(&Member { id: 3, ..member(1) }, &tasks, &full, &options),
            build_row(&Member { id: 4, ..member(1) }, &tasks, &half, &options),
        ];
        sort_by_percentage(&mut rows);

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let options = ViewOptions {
            today: nth(3),
            ..ViewOptions::default()
        };
        let row = build_row(&member(1), &slots(1), &HashMap::new(), &options);
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["telegramId"], "100200");
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["taskData"][0]["status"], "missed");
        assert_eq!(json["taskData"][0]["date"], "2026-01-01");
    }
}
