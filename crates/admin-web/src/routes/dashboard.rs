//! Dashboard routes.

use std::collections::HashMap;

use askama::Template;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracker_core::dashboard::paginate;
use tracker_core::{build_row, sort_by_percentage, today, DashboardRow, Member, Outcome, ViewOptions};

use crate::error::Result;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub dashboard: Dashboard,
}

impl DashboardTemplate {
    fn previous_page(&self) -> Option<usize> {
        (self.dashboard.page > 1).then(|| self.dashboard.page - 1)
    }

    fn next_page(&self) -> Option<usize> {
        (self.dashboard.page < self.dashboard.total_pages).then(|| self.dashboard.page + 1)
    }
}

/// `?page=N` query.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

/// A page of dashboard rows, best percentage first.
#[derive(Clone)]
pub struct Dashboard {
    pub page: usize,
    pub total_pages: usize,
    /// 1-based day numbers on this page.
    pub days: Vec<usize>,
    pub rows: Vec<DashboardRow>,
}

/// Dashboard API response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub data: Vec<DashboardRow>,
    pub page: usize,
    pub total_pages: usize,
}

/// Summary statistics.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_tasks: i64,
    pub upcoming_tasks: i64,
    pub users: i64,
    pub completed_tasks: i64,
    pub pending_payments: i64,
}

/// Render the dashboard page.
pub async fn dashboard_page(
    State(state): State<AppState>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<DashboardTemplate> {
    let Query(query) = query?;
    let dashboard = get_dashboard(&state, query.page.unwrap_or(1)).await?;
    Ok(DashboardTemplate { dashboard })
}

/// Get a page of dashboard rows as JSON.
pub async fn dashboard_api(
    State(state): State<AppState>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<DashboardResponse>> {
    let Query(query) = query?;
    let dashboard = get_dashboard(&state, query.page.unwrap_or(1)).await?;
    Ok(Json(DashboardResponse {
        success: true,
        data: dashboard.rows,
        page: dashboard.page,
        total_pages: dashboard.total_pages,
    }))
}

/// Get summary statistics as JSON.
pub async fn stats_api(State(state): State<AppState>) -> Result<Json<Stats>> {
    let stats = get_stats(&state).await?;
    Ok(Json(stats))
}

/// Build every user's row for the requested page.
async fn get_dashboard(state: &AppState, page: usize) -> Result<Dashboard> {
    let pool = state.db.pool();

    let tasks = database::task::list_tasks_chronological(pool).await?;
    let users = database::user::list_users(pool).await?;
    let completions = database::completion::list_completions(pool).await?;

    let mut outcomes: HashMap<i64, HashMap<i64, Outcome>> = HashMap::new();
    for completion in &completions {
        outcomes
            .entry(completion.user_id)
            .or_default()
            .insert(completion.task_id, Outcome::from(completion));
    }

    let options = ViewOptions {
        page_size: state.settings.page_size,
        page,
        policy: state.settings.fine_policy,
        today: today(),
    };

    let none = HashMap::new();
    let mut rows: Vec<DashboardRow> = users
        .iter()
        .map(|user| {
            let member = Member::from(user);
            let user_outcomes = outcomes.get(&user.id).unwrap_or(&none);
            build_row(&member, &tasks, user_outcomes, &options)
        })
        .collect();
    sort_by_percentage(&mut rows);

    let window = paginate(tasks.len(), options.page_size, page);

    Ok(Dashboard {
        page: window.current_page,
        total_pages: window.total_pages,
        days: window.range.map(|index| index + 1).collect(),
        rows,
    })
}

/// Fetch statistics from the database.
async fn get_stats(state: &AppState) -> Result<Stats> {
    let pool = state.db.pool();

    let total_tasks = database::task::count_tasks(pool).await?;
    let upcoming_tasks = database::task::count_upcoming_tasks(pool, today()).await?;
    let users = database::user::count_users(pool).await?;
    let completed_tasks = database::completion::count_completed(pool).await?;
    let pending_payments =
        database::completion::count_pending_payments(pool, state.settings.fine_policy).await?;

    Ok(Stats {
        total_tasks,
        upcoming_tasks,
        users,
        completed_tasks,
        pending_payments,
    })
}
