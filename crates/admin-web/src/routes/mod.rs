//! Route handlers for the admin web interface.

pub mod dashboard;
pub mod health;
pub mod tasks;
pub mod users;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(dashboard::dashboard_page))
        // Health check
        .route("/health", get(health::status))
        .route("/api/health", get(health::status))
        .route("/api/status", get(health::status))
        // API endpoints
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/api/tasks/:id", put(tasks::update_task).delete(tasks::delete_task))
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", delete(users::delete_user))
        .route("/api/users/:id/mark-payment", post(users::mark_payment))
        .route("/api/dashboard", get(dashboard::dashboard_api))
        .route("/api/stats", get(dashboard::stats_api))
}
