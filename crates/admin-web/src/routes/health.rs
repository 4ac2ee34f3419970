//! Health and status endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::error::Result as DbResult;
use database::Database;
use serde::Serialize;
use tracing::error;

use crate::state::AppState;

/// Status report returned by `/health`, `/api/health` and `/api/status`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub timestamp: String,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StoreStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Record counts included in a healthy report.
#[derive(Debug, Default, Serialize)]
pub struct StoreStats {
    pub tasks: i64,
    pub users: i64,
}

/// Report service health, probing the database unless disabled.
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<StatusReport>) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let environment = state.settings.environment.clone();

    if !state.settings.check_database {
        return (
            StatusCode::OK,
            Json(StatusReport {
                status: "healthy",
                timestamp,
                database: "build-time",
                version: Some(env!("CARGO_PKG_VERSION")),
                environment,
                stats: Some(StoreStats::default()),
                error: None,
            }),
        );
    }

    match probe(&state.db).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(StatusReport {
                status: "healthy",
                timestamp,
                database: "connected",
                version: Some(env!("CARGO_PKG_VERSION")),
                environment,
                stats: Some(stats),
                error: None,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Status check failed: database unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusReport {
                    status: "unhealthy",
                    timestamp,
                    database: "disconnected",
                    version: None,
                    environment,
                    stats: None,
                    error: Some("Database connection failed".to_string()),
                }),
            )
        }
    }
}

async fn probe(db: &Database) -> DbResult<StoreStats> {
    db.ping().await?;
    Ok(StoreStats {
        tasks: database::task::count_tasks(db.pool()).await?,
        users: database::user::count_users(db.pool()).await?,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{app, send, test_state};

    #[tokio::test]
    async fn test_healthy_report() {
        let state = test_state().await;
        database::task::create_task(
            state.db.pool(),
            "Stretch",
            chrono::Local::now().naive_local(),
        )
        .await
        .unwrap();
        let app = app(state);

        for uri in ["/health", "/api/health", "/api/status"] {
            let (status, report) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(report["status"], "healthy");
            assert_eq!(report["database"], "connected");
            assert_eq!(report["environment"], "development");
            assert_eq!(report["version"], env!("CARGO_PKG_VERSION"));
            assert_eq!(report["stats"]["tasks"], 1);
            assert_eq!(report["stats"]["users"], 0);
            assert!(report.get("error").is_none());
        }
    }

    #[tokio::test]
    async fn test_probe_disabled() {
        let mut state = test_state().await;
        state.settings.check_database = false;
        state.db.close().await;
        let app = app(state);

        let (status, report) = send(&app, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["database"], "build-time");
        assert_eq!(report["stats"]["tasks"], 0);
        assert_eq!(report["stats"]["users"], 0);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_unhealthy() {
        let state = test_state().await;
        state.db.close().await;
        let app = app(state);

        let (status, report) = send(&app, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(report["status"], "unhealthy");
        assert_eq!(report["database"], "disconnected");
        assert_eq!(report["error"], "Database connection failed");
        assert!(report["timestamp"].as_str().is_some());
        assert!(report.get("stats").is_none());
    }
}
