//! Error types for the admin web interface.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracker_core::ScheduleRejection;

/// Errors that can occur in the admin web interface.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// The request was refused by a scheduling rule.
    #[error("Rejected: {0}")]
    Rejected(#[from] ScheduleRejection),

    /// The request body, path or query could not be decoded.
    #[error("{message}: {detail}")]
    BadRequest {
        message: &'static str,
        detail: String,
    },
}

impl From<JsonRejection> for AdminError {
    fn from(rejection: JsonRejection) -> Self {
        AdminError::BadRequest {
            message: "Invalid request body",
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AdminError {
    fn from(rejection: PathRejection) -> Self {
        AdminError::BadRequest {
            message: "Invalid path parameter",
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AdminError {
    fn from(rejection: QueryRejection) -> Self {
        AdminError::BadRequest {
            message: "Invalid query string",
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AdminError::Rejected(reason) => rejected(*reason),
            AdminError::BadRequest { message, detail } => {
                tracing::warn!(detail = %detail, "{}", message);
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            // A racing write that slipped past the pre-check and hit the unique index.
            AdminError::Database(DatabaseError::AlreadyExists { entity: "Task", .. }) => {
                rejected(ScheduleRejection::DateAlreadyTaken)
            }
            AdminError::Database(DatabaseError::NotFound { entity, id }) => {
                tracing::warn!(entity, id = %id, "Not found");
                (
                    StatusCode::NOT_FOUND,
                    json!({ "error": format!("{} not found", entity) }),
                )
            }
            AdminError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn rejected(reason: ScheduleRejection) -> (StatusCode, serde_json::Value) {
    tracing::warn!(reason = reason.code(), "Request rejected");
    (
        StatusCode::BAD_REQUEST,
        json!({
            "error": reason.to_string(),
            "reason": reason.code(),
        }),
    )
}

/// Result type for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
