//! Scenario Error Types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::permissions::PermissionError;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Scenario not found")]
    NotFound,

    #[error("Scenario name is required")]
    NameRequired,

    #[error("One or more team ids do not exist")]
    UnknownTeam,

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ScenarioError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "scenario_not_found",
                self.to_string(),
            ),
            Self::NameRequired => (StatusCode::BAD_REQUEST, "name_required", self.to_string()),
            Self::UnknownTeam => (StatusCode::BAD_REQUEST, "unknown_team", self.to_string()),
            Self::Permission(PermissionError::NotVisible) => (
                StatusCode::NOT_FOUND,
                "scenario_not_found",
                "Scenario not found".to_string(),
            ),
            Self::Permission(PermissionError::InvalidUser) => {
                (StatusCode::BAD_REQUEST, "invalid_user", self.to_string())
            }
            Self::Permission(PermissionError::DatabaseError(err)) => {
                tracing::error!("Database error resolving scenario access: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            Self::Permission(_) => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            Self::Database(err) => {
                tracing::error!("Database error in scenarios: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}
