//! Group Error Types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::permissions::PermissionError;

#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("Group not found")]
    NotFound,

    #[error("Group name is required")]
    NameRequired,

    #[error("A group needs at least one target")]
    NoTargetsSpecified,

    #[error("Invalid target email: {0}")]
    InvalidTargetEmail(String),

    #[error("One or more team ids do not exist")]
    UnknownTeam,

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for GroupError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "group_not_found", self.to_string()),
            Self::NameRequired => (StatusCode::BAD_REQUEST, "name_required", self.to_string()),
            Self::NoTargetsSpecified => (
                StatusCode::BAD_REQUEST,
                "no_targets_specified",
                self.to_string(),
            ),
            Self::InvalidTargetEmail(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_target_email",
                self.to_string(),
            ),
            Self::UnknownTeam => (StatusCode::BAD_REQUEST, "unknown_team", self.to_string()),
            Self::Permission(PermissionError::NotVisible) => (
                StatusCode::NOT_FOUND,
                "group_not_found",
                "Group not found".to_string(),
            ),
            Self::Permission(PermissionError::InvalidUser) => {
                (StatusCode::BAD_REQUEST, "invalid_user", self.to_string())
            }
            Self::Permission(PermissionError::DatabaseError(err)) => {
                tracing::error!("Database error resolving group access: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            Self::Permission(_) => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            Self::Database(err) => {
                tracing::error!("Database error in groups: {}", err);
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
