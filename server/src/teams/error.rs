//! Team Error Types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    #[error("Team not found")]
    NotFound,

    #[error("Team name is required")]
    NameRequired,

    #[error("A team needs at least one member")]
    NoMembersSpecified,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("One or more member user ids do not exist")]
    UnknownMember,

    #[error("A team with this name already exists")]
    DuplicateName,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for TeamError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            Self::NotFound => (StatusCode::NOT_FOUND, "team_not_found", self.to_string()),
            Self::NameRequired => (StatusCode::BAD_REQUEST, "name_required", self.to_string()),
            Self::NoMembersSpecified => (
                StatusCode::BAD_REQUEST,
                "no_members_specified",
                self.to_string(),
            ),
            Self::UnknownRole(_) => (StatusCode::BAD_REQUEST, "unknown_role", self.to_string()),
            Self::UnknownMember => (StatusCode::BAD_REQUEST, "unknown_member", self.to_string()),
            Self::DuplicateName => (StatusCode::CONFLICT, "duplicate_name", self.to_string()),
            Self::Database(err) => {
                tracing::error!("Database error in teams: {}", err);
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
