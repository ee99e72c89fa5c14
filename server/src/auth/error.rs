//! Authentication Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong username or password. Deliberately does not say which.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Username already taken")]
    UserAlreadyExists,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Argon2 failure while hashing or parsing a stored hash.
    #[error("Password processing failed")]
    PasswordHash,

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            Self::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            Self::UserAlreadyExists => (StatusCode::CONFLICT, "user_exists"),
            Self::InvalidToken | Self::Jwt(_) => (StatusCode::UNAUTHORIZED, "invalid_token"),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "token_expired"),
            Self::MissingAuthHeader => (StatusCode::UNAUTHORIZED, "missing_auth"),
            Self::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "invalid_auth_header"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::PasswordHash | Self::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Database(err) = &self {
            tracing::error!("Database error in auth: {}", err);
        }

        let (status, code) = self.status_and_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
