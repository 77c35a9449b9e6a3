// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Errors raised by login, registration, and bearer-token verification.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Covers both "no such account" and "wrong password" so responses do
    /// not allow user enumeration.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not authorized, no token")]
    MissingToken,

    #[error("Not authorized, token failed")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Token verified but the principal it references is gone.
    #[error("The account belonging to this token no longer exists")]
    PrincipalNotFound,

    /// Token belongs to the other principal kind (student vs admin).
    #[error("Not authorized for this resource")]
    WrongRole,

    #[error("{field} already registered")]
    Duplicate { field: String },

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::Duplicate { .. } => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::PrincipalNotFound
            | AuthError::WrongRole => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHash | AuthError::TokenGeneration(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::Duplicate { field } if field == "email" => {
                "Email already registered".to_string()
            }
            AuthError::MissingToken => {
                warn!("Missing token in request");
                self.to_string()
            }
            AuthError::InvalidToken | AuthError::ExpiredToken => {
                warn!("Rejected bearer token: {}", self);
                self.to_string()
            }
            AuthError::PrincipalNotFound | AuthError::WrongRole => {
                warn!("Rejected principal: {}", self);
                self.to_string()
            }
            AuthError::PasswordHash | AuthError::TokenGeneration(_) | AuthError::Database(_) => {
                // Internal detail stays in the logs, not the response body.
                error!("Auth internal error: {}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let envelope = if status.is_server_error() { "error" } else { "fail" };
        let body = Json(json!({
            "status": envelope,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}
