use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

/// Error types for the update-request workflow
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Also covers requests on students owned by another admin.
    #[error("Update request not found")]
    NotFound,

    #[error("{0}")]
    InvalidTransition(String),

    /// The student's current value for the requested field is empty, so
    /// there is nothing to snapshot as old_value.
    #[error("Invalid field for update")]
    EmptyField,

    /// Approving the request would violate a unique constraint.
    #[error("duplicate value for {field}")]
    Duplicate { field: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RequestError {
    fn from(err: sqlx::Error) -> Self {
        RequestError::Database(err.to_string())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RequestError::Validation(msg) => {
                debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            RequestError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            RequestError::InvalidTransition(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            RequestError::EmptyField => (StatusCode::BAD_REQUEST, self.to_string()),
            RequestError::Duplicate { field } => (
                StatusCode::BAD_REQUEST,
                format!("Cannot approve: {} already in use", field),
            ),
            RequestError::Database(msg) => {
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let envelope = if status.is_server_error() { "error" } else { "fail" };
        let body = Json(json!({
            "status": envelope,
            "message": message,
        }));

        (status, body).into_response()
    }
}
