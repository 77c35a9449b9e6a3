use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error, warn};

/// Error types for student record operations
#[derive(Debug, thiserror::Error)]
pub enum StudentError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique-constraint violation, keyed by the offending column.
    #[error("duplicate value for {field}")]
    Duplicate { field: String },

    /// Also returned when the record exists but belongs to another admin,
    /// so ownership is never leaked.
    #[error("Student not found")]
    NotFound,

    /// The bounded generate-check-retry loop ran out of attempts.
    #[error("no unique code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    #[error("Your current password is wrong.")]
    WrongPassword,

    #[error("{0}")]
    Upload(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudentError {
    /// Field-specific duplicate-key messages, matching what admins see in
    /// the management UI.
    fn duplicate_message(field: &str) -> String {
        match field {
            "email" => "Email already registered".to_string(),
            "college_roll_number" => "College roll number already exists".to_string(),
            "examination_roll_number" => {
                "Error generating examination roll number. Please try again.".to_string()
            }
            "exam_code" => "Error generating exam code. Please try again.".to_string(),
            other => format!("{} already exists", other),
        }
    }
}

impl From<sqlx::Error> for StudentError {
    fn from(err: sqlx::Error) -> Self {
        StudentError::Database(err.to_string())
    }
}

impl IntoResponse for StudentError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            StudentError::Validation(msg) => {
                debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            StudentError::Duplicate { field } => {
                warn!("Duplicate key on {}", field);
                (StatusCode::BAD_REQUEST, Self::duplicate_message(field))
            }
            StudentError::NotFound => (StatusCode::NOT_FOUND, "Student not found".to_string()),
            StudentError::CodeSpaceExhausted { attempts } => {
                error!("Code space exhausted after {} attempts", attempts);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to allocate a unique code. Please try again.".to_string(),
                )
            }
            StudentError::WrongPassword => (StatusCode::UNAUTHORIZED, self.to_string()),
            StudentError::Upload(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            StudentError::Database(msg) => {
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            StudentError::Internal(msg) => {
                error!("Internal error: {}", msg);
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
