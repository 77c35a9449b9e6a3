// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{AdminAuthResponse, LoginRequest, RegisterRequest, StudentAuthResponse},
};
use crate::AppState;

/// POST /api/admin/register
pub async fn register_admin_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AdminAuthResponse>), AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let response = state
        .auth_service
        .register_admin(&request.name, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/admin/login
pub async fn login_admin_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AdminAuthResponse>, AuthError> {
    request
        .validate()
        .map_err(|_| AuthError::Validation("Please provide email and password".to_string()))?;

    let response = state
        .auth_service
        .login_admin(&request.email, &request.password)
        .await?;

    Ok(Json(response))
}

/// POST /api/student/login
pub async fn login_student_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<StudentAuthResponse>, AuthError> {
    request
        .validate()
        .map_err(|_| AuthError::Validation("Please provide email and password".to_string()))?;

    let response = state
        .auth_service
        .login_student(&request.email, &request.password)
        .await?;

    Ok(Json(response))
}
