// HTTP handlers for update-request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthenticatedAdmin, AuthenticatedStudent};
use crate::requests::{
    CreateUpdateRequest, DecideRequest, RequestError, RequestListQuery, UpdateRequestResponse,
};

/// Handler for POST /api/student/update-request
/// Files an update request for the authenticated student
pub async fn create_request_handler(
    State(state): State<crate::AppState>,
    student: AuthenticatedStudent,
    Json(request): Json<CreateUpdateRequest>,
) -> Result<(StatusCode, Json<UpdateRequestResponse>), RequestError> {
    request
        .validate()
        .map_err(|e| RequestError::Validation(e.to_string()))?;

    let response = state
        .request_service
        .create_request(student.student_id, request.field, &request.new_value)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET /api/student/update-requests
/// The authenticated student's own request history
pub async fn request_history_handler(
    State(state): State<crate::AppState>,
    student: AuthenticatedStudent,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<UpdateRequestResponse>>, RequestError> {
    let requests = state
        .request_service
        .history(student.student_id, query.status)
        .await?;

    Ok(Json(requests))
}

/// Handler for GET /api/requests
/// Update requests for students owned by the authenticated admin
pub async fn list_requests_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<UpdateRequestResponse>>, RequestError> {
    let requests = state
        .request_service
        .list_for_admin(admin.admin_id, query.status)
        .await?;

    Ok(Json(requests))
}

/// Handler for PATCH /api/requests/{request_id}
/// Approves or rejects a pending request
pub async fn decide_request_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
    Path(request_id): Path<Uuid>,
    Json(request): Json<DecideRequest>,
) -> Result<Json<UpdateRequestResponse>, RequestError> {
    let response = state
        .request_service
        .decide(
            request_id,
            admin.admin_id,
            request.status,
            request.remarks.as_deref(),
        )
        .await?;

    Ok(Json(response))
}
