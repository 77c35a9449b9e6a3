// HTTP handlers for student record management and the student panel

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{AuthenticatedAdmin, AuthenticatedStudent, ChangePasswordRequest};
use crate::students::{
    CreateStudentRequest, ExamCard, MarksResponse, ReplaceMarksRequest, StudentError,
    StudentResponse, UpdateStudentRequest,
};

const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = StudentResponse),
        (status = 400, description = "Invalid input or duplicate value", body = String, example = json!({"status": "fail", "message": "Email already registered"})),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Internal server error", body = String, example = json!({"status": "error", "message": "Internal server error"}))
    ),
    tag = "students",
    security(("bearer_auth" = []))
)]
pub async fn create_student_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
    Json(request): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), StudentError> {
    request
        .validate()
        .map_err(|e| StudentError::Validation(e.to_string()))?;

    let student = state
        .student_service
        .create_student(admin.admin_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "Students created by the calling admin", body = Vec<StudentResponse>),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "students",
    security(("bearer_auth" = []))
)]
pub async fn list_students_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
) -> Result<Json<Vec<StudentResponse>>, StudentError> {
    let students = state.student_service.list_students(admin.admin_id).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Student not found or owned by another admin", body = String, example = json!({"status": "fail", "message": "Student not found"})),
        (status = 500, description = "Internal server error")
    ),
    tag = "students",
    security(("bearer_auth" = []))
)]
pub async fn get_student_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentResponse>, StudentError> {
    let student = state
        .student_service
        .get_student(id, admin.admin_id)
        .await?;
    Ok(Json(student))
}

#[utoipa::path(
    patch,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Invalid input or duplicate roll number"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Student not found or owned by another admin"),
        (status = 500, description = "Internal server error")
    ),
    tag = "students",
    security(("bearer_auth" = []))
)]
pub async fn update_student_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>, StudentError> {
    request
        .validate()
        .map_err(|e| StudentError::Validation(e.to_string()))?;

    let student = state
        .student_service
        .update_student(id, admin.admin_id, request)
        .await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Student not found or owned by another admin"),
        (status = 500, description = "Internal server error")
    ),
    tag = "students",
    security(("bearer_auth" = []))
)]
pub async fn delete_student_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StudentError> {
    state
        .student_service
        .delete_student(id, admin.admin_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT /api/students/{id}/photo
/// Accepts a multipart form with a single "photo" image field (max 5 MB).
pub async fn upload_photo_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<StudentResponse>, StudentError> {
    // Ownership check comes first so a nonexistent or foreign student never
    // leaves a file on disk.
    state.student_service.get_student(id, admin.admin_id).await?;

    let mut saved: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| StudentError::Upload(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return Err(StudentError::Upload(
                "Only image files are allowed".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| StudentError::Upload(e.to_string()))?;
        if data.len() > MAX_PHOTO_BYTES {
            return Err(StudentError::Upload(
                "Photo must be smaller than 5 MB".to_string(),
            ));
        }

        let extension = match content_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "jpg",
        };
        saved = Some((extension.to_string(), data.to_vec()));
    }

    let Some((extension, data)) = saved else {
        return Err(StudentError::Upload(
            "Missing 'photo' form field".to_string(),
        ));
    };

    let upload_root = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
    let dir = std::path::Path::new(&upload_root).join("students");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| StudentError::Internal(e.to_string()))?;

    let file_name = format!("{}-{}.{}", id, Uuid::new_v4(), extension);
    tokio::fs::write(dir.join(&file_name), data)
        .await
        .map_err(|e| StudentError::Internal(e.to_string()))?;

    let public_path = format!("/uploads/students/{}", file_name);
    let student = match state
        .student_service
        .set_photo(id, admin.admin_id, &public_path)
        .await
    {
        Ok(student) => student,
        Err(err) => {
            // The student vanished between the check and the write; do not
            // leave the file behind.
            let _ = tokio::fs::remove_file(dir.join(&file_name)).await;
            return Err(err);
        }
    };

    Ok(Json(student))
}

/// Handler for PUT /api/students/{id}/marks
/// Replaces the student's marks set (admin only).
pub async fn replace_marks_handler(
    State(state): State<crate::AppState>,
    admin: AuthenticatedAdmin,
    Path(id): Path<Uuid>,
    Json(request): Json<ReplaceMarksRequest>,
) -> Result<StatusCode, StudentError> {
    request
        .validate()
        .map_err(|e| StudentError::Validation(e.to_string()))?;

    state
        .student_service
        .replace_marks(id, admin.admin_id, request.marks)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/student/profile
pub async fn student_profile_handler(
    State(state): State<crate::AppState>,
    student: AuthenticatedStudent,
) -> Result<Json<StudentResponse>, StudentError> {
    let profile = state.student_service.profile(student.student_id).await?;
    Ok(Json(profile))
}

/// Handler for GET /api/student/marks
pub async fn student_marks_handler(
    State(state): State<crate::AppState>,
    student: AuthenticatedStudent,
) -> Result<Json<MarksResponse>, StudentError> {
    let marks = state
        .student_service
        .marks_for_student(student.student_id)
        .await?;
    Ok(Json(marks))
}

/// Handler for GET /api/student/exam-card
pub async fn student_exam_card_handler(
    State(state): State<crate::AppState>,
    student: AuthenticatedStudent,
) -> Result<Json<ExamCard>, StudentError> {
    let card = state.student_service.exam_card(student.student_id).await?;
    Ok(Json(card))
}

/// Handler for PATCH /api/student/password
pub async fn change_password_handler(
    State(state): State<crate::AppState>,
    student: AuthenticatedStudent,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, StudentError> {
    request
        .validate()
        .map_err(|e| StudentError::Validation(e.to_string()))?;

    state
        .student_service
        .change_password(
            student.student_id,
            &request.current_password,
            &request.new_password,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Password changed successfully"
    })))
}
