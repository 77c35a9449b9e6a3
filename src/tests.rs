// End-to-end handler tests for the Student Records API
// Each test registers its own admin and uses unique identifiers, so tests
// can run in parallel against the same database.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

// ============================================================================
// Test Helpers
// ============================================================================

/// Connects to the test database and runs migrations.
async fn create_test_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        "postgresql://records_user:records_pass@db:5432/records_db".to_string()
    });

    let pool = crate::db::create_pool(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

async fn create_test_app() -> TestServer {
    let pool = create_test_pool().await;
    TestServer::new(crate::create_router(pool)).unwrap()
}

/// Short unique suffix so concurrent tests never collide on unique columns.
fn unique() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Registers a fresh admin and returns their bearer token.
async fn register_admin(server: &TestServer) -> String {
    let response = server
        .post("/api/admin/register")
        .json(&json!({
            "name": "Test Admin",
            "email": format!("admin-{}@college.edu", unique()),
            "password": "secret-password"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    body["token"].as_str().expect("token in response").to_string()
}

fn student_payload(email: &str, roll: &str) -> Value {
    json!({
        "student_name": "Jane Doe",
        "email": email,
        "password": "student-pass",
        "college_roll_number": roll,
        "program_type": "UG",
        "stream": "Computer Science",
        "batch": "2024"
    })
}

/// Creates a student under the given admin token and returns the response body.
async fn create_student(server: &TestServer, token: &str) -> Value {
    let email = format!("student-{}@college.edu", unique());
    let roll = format!("CR-{}", unique());

    let response = server
        .post("/api/students")
        .authorization_bearer(token)
        .json(&student_payload(&email, &roll))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

/// Logs a student in with the default test password and returns their token.
async fn login_student(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/api/student/login")
        .json(&json!({"email": email, "password": "student-pass"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    body["token"].as_str().expect("token in response").to_string()
}

// ============================================================================
// Admin authentication
// ============================================================================

#[tokio::test]
async fn test_admin_register_and_login() {
    let server = create_test_app().await;
    let email = format!("admin-{}@college.edu", unique());

    let response = server
        .post("/api/admin/register")
        .json(&json!({
            "name": "Head Clerk",
            "email": email,
            "password": "secret-password"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["token"].is_string());
    assert_eq!(body["admin"]["email"], email.as_str());
    assert!(body["admin"].get("password_hash").is_none());

    let response = server
        .post("/api/admin/login")
        .json(&json!({"email": email, "password": "secret-password"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_login_failures_are_indistinguishable() {
    let server = create_test_app().await;
    let email = format!("admin-{}@college.edu", unique());

    server
        .post("/api/admin/register")
        .json(&json!({"name": "A", "email": email, "password": "secret-password"}))
        .await;

    let wrong_password = server
        .post("/api/admin/login")
        .json(&json!({"email": email, "password": "not-the-password"}))
        .await;
    let unknown_email = server
        .post("/api/admin/login")
        .json(&json!({
            "email": format!("ghost-{}@college.edu", unique()),
            "password": "secret-password"
        }))
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.text(), unknown_email.text());
}

#[tokio::test]
async fn test_duplicate_admin_email_rejected() {
    let server = create_test_app().await;
    let email = format!("admin-{}@college.edu", unique());
    let payload = json!({"name": "A", "email": email, "password": "secret-password"});

    let first = server.post("/api/admin/register").json(&payload).await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = server.post("/api/admin/register").json(&payload).await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = second.json();
    assert_eq!(body["message"], "Email already registered");
}

// ============================================================================
// Student creation and generated identifiers
// ============================================================================

#[tokio::test]
async fn test_create_student_generates_identifiers() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;

    let student = create_student(&server, &token).await;

    let exam_code = student["exam_code"].as_str().unwrap();
    assert_eq!(exam_code.len(), 6);
    assert!(exam_code.chars().all(|c| c.is_ascii_digit()));
    assert!(!exam_code.starts_with('0'));

    let roll = student["examination_roll_number"].as_str().unwrap();
    assert!(roll.starts_with("EX-"));
    assert_eq!(roll.len(), 9);
    assert!(roll[3..].chars().all(|c| c.is_ascii_digit()));

    assert!(student.get("password").is_none());
    assert!(student.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_student_rejects_duplicate_college_roll() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;
    let roll = format!("CR-{}", unique());

    let first = server
        .post("/api/students")
        .authorization_bearer(&token)
        .json(&student_payload(
            &format!("s-{}@college.edu", unique()),
            &roll,
        ))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = server
        .post("/api/students")
        .authorization_bearer(&token)
        .json(&student_payload(
            &format!("s-{}@college.edu", unique()),
            &roll,
        ))
        .await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = second.json();
    assert_eq!(body["message"], "College roll number already exists");
}

#[tokio::test]
async fn test_create_student_rejects_duplicate_email() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;
    let email = format!("s-{}@college.edu", unique());

    let first = server
        .post("/api/students")
        .authorization_bearer(&token)
        .json(&student_payload(&email, &format!("CR-{}", unique())))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = server
        .post("/api/students")
        .authorization_bearer(&token)
        .json(&student_payload(&email, &format!("CR-{}", unique())))
        .await;
    assert_eq!(second.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = second.json();
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn test_create_student_rejects_invalid_program_type() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;

    let mut payload = student_payload(
        &format!("s-{}@college.edu", unique()),
        &format!("CR-{}", unique()),
    );
    payload["program_type"] = json!("PhD");

    let response = server
        .post("/api/students")
        .authorization_bearer(&token)
        .json(&payload)
        .await;

    // Unknown enum variant fails at deserialization
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Admin CRUD scoping
// ============================================================================

#[tokio::test]
async fn test_students_are_scoped_to_owning_admin() {
    let server = create_test_app().await;
    let token_a = register_admin(&server).await;
    let token_b = register_admin(&server).await;

    let student = create_student(&server, &token_a).await;
    let id = student["id"].as_str().unwrap();

    // Owner sees it
    let response = server
        .get(&format!("/api/students/{}", id))
        .authorization_bearer(&token_a)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Another admin gets 404 on read, update, and delete
    let response = server
        .get(&format!("/api/students/{}", id))
        .authorization_bearer(&token_b)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .patch(&format!("/api/students/{}", id))
        .authorization_bearer(&token_b)
        .json(&json!({"stream": "Physics"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .delete(&format!("/api/students/{}", id))
        .authorization_bearer(&token_b)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // And their list does not include it
    let response = server
        .get("/api/students")
        .authorization_bearer(&token_b)
        .await;
    let list: Vec<Value> = response.json();
    assert!(list.iter().all(|s| s["id"].as_str() != Some(id)));
}

#[tokio::test]
async fn test_partial_update_preserves_other_fields() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;

    let student = create_student(&server, &token).await;
    let id = student["id"].as_str().unwrap();
    let original_roll = student["college_roll_number"].as_str().unwrap().to_string();
    let original_code = student["exam_code"].as_str().unwrap().to_string();

    let response = server
        .patch(&format!("/api/students/{}", id))
        .authorization_bearer(&token)
        .json(&json!({"stream": "Mathematics"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let updated: Value = response.json();
    assert_eq!(updated["stream"], "Mathematics");
    assert_eq!(updated["college_roll_number"], original_roll.as_str());
    assert_eq!(updated["exam_code"], original_code.as_str());
    assert_eq!(updated["student_name"], student["student_name"]);
}

#[tokio::test]
async fn test_delete_then_get_returns_not_found() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;

    let student = create_student(&server, &token).await;
    let id = student["id"].as_str().unwrap();

    let response = server
        .delete(&format!("/api/students/{}", id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server
        .get(&format!("/api/students/{}", id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Student not found");
}

// ============================================================================
// Token handling
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = create_test_app().await;

    let response = server.get("/api/students").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_token_rejected_on_admin_routes() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let student_token = login_student(&server, student["email"].as_str().unwrap()).await;

    let response = server
        .get("/api/students")
        .authorization_bearer(&student_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_token_rejected_on_student_routes() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let response = server
        .get("/api/student/profile")
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let server = create_test_app().await;

    let response = server
        .get("/api/students")
        .authorization_bearer("not.a.jwt")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Student panel
// ============================================================================

#[tokio::test]
async fn test_student_login_and_profile() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let email = student["email"].as_str().unwrap();
    let token = login_student(&server, email).await;

    let response = server
        .get("/api/student/profile")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let profile: Value = response.json();
    assert_eq!(profile["email"], email);
    assert_eq!(profile["exam_code"], student["exam_code"]);
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn test_marks_upload_and_student_view() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let id = student["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/students/{}/marks", id))
        .authorization_bearer(&admin_token)
        .json(&json!({
            "marks": [
                {"subject": "Algorithms", "score": 78, "max_score": 100},
                {"subject": "Databases", "score": 91, "max_score": 100}
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let token = login_student(&server, student["email"].as_str().unwrap()).await;
    let response = server
        .get("/api/student/marks")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let marks: Value = response.json();
    assert_eq!(marks["exam_code"], student["exam_code"]);
    assert_eq!(marks["marks"].as_array().unwrap().len(), 2);
    assert_eq!(marks["marks"][0]["subject"], "Algorithms");
    assert_eq!(marks["marks"][0]["score"], 78);
}

#[tokio::test]
async fn test_marks_validation_rejects_negative_score() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let id = student["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/students/{}/marks", id))
        .authorization_bearer(&admin_token)
        .json(&json!({
            "marks": [{"subject": "Algorithms", "score": -1, "max_score": 100}]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_exam_card_contains_identifiers() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let token = login_student(&server, student["email"].as_str().unwrap()).await;

    let response = server
        .get("/api/student/exam-card")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let card: Value = response.json();
    assert_eq!(card["student_name"], student["student_name"]);
    assert_eq!(card["exam_code"], student["exam_code"]);
    assert_eq!(
        card["examination_roll_number"],
        student["examination_roll_number"]
    );
    assert_eq!(card["program_type"], "UG");
    assert!(card.get("email").is_none());
}

#[tokio::test]
async fn test_change_password_flow() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let email = student["email"].as_str().unwrap();
    let token = login_student(&server, email).await;

    // Wrong current password is rejected
    let response = server
        .patch("/api/student/password")
        .authorization_bearer(&token)
        .json(&json!({
            "current_password": "wrong-pass",
            "new_password": "brand-new-pass"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Your current password is wrong.");

    // Correct current password succeeds
    let response = server
        .patch("/api/student/password")
        .authorization_bearer(&token)
        .json(&json!({
            "current_password": "student-pass",
            "new_password": "brand-new-pass"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Old password no longer works, new one does
    let response = server
        .post("/api/student/login")
        .json(&json!({"email": email, "password": "student-pass"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/student/login")
        .json(&json!({"email": email, "password": "brand-new-pass"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

// ============================================================================
// Photo upload
// ============================================================================

/// Smallest valid-enough PNG payload for upload tests.
fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]
}

fn photo_form(bytes: Vec<u8>, file_name: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "photo",
        Part::bytes(bytes).file_name(file_name).mime_type(mime),
    )
}

/// True if any file under uploads/students/ belongs to the given student id.
async fn uploaded_file_exists_for(student_id: &str) -> bool {
    let dir = std::path::Path::new("uploads").join("students");
    let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
        return false;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        if entry
            .file_name()
            .to_string_lossy()
            .starts_with(&format!("{}-", student_id))
        {
            return true;
        }
    }
    false
}

#[tokio::test]
async fn test_photo_upload_persists_path_and_file() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;

    let student = create_student(&server, &token).await;
    let id = student["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/students/{}/photo", id))
        .authorization_bearer(&token)
        .multipart(photo_form(png_bytes(), "portrait.png", "image/png"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let updated: Value = response.json();
    let path = updated["profile_photo_path"].as_str().unwrap();
    assert!(path.starts_with("/uploads/students/"));
    assert!(path.ends_with(".png"));
    assert!(uploaded_file_exists_for(id).await);

    // The path also shows up on subsequent reads
    let response = server
        .get(&format!("/api/students/{}", id))
        .authorization_bearer(&token)
        .await;
    let fetched: Value = response.json();
    assert_eq!(fetched["profile_photo_path"], path);
}

#[tokio::test]
async fn test_photo_upload_rejects_non_image() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;

    let student = create_student(&server, &token).await;
    let id = student["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/students/{}/photo", id))
        .authorization_bearer(&token)
        .multipart(photo_form(b"not an image".to_vec(), "notes.txt", "text/plain"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Only image files are allowed");
    assert!(!uploaded_file_exists_for(id).await);
}

#[tokio::test]
async fn test_photo_upload_requires_photo_field() {
    let server = create_test_app().await;
    let token = register_admin(&server).await;

    let student = create_student(&server, &token).await;
    let id = student["id"].as_str().unwrap();

    let form = MultipartForm::new().add_part(
        "picture",
        Part::bytes(png_bytes()).file_name("portrait.png").mime_type("image/png"),
    );
    let response = server
        .put(&format!("/api/students/{}/photo", id))
        .authorization_bearer(&token)
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Missing 'photo' form field");
}

#[tokio::test]
async fn test_photo_upload_for_foreign_student_leaves_no_file() {
    let server = create_test_app().await;
    let token_a = register_admin(&server).await;
    let token_b = register_admin(&server).await;

    let student = create_student(&server, &token_a).await;
    let id = student["id"].as_str().unwrap();

    let response = server
        .put(&format!("/api/students/{}/photo", id))
        .authorization_bearer(&token_b)
        .multipart(photo_form(png_bytes(), "portrait.png", "image/png"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(!uploaded_file_exists_for(id).await);
}

// ============================================================================
// Update-request workflow
// ============================================================================

#[tokio::test]
async fn test_update_request_approval_applies_change() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let token = login_student(&server, student["email"].as_str().unwrap()).await;

    let response = server
        .post("/api/student/update-request")
        .authorization_bearer(&token)
        .json(&json!({"field": "stream", "new_value": "Physics"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let request: Value = response.json();
    assert_eq!(request["status"], "pending");
    assert_eq!(request["old_value"], "Computer Science");
    assert_eq!(request["new_value"], "Physics");
    let request_id = request["id"].as_str().unwrap();

    // Admin sees it in the pending list
    let response = server
        .get("/api/requests?status=pending")
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let list: Vec<Value> = response.json();
    assert!(list.iter().any(|r| r["id"].as_str() == Some(request_id)));

    // Approve with remarks
    let response = server
        .patch(&format!("/api/requests/{}", request_id))
        .authorization_bearer(&admin_token)
        .json(&json!({"status": "approved", "remarks": "Verified against transcript"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let decided: Value = response.json();
    assert_eq!(decided["status"], "approved");
    assert_eq!(decided["remarks"], "Verified against transcript");
    assert!(decided["processed_at"].is_string());

    // The field change landed on the student record
    let response = server
        .get("/api/student/profile")
        .authorization_bearer(&token)
        .await;
    let profile: Value = response.json();
    assert_eq!(profile["stream"], "Physics");
}

#[tokio::test]
async fn test_rejected_request_leaves_record_unchanged() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let token = login_student(&server, student["email"].as_str().unwrap()).await;

    let response = server
        .post("/api/student/update-request")
        .authorization_bearer(&token)
        .json(&json!({"field": "batch", "new_value": "2025"}))
        .await;
    let request: Value = response.json();
    let request_id = request["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/requests/{}", request_id))
        .authorization_bearer(&admin_token)
        .json(&json!({"status": "rejected", "remarks": "No supporting document"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get("/api/student/profile")
        .authorization_bearer(&token)
        .await;
    let profile: Value = response.json();
    assert_eq!(profile["batch"], "2024");
}

#[tokio::test]
async fn test_decided_request_cannot_be_decided_again() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let token = login_student(&server, student["email"].as_str().unwrap()).await;

    let response = server
        .post("/api/student/update-request")
        .authorization_bearer(&token)
        .json(&json!({"field": "stream", "new_value": "Physics"}))
        .await;
    let request: Value = response.json();
    let request_id = request["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/requests/{}", request_id))
        .authorization_bearer(&admin_token)
        .json(&json!({"status": "rejected"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .patch(&format!("/api/requests/{}", request_id))
        .authorization_bearer(&admin_token)
        .json(&json!({"status": "approved"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_cannot_be_set_back_to_pending() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let token = login_student(&server, student["email"].as_str().unwrap()).await;

    let response = server
        .post("/api/student/update-request")
        .authorization_bearer(&token)
        .json(&json!({"field": "stream", "new_value": "Physics"}))
        .await;
    let request: Value = response.json();
    let request_id = request["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/requests/{}", request_id))
        .authorization_bearer(&admin_token)
        .json(&json!({"status": "pending"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_admin_cannot_decide_request() {
    let server = create_test_app().await;
    let token_a = register_admin(&server).await;
    let token_b = register_admin(&server).await;

    let student = create_student(&server, &token_a).await;
    let student_token = login_student(&server, student["email"].as_str().unwrap()).await;

    let response = server
        .post("/api/student/update-request")
        .authorization_bearer(&student_token)
        .json(&json!({"field": "stream", "new_value": "Physics"}))
        .await;
    let request: Value = response.json();
    let request_id = request["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/requests/{}", request_id))
        .authorization_bearer(&token_b)
        .json(&json!({"status": "approved"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_sees_own_request_history() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let token = login_student(&server, student["email"].as_str().unwrap()).await;

    server
        .post("/api/student/update-request")
        .authorization_bearer(&token)
        .json(&json!({"field": "stream", "new_value": "Physics"}))
        .await;
    server
        .post("/api/student/update-request")
        .authorization_bearer(&token)
        .json(&json!({"field": "batch", "new_value": "2025"}))
        .await;

    let response = server
        .get("/api/student/update-requests")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let history: Vec<Value> = response.json();
    assert_eq!(history.len(), 2);
    // Newest first
    assert_eq!(history[0]["field"], "batch");
    assert_eq!(history[1]["field"], "stream");
}

#[tokio::test]
async fn test_update_request_rejects_invalid_program_type_value() {
    let server = create_test_app().await;
    let admin_token = register_admin(&server).await;

    let student = create_student(&server, &admin_token).await;
    let token = login_student(&server, student["email"].as_str().unwrap()).await;

    let response = server
        .post("/api/student/update-request")
        .authorization_bearer(&token)
        .json(&json!({"field": "programType", "new_value": "PhD"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
