mod auth;
mod codegen;
mod db;
mod requests;
mod students;
mod validation;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AdminRepository, AuthService, TokenService};
use codegen::CodeGenerator;
use requests::{RequestRepository, RequestService};
use students::{
    CreateStudentRequest, ProgramType, StudentRepository, StudentResponse, StudentService,
    UpdateStudentRequest,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        students::handlers::create_student_handler,
        students::handlers::list_students_handler,
        students::handlers::get_student_handler,
        students::handlers::update_student_handler,
        students::handlers::delete_student_handler,
    ),
    components(
        schemas(StudentResponse, CreateStudentRequest, UpdateStudentRequest, ProgramType)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "students", description = "Student record management endpoints")
    ),
    info(
        title = "Student Records API",
        version = "1.0.0",
        description = "RESTful API for college student record administration"
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: AuthService,
    pub student_service: StudentService,
    pub request_service: RequestService,
}

impl AppState {
    fn new(db: PgPool) -> Self {
        let admin_repo = AdminRepository::new(db.clone());
        let student_repo = StudentRepository::new(db.clone());
        let request_repo = RequestRepository::new(db.clone());
        let token_service = TokenService::from_env();

        let auth_service = AuthService::new(admin_repo, student_repo.clone(), token_service);
        let student_service = StudentService::new(
            student_repo.clone(),
            CodeGenerator::exam_code(),
            CodeGenerator::exam_roll_number(),
        );
        let request_service = RequestService::new(request_repo, student_repo);

        Self {
            db,
            auth_service,
            student_service,
            request_service,
        }
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(db: PgPool) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let state = AppState::new(db);

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Admin authentication
        .route("/api/admin/register", post(auth::handlers::register_admin_handler))
        .route("/api/admin/login", post(auth::handlers::login_admin_handler))
        // Student record management (admin)
        .route("/api/students", post(students::handlers::create_student_handler))
        .route("/api/students", get(students::handlers::list_students_handler))
        .route("/api/students/:id", get(students::handlers::get_student_handler))
        .route("/api/students/:id", patch(students::handlers::update_student_handler))
        .route("/api/students/:id", delete(students::handlers::delete_student_handler))
        .route("/api/students/:id/photo", put(students::handlers::upload_photo_handler))
        .route("/api/students/:id/marks", put(students::handlers::replace_marks_handler))
        // Update requests (admin)
        .route("/api/requests", get(requests::handlers::list_requests_handler))
        .route("/api/requests/:request_id", patch(requests::handlers::decide_request_handler))
        // Student panel
        .route("/api/student/login", post(auth::handlers::login_student_handler))
        .route("/api/student/profile", get(students::handlers::student_profile_handler))
        .route("/api/student/marks", get(students::handlers::student_marks_handler))
        .route("/api/student/exam-card", get(students::handlers::student_exam_card_handler))
        .route("/api/student/password", patch(students::handlers::change_password_handler))
        .route("/api/student/update-request", post(requests::handlers::create_request_handler))
        .route("/api/student/update-requests", get(requests::handlers::request_history_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Student Records API - Starting...");

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let app = create_router(db_pool);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Student Records API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
