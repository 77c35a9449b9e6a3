// Authentication service - business logic layer

use crate::auth::{
    error::AuthError,
    models::{AdminAuthResponse, Role, StudentAuthResponse},
    password::PasswordService,
    repository::AdminRepository,
    token::TokenService,
};
use crate::students::StudentRepository;

/// Coordinates credential checks and token issuance for both principal
/// kinds. Admin and student accounts live in disjoint namespaces.
#[derive(Clone)]
pub struct AuthService {
    admin_repo: AdminRepository,
    student_repo: StudentRepository,
    token_service: TokenService,
}

impl AuthService {
    pub fn new(
        admin_repo: AdminRepository,
        student_repo: StudentRepository,
        token_service: TokenService,
    ) -> Self {
        Self {
            admin_repo,
            student_repo,
            token_service,
        }
    }

    /// Register a new admin and log them straight in.
    pub async fn register_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AdminAuthResponse, AuthError> {
        let password_hash = PasswordService::hash_password(password)?;
        let admin = self.admin_repo.create(name, email, &password_hash).await?;

        tracing::info!("Registered admin {}", admin.id);
        let token = self.token_service.generate_token(admin.id, Role::Admin)?;
        Ok(AdminAuthResponse {
            token,
            admin: admin.into(),
        })
    }

    /// Admin login. Unknown email and wrong password produce the same
    /// client-facing error; the distinction only reaches the debug log.
    pub async fn login_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminAuthResponse, AuthError> {
        let Some(admin) = self.admin_repo.find_by_email(email).await? else {
            tracing::debug!("Admin login failed: no account for email");
            return Err(AuthError::InvalidCredentials);
        };

        if !PasswordService::verify_password(password, &admin.password_hash)? {
            tracing::debug!("Admin login failed: password mismatch for {}", admin.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_service.generate_token(admin.id, Role::Admin)?;
        Ok(AdminAuthResponse {
            token,
            admin: admin.into(),
        })
    }

    /// Student login against the student namespace.
    pub async fn login_student(
        &self,
        email: &str,
        password: &str,
    ) -> Result<StudentAuthResponse, AuthError> {
        let student = self
            .student_repo
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        let Some(student) = student else {
            tracing::debug!("Student login failed: no account for email");
            return Err(AuthError::InvalidCredentials);
        };

        if !PasswordService::verify_password(password, &student.password_hash)? {
            tracing::debug!("Student login failed: password mismatch for {}", student.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .token_service
            .generate_token(student.id, Role::Student)?;
        Ok(StudentAuthResponse {
            token,
            student: student.into(),
        })
    }
}
