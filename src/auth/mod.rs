// Authentication module
// JWT-based login for admins and students, plus bearer-token extractors

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use middleware::{AuthenticatedAdmin, AuthenticatedStudent};
pub use models::{
    AdminAuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, Role,
    StudentAuthResponse,
};
pub use password::PasswordService;
pub use repository::AdminRepository;
pub use service::AuthService;
pub use token::TokenService;
