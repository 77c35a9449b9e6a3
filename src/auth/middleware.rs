// Bearer-token extractors for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::auth::{error::AuthError, models::Role, repository::AdminRepository, token::TokenService};
use crate::students::StudentRepository;
use crate::AppState;

/// Pull the raw token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    header.strip_prefix("Bearer ").ok_or(AuthError::InvalidToken)
}

/// Admin principal resolved from a bearer token.
///
/// Verifies signature/expiry, checks the role claim, then confirms the admin
/// still exists in the store before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub admin_id: Uuid,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = TokenService::from_env().validate_token(token)?;

        if claims.role != Role::Admin {
            return Err(AuthError::WrongRole);
        }

        let admin = AdminRepository::new(state.db.clone())
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::PrincipalNotFound)?;

        Ok(AuthenticatedAdmin {
            admin_id: admin.id,
            email: admin.email,
        })
    }
}

/// Student principal resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedStudent {
    pub student_id: Uuid,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedStudent
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = TokenService::from_env().validate_token(token)?;

        if claims.role != Role::Student {
            return Err(AuthError::WrongRole);
        }

        let student = StudentRepository::new(state.db.clone())
            .find_by_id(claims.sub)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?
            .ok_or(AuthError::PrincipalNotFound)?;

        Ok(AuthenticatedStudent {
            student_id: student.id,
            email: student.email,
        })
    }
}
