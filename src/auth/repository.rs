// Database repository for admin accounts

use crate::auth::{error::AuthError, models::Admin};
use sqlx::PgPool;
use uuid::Uuid;

/// Admin repository for database operations
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new admin. A unique-index violation on email becomes a
    /// Duplicate error rather than a 500.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Admin, AuthError> {
        sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::Duplicate {
                        field: "email".to_string(),
                    };
                }
            }
            AuthError::Database(e.to_string())
        })
    }

    /// Find an admin by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AuthError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM admins
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Find an admin by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, AuthError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }
}
