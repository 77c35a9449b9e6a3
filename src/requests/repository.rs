// Database repository for the update-request workflow

use sqlx::PgPool;
use uuid::Uuid;

use crate::requests::error::RequestError;
use crate::requests::models::{RequestStatus, UpdatableField, UpdateRequest};

const REQUEST_COLUMNS: &str = "id, student_id, requested_by, field, old_value, new_value, \
     status, remarks, processed_by, processed_at, created_at";

const REQUEST_COLUMNS_QUALIFIED: &str =
    "r.id, r.student_id, r.requested_by, r.field, r.old_value, r.new_value, \
     r.status, r.remarks, r.processed_by, r.processed_at, r.created_at";

fn duplicate_field(err: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if !db_err.is_unique_violation() {
        return None;
    }
    match db_err.constraint() {
        Some("students_email_key") => Some("email"),
        Some("students_college_roll_number_key") => Some("college roll number"),
        Some("students_examination_roll_number_key") => Some("examination roll number"),
        Some(_) | None => Some("value"),
    }
}

/// Repository for update-request persistence
#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new pending request. `old_value` is the student's current
    /// value for the field, snapshotted by the service.
    pub async fn create(
        &self,
        student_id: Uuid,
        field: UpdatableField,
        old_value: &str,
        new_value: &str,
    ) -> Result<UpdateRequest, RequestError> {
        let request = sqlx::query_as::<_, UpdateRequest>(&format!(
            r#"
            INSERT INTO update_requests (student_id, requested_by, field, old_value, new_value)
            VALUES ($1, $1, $2, $3, $4)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(student_id)
        .bind(field)
        .bind(old_value)
        .bind(new_value)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// A student's own requests, newest first, optionally filtered by status.
    pub async fn find_by_student(
        &self,
        student_id: Uuid,
        status: Option<RequestStatus>,
    ) -> Result<Vec<UpdateRequest>, RequestError> {
        let requests = match status {
            Some(status) => {
                sqlx::query_as::<_, UpdateRequest>(&format!(
                    "SELECT {REQUEST_COLUMNS} FROM update_requests \
                     WHERE student_id = $1 AND status = $2 ORDER BY created_at DESC"
                ))
                .bind(student_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, UpdateRequest>(&format!(
                    "SELECT {REQUEST_COLUMNS} FROM update_requests \
                     WHERE student_id = $1 ORDER BY created_at DESC"
                ))
                .bind(student_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(requests)
    }

    /// Requests for students owned by the given admin, newest first.
    pub async fn find_for_admin(
        &self,
        admin_id: Uuid,
        status: Option<RequestStatus>,
    ) -> Result<Vec<UpdateRequest>, RequestError> {
        let requests = match status {
            Some(status) => {
                sqlx::query_as::<_, UpdateRequest>(&format!(
                    "SELECT {REQUEST_COLUMNS_QUALIFIED} FROM update_requests r \
                     JOIN students s ON s.id = r.student_id \
                     WHERE s.created_by = $1 AND r.status = $2 \
                     ORDER BY r.created_at DESC"
                ))
                .bind(admin_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, UpdateRequest>(&format!(
                    "SELECT {REQUEST_COLUMNS_QUALIFIED} FROM update_requests r \
                     JOIN students s ON s.id = r.student_id \
                     WHERE s.created_by = $1 \
                     ORDER BY r.created_at DESC"
                ))
                .bind(admin_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(requests)
    }

    /// A request scoped to the admin owning its student. None covers both
    /// "does not exist" and "belongs to another admin's student".
    pub async fn find_owned(
        &self,
        id: Uuid,
        admin_id: Uuid,
    ) -> Result<Option<UpdateRequest>, RequestError> {
        let request = sqlx::query_as::<_, UpdateRequest>(&format!(
            "SELECT {REQUEST_COLUMNS_QUALIFIED} FROM update_requests r \
             JOIN students s ON s.id = r.student_id \
             WHERE r.id = $1 AND s.created_by = $2"
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Decide a pending request. The WHERE status = 'pending' guard makes
    /// the terminal transition race-safe: a request decided concurrently
    /// comes back as None. On approval the student's field is updated in
    /// the same transaction.
    pub async fn decide(
        &self,
        id: Uuid,
        admin_id: Uuid,
        target: RequestStatus,
        remarks: Option<&str>,
    ) -> Result<Option<UpdateRequest>, RequestError> {
        let mut tx = self.pool.begin().await?;

        let decided = sqlx::query_as::<_, UpdateRequest>(&format!(
            r#"
            UPDATE update_requests
            SET status = $1, remarks = $2, processed_by = $3, processed_at = NOW()
            WHERE id = $4 AND status = 'pending'
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(target)
        .bind(remarks)
        .bind(admin_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(decided) = decided else {
            return Ok(None);
        };

        if decided.status == RequestStatus::Approved {
            // Column name comes from the UpdatableField enum, never from input.
            let query = format!(
                "UPDATE students SET {} = $1, updated_at = NOW() WHERE id = $2",
                decided.field.column()
            );
            sqlx::query(&query)
                .bind(&decided.new_value)
                .bind(decided.student_id)
                .execute(&mut *tx)
                .await
                .map_err(|err| match duplicate_field(&err) {
                    Some(field) => RequestError::Duplicate {
                        field: field.to_string(),
                    },
                    None => RequestError::Database(err.to_string()),
                })?;
        }

        tx.commit().await?;
        Ok(Some(decided))
    }
}
