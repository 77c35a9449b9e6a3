// Database repository for student records and marks

use sqlx::PgPool;
use uuid::Uuid;

use crate::students::error::StudentError;
use crate::students::models::{Mark, MarkEntry, ProgramType, Student, UpdateStudentRequest};

const STUDENT_COLUMNS: &str = "id, student_name, email, password_hash, college_roll_number, \
     examination_roll_number, program_type, stream, batch, exam_code, profile_photo_path, \
     created_by, created_at, updated_at";

/// Column values for a new student row. Generated identifiers are supplied
/// by the service after running the code generator.
#[derive(Debug)]
pub struct NewStudent {
    pub student_name: String,
    pub email: String,
    pub password_hash: String,
    pub college_roll_number: String,
    pub examination_roll_number: String,
    pub program_type: ProgramType,
    pub stream: String,
    pub batch: String,
    pub exam_code: String,
    pub created_by: Uuid,
}

/// Translate a unique-index violation into the offending column name.
fn duplicate_field(err: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if !db_err.is_unique_violation() {
        return None;
    }
    match db_err.constraint() {
        Some("students_email_key") => Some("email"),
        Some("students_college_roll_number_key") => Some("college_roll_number"),
        Some("students_examination_roll_number_key") => Some("examination_roll_number"),
        Some("students_exam_code_key") => Some("exam_code"),
        Some(_) | None => Some("record"),
    }
}

fn map_insert_error(err: sqlx::Error) -> StudentError {
    match duplicate_field(&err) {
        Some(field) => StudentError::Duplicate {
            field: field.to_string(),
        },
        None => StudentError::Database(err.to_string()),
    }
}

/// Repository for student record operations
#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new student. Unique-index violations come back as
    /// field-specific Duplicate errors so the service can decide whether to
    /// retry (generated columns) or report (caller-supplied columns).
    pub async fn create(&self, new: NewStudent) -> Result<Student, StudentError> {
        sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students
                (student_name, email, password_hash, college_roll_number,
                 examination_roll_number, program_type, stream, batch, exam_code, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(&new.student_name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.college_roll_number)
        .bind(&new.examination_roll_number)
        .bind(new.program_type)
        .bind(&new.stream)
        .bind(&new.batch)
        .bind(&new.exam_code)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, StudentError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Student>, StudentError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// All students created by the given admin, oldest first.
    pub async fn find_by_owner(&self, admin_id: Uuid) -> Result<Vec<Student>, StudentError> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE created_by = $1 ORDER BY created_at"
        ))
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// A student scoped to its owning admin. None covers both "does not
    /// exist" and "owned by someone else".
    pub async fn find_owned(
        &self,
        id: Uuid,
        admin_id: Uuid,
    ) -> Result<Option<Student>, StudentError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 AND created_by = $2"
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, StudentError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM students WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    pub async fn college_roll_exists(&self, roll: &str) -> Result<bool, StudentError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM students WHERE college_roll_number = $1)",
        )
        .bind(roll)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    pub async fn exam_code_exists(&self, code: &str) -> Result<bool, StudentError> {
        let exists: Option<bool> =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE exam_code = $1)")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.unwrap_or(false))
    }

    pub async fn exam_roll_exists(&self, roll: &str) -> Result<bool, StudentError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM students WHERE examination_roll_number = $1)",
        )
        .bind(roll)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Partial update scoped to the owning admin, run in a transaction so
    /// the existence check, duplicate check, and write are consistent.
    /// Returns Ok(None) when the record is absent or owned elsewhere.
    pub async fn update_owned(
        &self,
        id: Uuid,
        admin_id: Uuid,
        changes: UpdateStudentRequest,
    ) -> Result<Option<Student>, StudentError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 AND created_by = $2"
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        if let Some(ref new_roll) = changes.college_roll_number {
            if new_roll != &existing.college_roll_number {
                let duplicate: Option<bool> = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM students WHERE college_roll_number = $1 AND id != $2)",
                )
                .bind(new_roll)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

                if duplicate.unwrap_or(false) {
                    return Err(StudentError::Duplicate {
                        field: "college_roll_number".to_string(),
                    });
                }
            }
        }

        let updated = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET student_name = $1,
                college_roll_number = $2,
                program_type = $3,
                stream = $4,
                batch = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(changes.student_name.unwrap_or(existing.student_name))
        .bind(
            changes
                .college_roll_number
                .unwrap_or(existing.college_roll_number),
        )
        .bind(changes.program_type.unwrap_or(existing.program_type))
        .bind(changes.stream.unwrap_or(existing.stream))
        .bind(changes.batch.unwrap_or(existing.batch))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete scoped to the owning admin. Returns false when nothing matched.
    pub async fn delete_owned(&self, id: Uuid, admin_id: Uuid) -> Result<bool, StudentError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_photo_path(
        &self,
        id: Uuid,
        admin_id: Uuid,
        path: &str,
    ) -> Result<Option<Student>, StudentError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET profile_photo_path = $1, updated_at = NOW()
            WHERE id = $2 AND created_by = $3
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(path)
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), StudentError> {
        sqlx::query("UPDATE students SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Replace a student's marks set atomically.
    pub async fn replace_marks(
        &self,
        student_id: Uuid,
        entries: &[MarkEntry],
    ) -> Result<(), StudentError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM marks WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        for entry in entries {
            sqlx::query(
                "INSERT INTO marks (student_id, subject, score, max_score) VALUES ($1, $2, $3, $4)",
            )
            .bind(student_id)
            .bind(&entry.subject)
            .bind(entry.score)
            .bind(entry.max_score)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_marks(&self, student_id: Uuid) -> Result<Vec<Mark>, StudentError> {
        let marks = sqlx::query_as::<_, Mark>(
            "SELECT id, student_id, subject, score, max_score FROM marks \
             WHERE student_id = $1 ORDER BY subject",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(marks)
    }
}
