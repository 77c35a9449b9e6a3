// Business logic for student record management

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::PasswordService;
use crate::codegen::{CodeGenError, CodeGenerator};
use crate::students::error::StudentError;
use crate::students::models::{
    CreateStudentRequest, ExamCard, MarkEntry, MarksResponse, Student, StudentResponse,
    UpdateStudentRequest,
};
use crate::students::repository::{NewStudent, StudentRepository};

/// Insert attempts permitted when a generated identifier collides with a
/// row committed after our uniqueness probe.
const INSERT_RETRIES: u32 = 3;

impl From<CodeGenError<StudentError>> for StudentError {
    fn from(err: CodeGenError<StudentError>) -> Self {
        match err {
            CodeGenError::SpaceExhausted { attempts } => {
                StudentError::CodeSpaceExhausted { attempts }
            }
            CodeGenError::Probe(inner) => inner,
        }
    }
}

/// Service for student record operations
#[derive(Clone)]
pub struct StudentService {
    repo: StudentRepository,
    exam_code_gen: CodeGenerator,
    exam_roll_gen: CodeGenerator,
}

impl StudentService {
    pub fn new(
        repo: StudentRepository,
        exam_code_gen: CodeGenerator,
        exam_roll_gen: CodeGenerator,
    ) -> Self {
        Self {
            repo,
            exam_code_gen,
            exam_roll_gen,
        }
    }

    /// Create a student record owned by the calling admin. Exam code and
    /// examination roll number are generated here; insert-time collisions on
    /// those columns trigger a bounded redraw, collisions on caller-supplied
    /// columns are reported as-is.
    pub async fn create_student(
        &self,
        admin_id: Uuid,
        request: CreateStudentRequest,
    ) -> Result<StudentResponse, StudentError> {
        if self.repo.email_exists(&request.email).await? {
            return Err(StudentError::Duplicate {
                field: "email".to_string(),
            });
        }
        if self
            .repo
            .college_roll_exists(&request.college_roll_number)
            .await?
        {
            return Err(StudentError::Duplicate {
                field: "college_roll_number".to_string(),
            });
        }

        let password_hash = PasswordService::hash_password(&request.password)
            .map_err(|e| StudentError::Internal(e.to_string()))?;

        let mut last_err = None;
        for attempt in 0..INSERT_RETRIES {
            let exam_code = self.generate_exam_code().await?;
            let examination_roll_number = self.generate_exam_roll().await?;

            let new = NewStudent {
                student_name: request.student_name.clone(),
                email: request.email.clone(),
                password_hash: password_hash.clone(),
                college_roll_number: request.college_roll_number.clone(),
                examination_roll_number,
                program_type: request.program_type,
                stream: request.stream.clone(),
                batch: request.batch.clone(),
                exam_code,
                created_by: admin_id,
            };

            match self.repo.create(new).await {
                Ok(student) => {
                    info!(
                        "Created student {} with exam code {}",
                        student.id, student.exam_code
                    );
                    return Ok(student.into());
                }
                Err(StudentError::Duplicate { field })
                    if field == "exam_code" || field == "examination_roll_number" =>
                {
                    warn!(
                        "Generated {} collided at insert (attempt {}), redrawing",
                        field,
                        attempt + 1
                    );
                    last_err = Some(StudentError::Duplicate { field });
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_err.unwrap_or(StudentError::CodeSpaceExhausted {
            attempts: INSERT_RETRIES,
        }))
    }

    async fn generate_exam_code(&self) -> Result<String, StudentError> {
        let repo = self.repo.clone();
        let code = self
            .exam_code_gen
            .generate(move |candidate| {
                let repo = repo.clone();
                async move { repo.exam_code_exists(&candidate).await }
            })
            .await?;
        Ok(code)
    }

    async fn generate_exam_roll(&self) -> Result<String, StudentError> {
        let repo = self.repo.clone();
        let roll = self
            .exam_roll_gen
            .generate(move |candidate| {
                let repo = repo.clone();
                async move { repo.exam_roll_exists(&candidate).await }
            })
            .await?;
        Ok(roll)
    }

    pub async fn list_students(
        &self,
        admin_id: Uuid,
    ) -> Result<Vec<StudentResponse>, StudentError> {
        let students = self.repo.find_by_owner(admin_id).await?;
        Ok(students.into_iter().map(StudentResponse::from).collect())
    }

    pub async fn get_student(
        &self,
        id: Uuid,
        admin_id: Uuid,
    ) -> Result<StudentResponse, StudentError> {
        self.repo
            .find_owned(id, admin_id)
            .await?
            .map(StudentResponse::from)
            .ok_or(StudentError::NotFound)
    }

    pub async fn update_student(
        &self,
        id: Uuid,
        admin_id: Uuid,
        changes: UpdateStudentRequest,
    ) -> Result<StudentResponse, StudentError> {
        self.repo
            .update_owned(id, admin_id, changes)
            .await?
            .map(StudentResponse::from)
            .ok_or(StudentError::NotFound)
    }

    pub async fn delete_student(&self, id: Uuid, admin_id: Uuid) -> Result<(), StudentError> {
        if self.repo.delete_owned(id, admin_id).await? {
            info!("Deleted student {}", id);
            Ok(())
        } else {
            Err(StudentError::NotFound)
        }
    }

    pub async fn set_photo(
        &self,
        id: Uuid,
        admin_id: Uuid,
        path: &str,
    ) -> Result<StudentResponse, StudentError> {
        self.repo
            .set_photo_path(id, admin_id, path)
            .await?
            .map(StudentResponse::from)
            .ok_or(StudentError::NotFound)
    }

    pub async fn replace_marks(
        &self,
        id: Uuid,
        admin_id: Uuid,
        entries: Vec<MarkEntry>,
    ) -> Result<(), StudentError> {
        let student = self
            .repo
            .find_owned(id, admin_id)
            .await?
            .ok_or(StudentError::NotFound)?;

        self.repo.replace_marks(student.id, &entries).await
    }

    /// Marks as the logged-in student sees them.
    pub async fn marks_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<MarksResponse, StudentError> {
        let student = self.load_student(student_id).await?;
        let marks = self.repo.find_marks(student_id).await?;

        Ok(MarksResponse {
            examination_roll_number: student.examination_roll_number,
            exam_code: student.exam_code,
            marks: marks
                .into_iter()
                .map(|m| MarkEntry {
                    subject: m.subject,
                    score: m.score,
                    max_score: m.max_score,
                })
                .collect(),
        })
    }

    pub async fn profile(&self, student_id: Uuid) -> Result<StudentResponse, StudentError> {
        Ok(self.load_student(student_id).await?.into())
    }

    pub async fn exam_card(&self, student_id: Uuid) -> Result<ExamCard, StudentError> {
        Ok(self.load_student(student_id).await?.into())
    }

    /// Change the logged-in student's password after verifying the current one.
    pub async fn change_password(
        &self,
        student_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), StudentError> {
        let student = self.load_student(student_id).await?;

        let matches = PasswordService::verify_password(current_password, &student.password_hash)
            .map_err(|e| StudentError::Internal(e.to_string()))?;
        if !matches {
            return Err(StudentError::WrongPassword);
        }

        let new_hash = PasswordService::hash_password(new_password)
            .map_err(|e| StudentError::Internal(e.to_string()))?;
        self.repo.update_password(student_id, &new_hash).await?;

        info!("Password changed for student {}", student_id);
        Ok(())
    }

    async fn load_student(&self, student_id: Uuid) -> Result<Student, StudentError> {
        self.repo
            .find_by_id(student_id)
            .await?
            .ok_or(StudentError::NotFound)
    }
}
