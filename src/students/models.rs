use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Degree program a student is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ProgramType {
    Ug,
    Pg,
}

impl ProgramType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramType::Ug => "UG",
            ProgramType::Pg => "PG",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "UG" => Ok(ProgramType::Ug),
            "PG" => Ok(ProgramType::Pg),
            _ => Err(format!("Program type must be either UG or PG, got '{}'", s)),
        }
    }
}

impl std::fmt::Display for ProgramType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Student database model. `exam_code` and `examination_roll_number` are
/// generated at creation and never change afterwards.
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub student_name: String,
    pub email: String,
    pub password_hash: String,
    pub college_roll_number: String,
    pub examination_roll_number: String,
    pub program_type: ProgramType,
    pub stream: String,
    pub batch: String,
    pub exam_code: String,
    pub profile_photo_path: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student response model (excludes password_hash and owner)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: Uuid,
    pub student_name: String,
    #[schema(example = "jane@college.edu")]
    pub email: String,
    #[schema(example = "CR-2024/001")]
    pub college_roll_number: String,
    #[schema(example = "EX-482913")]
    pub examination_roll_number: String,
    pub program_type: ProgramType,
    #[schema(example = "Computer Science")]
    pub stream: String,
    #[schema(example = "2024")]
    pub batch: String,
    #[schema(example = "731058")]
    pub exam_code: String,
    pub profile_photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            student_name: student.student_name,
            email: student.email,
            college_roll_number: student.college_roll_number,
            examination_roll_number: student.examination_roll_number,
            program_type: student.program_type,
            stream: student.stream,
            batch: student.batch,
            exam_code: student.exam_code,
            profile_photo_path: student.profile_photo_path,
            created_at: student.created_at,
        }
    }
}

/// Request DTO for creating a student record
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub student_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(custom = "crate::validation::validate_roll_number")]
    pub college_roll_number: String,
    pub program_type: ProgramType,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub stream: String,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub batch: String,
}

/// Request DTO for partial student updates. Generated identifiers and
/// credentials are deliberately not updatable here.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentRequest {
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub student_name: Option<String>,
    #[validate(custom = "crate::validation::validate_roll_number")]
    pub college_roll_number: Option<String>,
    pub program_type: Option<ProgramType>,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub stream: Option<String>,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub batch: Option<String>,
}

/// A single subject mark row
#[derive(Debug, Clone, FromRow)]
pub struct Mark {
    pub id: i32,
    pub student_id: Uuid,
    pub subject: String,
    pub score: i32,
    pub max_score: i32,
}

/// One subject entry in a marks upload
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct MarkEntry {
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub subject: String,
    #[validate(range(min = 0))]
    pub score: i32,
    #[validate(range(min = 1))]
    pub max_score: i32,
}

/// Request DTO replacing a student's marks set
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceMarksRequest {
    #[validate]
    pub marks: Vec<MarkEntry>,
}

/// Marks as the student sees them
#[derive(Debug, Serialize)]
pub struct MarksResponse {
    pub examination_roll_number: String,
    pub exam_code: String,
    pub marks: Vec<MarkEntry>,
}

/// Exam card derived from the student record
#[derive(Debug, Serialize)]
pub struct ExamCard {
    pub student_name: String,
    pub college_roll_number: String,
    pub examination_roll_number: String,
    pub exam_code: String,
    pub program_type: ProgramType,
    pub stream: String,
    pub batch: String,
    pub profile_photo_path: Option<String>,
}

impl From<Student> for ExamCard {
    fn from(student: Student) -> Self {
        Self {
            student_name: student.student_name,
            college_roll_number: student.college_roll_number,
            examination_roll_number: student.examination_roll_number,
            exam_code: student.exam_code,
            program_type: student.program_type,
            stream: student.stream,
            batch: student.batch,
            profile_photo_path: student.profile_photo_path,
        }
    }
}
