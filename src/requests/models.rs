use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of an update request. Pending is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// Profile fields a student may ask to have corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum UpdatableField {
    StudentName,
    Email,
    CollegeRollNumber,
    ProgramType,
    Stream,
    Batch,
    ExaminationRollNumber,
}

impl UpdatableField {
    /// The students-table column this field maps to.
    pub fn column(&self) -> &'static str {
        match self {
            UpdatableField::StudentName => "student_name",
            UpdatableField::Email => "email",
            UpdatableField::CollegeRollNumber => "college_roll_number",
            UpdatableField::ProgramType => "program_type",
            UpdatableField::Stream => "stream",
            UpdatableField::Batch => "batch",
            UpdatableField::ExaminationRollNumber => "examination_roll_number",
        }
    }
}

impl std::fmt::Display for UpdatableField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UpdatableField::StudentName => "studentName",
            UpdatableField::Email => "email",
            UpdatableField::CollegeRollNumber => "collegeRollNumber",
            UpdatableField::ProgramType => "programType",
            UpdatableField::Stream => "stream",
            UpdatableField::Batch => "batch",
            UpdatableField::ExaminationRollNumber => "examinationRollNumber",
        };
        write!(f, "{}", s)
    }
}

/// Update request database model
#[derive(Debug, Clone, FromRow)]
pub struct UpdateRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub requested_by: Uuid,
    pub field: UpdatableField,
    pub old_value: String,
    pub new_value: String,
    pub status: RequestStatus,
    pub remarks: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Update request response model
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequestResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub field: UpdatableField,
    pub old_value: String,
    pub new_value: String,
    pub status: RequestStatus,
    pub remarks: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<UpdateRequest> for UpdateRequestResponse {
    fn from(req: UpdateRequest) -> Self {
        Self {
            id: req.id,
            student_id: req.student_id,
            field: req.field,
            old_value: req.old_value,
            new_value: req.new_value,
            status: req.status,
            remarks: req.remarks,
            processed_at: req.processed_at,
            created_at: req.created_at,
        }
    }
}

/// Request DTO for a student filing an update request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUpdateRequest {
    pub field: UpdatableField,
    #[validate(custom = "crate::validation::validate_not_blank")]
    pub new_value: String,
}

/// Request DTO for an admin deciding a pending request
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub status: RequestStatus,
    pub remarks: Option<String>,
}

/// Query parameters for listing update requests
#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    /// Optional status filter
    pub status: Option<RequestStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert!(serde_json::from_str::<RequestStatus>("\"Approved\"").is_err());
    }

    #[test]
    fn field_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&UpdatableField::CollegeRollNumber).unwrap(),
            "\"collegeRollNumber\""
        );
        let parsed: UpdatableField = serde_json::from_str("\"programType\"").unwrap();
        assert_eq!(parsed, UpdatableField::ProgramType);
    }

    #[test]
    fn field_maps_to_expected_columns() {
        assert_eq!(UpdatableField::StudentName.column(), "student_name");
        assert_eq!(
            UpdatableField::ExaminationRollNumber.column(),
            "examination_roll_number"
        );
    }
}
