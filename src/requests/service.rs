// Business logic for the update-request workflow

use tracing::info;
use uuid::Uuid;

use crate::requests::error::RequestError;
use crate::requests::models::{
    RequestStatus, UpdatableField, UpdateRequestResponse,
};
use crate::requests::repository::RequestRepository;
use crate::requests::status::StatusMachine;
use crate::students::{ProgramType, Student, StudentRepository};

/// Service for update-request operations
#[derive(Clone)]
pub struct RequestService {
    repo: RequestRepository,
    student_repo: StudentRepository,
}

impl RequestService {
    pub fn new(repo: RequestRepository, student_repo: StudentRepository) -> Self {
        Self { repo, student_repo }
    }

    /// File an update request for the logged-in student. The current field
    /// value is snapshotted as old_value; a field with no current value
    /// cannot be requested.
    pub async fn create_request(
        &self,
        student_id: Uuid,
        field: UpdatableField,
        new_value: &str,
    ) -> Result<UpdateRequestResponse, RequestError> {
        let student = self
            .student_repo
            .find_by_id(student_id)
            .await
            .map_err(|e| RequestError::Database(e.to_string()))?
            .ok_or(RequestError::NotFound)?;

        let old_value = current_field_value(&student, field);
        if old_value.is_empty() {
            return Err(RequestError::EmptyField);
        }

        if field == UpdatableField::ProgramType {
            ProgramType::parse(new_value).map_err(RequestError::Validation)?;
        }

        let request = self
            .repo
            .create(student_id, field, &old_value, new_value)
            .await?;

        info!("Student {} filed update request {}", student_id, request.id);
        Ok(request.into())
    }

    /// The logged-in student's request history.
    pub async fn history(
        &self,
        student_id: Uuid,
        status: Option<RequestStatus>,
    ) -> Result<Vec<UpdateRequestResponse>, RequestError> {
        let requests = self.repo.find_by_student(student_id, status).await?;
        Ok(requests.into_iter().map(Into::into).collect())
    }

    /// Requests filed against students the calling admin owns.
    pub async fn list_for_admin(
        &self,
        admin_id: Uuid,
        status: Option<RequestStatus>,
    ) -> Result<Vec<UpdateRequestResponse>, RequestError> {
        let requests = self.repo.find_for_admin(admin_id, status).await?;
        Ok(requests.into_iter().map(Into::into).collect())
    }

    /// Approve or reject a pending request. Approval applies the requested
    /// field change to the student record atomically.
    pub async fn decide(
        &self,
        id: Uuid,
        admin_id: Uuid,
        target: RequestStatus,
        remarks: Option<&str>,
    ) -> Result<UpdateRequestResponse, RequestError> {
        if target == RequestStatus::Pending {
            return Err(RequestError::InvalidTransition(
                "Status must be either approved or rejected".to_string(),
            ));
        }

        let existing = self
            .repo
            .find_owned(id, admin_id)
            .await?
            .ok_or(RequestError::NotFound)?;

        StatusMachine::transition(existing.status, target)
            .map_err(RequestError::InvalidTransition)?;

        let decided = self
            .repo
            .decide(id, admin_id, target, remarks)
            .await?
            // Raced with another decision between the fetch and the update.
            .ok_or_else(|| {
                RequestError::InvalidTransition(
                    "Update request has already been processed".to_string(),
                )
            })?;

        info!(
            "Update request {} {} by admin {}",
            decided.id, decided.status, admin_id
        );
        Ok(decided.into())
    }
}

fn current_field_value(student: &Student, field: UpdatableField) -> String {
    match field {
        UpdatableField::StudentName => student.student_name.clone(),
        UpdatableField::Email => student.email.clone(),
        UpdatableField::CollegeRollNumber => student.college_roll_number.clone(),
        UpdatableField::ProgramType => student.program_type.to_string(),
        UpdatableField::Stream => student.stream.clone(),
        UpdatableField::Batch => student.batch.clone(),
        UpdatableField::ExaminationRollNumber => student.examination_roll_number.clone(),
    }
}
