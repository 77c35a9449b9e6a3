// Update-request workflow module
// Students file field-correction requests; owning admins approve or reject

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod status;

pub use error::RequestError;
pub use models::{
    CreateUpdateRequest, DecideRequest, RequestListQuery, RequestStatus, UpdatableField,
    UpdateRequest, UpdateRequestResponse,
};
pub use repository::RequestRepository;
pub use service::RequestService;
pub use status::StatusMachine;
