// Student records module
// Admin-scoped CRUD, generated exam identifiers, marks, and the student panel

pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::StudentError;
pub use models::{
    CreateStudentRequest, ExamCard, Mark, MarkEntry, MarksResponse, ProgramType,
    ReplaceMarksRequest, Student, StudentResponse, UpdateStudentRequest,
};
pub use repository::StudentRepository;
pub use service::StudentService;
