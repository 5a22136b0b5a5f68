pub mod errors;
pub mod models;
pub mod services;

#[cfg(test)]
pub mod test_utils;

pub use errors::{AttemptError, CoreResult, GradeError};
pub use models::domain::{Attempt, Exam, GradeResult, Question};
pub use services::attempt_service::AttemptService;
pub use services::grader::Grader;
