use thiserror::Error;

use crate::models::domain::question::QuestionType;

/// Errors produced by the grading engine itself.
///
/// Both variants indicate a problem with the inputs, not with the student's
/// answer: a wrong answer is a regular [`GradeResult`](crate::GradeResult)
/// with `correct = false`, never an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GradeError {
    /// The configuration or answer payload does not belong to the declared
    /// question type. This is a caller bug and is fatal to the single
    /// grading call.
    #[error("Type mismatch: question is {expected:?} but payload is {found}")]
    TypeMismatch { expected: QuestionType, found: String },

    /// The authored configuration violates an invariant (e.g. duplicate
    /// ordering positions, a blank with no accepted strings). Caught
    /// defensively at grading time since configurations are long-lived data.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors produced by the attempt state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// The attempt is Finalizada; it accepts no further mutation.
    #[error("Attempt is already finalized")]
    AlreadyFinalized,
}

pub type CoreResult<T> = Result<T, GradeError>;
