pub mod answer;
pub mod attempt;
pub mod exam;
pub mod question;

pub use answer::{AnswerPayload, ElementResult, GradeResult};
pub use attempt::{Attempt, AttemptAnswer, AttemptStatus};
pub use exam::{Exam, ShowResults};
pub use question::{Question, QuestionConfig, QuestionType};
