use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::answer::GradeResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum AttemptStatus {
    EmAndamento,
    Finalizada,
}

/// One student's timed run through a prova ("tentativa").
///
/// Created by [`AttemptService::start_attempt`](crate::AttemptService),
/// mutated by answer upserts and by finalize, never deleted — a new retry
/// supersedes it (the retry cap is enforced by the caller).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Attempt {
    pub id: Uuid,
    /// 1-based retry count for this (student, exam).
    pub numero: u32,
    #[serde(rename = "dataInicio")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "dataFim", default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Seconds between start and finalize; 0 while in progress.
    #[serde(rename = "tempoGasto")]
    pub time_spent_secs: i64,
    #[serde(rename = "respostas")]
    pub answers: Vec<AttemptAnswer>,
    #[serde(rename = "totalQuestoes")]
    pub total_questions: usize,
    #[serde(rename = "totalAcertos")]
    pub total_correct: usize,
    /// Weighted aggregate on the 0-100 scale, one decimal place.
    pub nota: f64,
    pub status: AttemptStatus,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttemptAnswer {
    pub question_id: String,
    /// The raw submitted payload, kept as-is so the caller can snapshot or
    /// audit exactly what was graded.
    pub payload: Value,
    #[serde(default)]
    pub flagged_for_review: bool,
    /// Present once the attempt has been finalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GradeResult>,
    /// Set when grading this question failed and the result was downgraded
    /// to incorrect instead of failing the whole finalize.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_error: Option<String>,
}

impl Attempt {
    pub fn is_finalized(&self) -> bool {
        self.status == AttemptStatus::Finalizada
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&AttemptAnswer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }
}
