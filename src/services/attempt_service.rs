use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{AttemptError, GradeError};
use crate::models::domain::answer::GradeResult;
use crate::models::domain::attempt::{Attempt, AttemptAnswer, AttemptStatus};
use crate::models::domain::question::Question;
use crate::services::grader::Grader;

/// Drives an attempt through its lifecycle: start, repeated answer upserts,
/// finalize. Holds no state of its own; the caller owns the [`Attempt`]
/// aggregate and must serialize concurrent mutations per attempt id.
pub struct AttemptService;

impl AttemptService {
    /// Start a new retry. `previous_attempt_count` is the number of earlier
    /// attempts for this (student, exam); the retry cap is enforced by the
    /// caller before this is invoked.
    pub fn start_attempt(previous_attempt_count: u32, now: DateTime<Utc>) -> Attempt {
        Attempt {
            id: Uuid::new_v4(),
            numero: previous_attempt_count + 1,
            started_at: now,
            finished_at: None,
            time_spent_secs: 0,
            answers: Vec::new(),
            total_questions: 0,
            total_correct: 0,
            nota: 0.0,
            status: AttemptStatus::EmAndamento,
        }
    }

    /// Record or replace the answer for one question. Idempotent per
    /// question: the last write wins. The review flag travels with the
    /// write but is independent of the payload content.
    pub fn upsert_answer(
        attempt: &mut Attempt,
        question_id: &str,
        payload: Value,
        flagged_for_review: bool,
    ) -> Result<(), AttemptError> {
        if attempt.is_finalized() {
            return Err(AttemptError::AlreadyFinalized);
        }

        match attempt
            .answers
            .iter_mut()
            .find(|a| a.question_id == question_id)
        {
            Some(existing) => {
                existing.payload = payload;
                existing.flagged_for_review = flagged_for_review;
                existing.result = None;
                existing.grading_error = None;
            }
            None => attempt.answers.push(AttemptAnswer {
                question_id: question_id.to_string(),
                payload,
                flagged_for_review,
                result: None,
                grading_error: None,
            }),
        }
        Ok(())
    }

    /// Toggle the flagged-for-review bit without touching the answer.
    /// Flagging a question the student has not answered yet records an
    /// empty placeholder so the flag survives until an answer arrives.
    pub fn set_flagged(
        attempt: &mut Attempt,
        question_id: &str,
        flagged: bool,
    ) -> Result<(), AttemptError> {
        if attempt.is_finalized() {
            return Err(AttemptError::AlreadyFinalized);
        }

        match attempt
            .answers
            .iter_mut()
            .find(|a| a.question_id == question_id)
        {
            Some(existing) => existing.flagged_for_review = flagged,
            None => attempt.answers.push(AttemptAnswer {
                question_id: question_id.to_string(),
                payload: Value::Null,
                flagged_for_review: flagged,
                result: None,
                grading_error: None,
            }),
        }
        Ok(())
    }

    /// Grade every question and close the attempt.
    ///
    /// Each question is graded independently: a missing answer scores 0, and
    /// a question whose grading errors (malformed configuration, mismatched
    /// payload) is downgraded to 0 with the reason recorded on its answer —
    /// one bad question must never block the student from finishing. The
    /// aggregate nota is the weighted mean of per-question scores on the
    /// 0-100 scale, rounded to one decimal place.
    pub fn finalize(
        attempt: &mut Attempt,
        questions: &[Question],
        now: DateTime<Utc>,
    ) -> Result<(), AttemptError> {
        if attempt.is_finalized() {
            return Err(AttemptError::AlreadyFinalized);
        }

        let mut weighted_score = 0.0;
        let mut total_weight = 0.0;
        let mut total_correct = 0;

        for question in questions {
            let idx = attempt
                .answers
                .iter()
                .position(|a| a.question_id == question.id);
            let has_payload = idx.is_some_and(|i| !attempt.answers[i].payload.is_null());

            let (result, error) = if has_payload {
                let payload = &attempt.answers[idx.unwrap()].payload;
                match grade_question(question, payload) {
                    Ok(result) => (result, None),
                    Err(err) => {
                        log::warn!(
                            "grading question {} in attempt {} failed, downgrading to incorrect: {}",
                            question.id,
                            attempt.id,
                            err
                        );
                        (GradeResult::unanswered(), Some(err.to_string()))
                    }
                }
            } else {
                (GradeResult::unanswered(), None)
            };

            let weight = match validate_weight(question) {
                Ok(w) => w,
                Err(err) => {
                    log::warn!(
                        "question {} has invalid weight, excluding from aggregate: {}",
                        question.id,
                        err
                    );
                    0.0
                }
            };

            if result.correct {
                total_correct += 1;
            }
            weighted_score += weight * result.score;
            total_weight += weight;

            match idx {
                Some(idx) => {
                    attempt.answers[idx].result = Some(result);
                    attempt.answers[idx].grading_error = error;
                }
                None => attempt.answers.push(AttemptAnswer {
                    question_id: question.id.clone(),
                    payload: Value::Null,
                    flagged_for_review: false,
                    result: Some(result),
                    grading_error: error,
                }),
            }
        }

        attempt.total_questions = questions.len();
        attempt.total_correct = total_correct;
        attempt.nota = if total_weight > 0.0 {
            round_one_decimal(100.0 * weighted_score / total_weight)
        } else {
            0.0
        };
        attempt.finished_at = Some(now);
        attempt.time_spent_secs = (now - attempt.started_at).num_seconds().max(0);
        attempt.status = AttemptStatus::Finalizada;
        Ok(())
    }

    /// Pure time-limit predicate: expired iff at least `tempo_limite` whole
    /// minutes have elapsed since the attempt started. Monotonic in `now`.
    pub fn is_expired(
        attempt: &Attempt,
        tempo_limite_minutos: Option<u32>,
        now: DateTime<Utc>,
    ) -> bool {
        match tempo_limite_minutos {
            Some(limit) => {
                let elapsed = (now - attempt.started_at).num_seconds();
                elapsed >= i64::from(limit) * 60
            }
            None => false,
        }
    }
}

fn grade_question(question: &Question, payload: &Value) -> Result<GradeResult, GradeError> {
    if question.config.question_type() != question.tipo {
        return Err(GradeError::TypeMismatch {
            expected: question.tipo,
            found: format!("{:?} configuration", question.config.question_type()),
        });
    }
    Grader::grade_value(&question.config, payload)
}

fn validate_weight(question: &Question) -> Result<f64, GradeError> {
    if question.weight > 0.0 && question.weight.is_finite() {
        Ok(question.weight)
    } else {
        Err(GradeError::InvalidConfiguration(format!(
            "weight must be positive, got {}",
            question.weight
        )))
    }
}

fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
