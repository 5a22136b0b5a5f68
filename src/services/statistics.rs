use std::collections::HashMap;

use crate::models::domain::attempt::Attempt;

/// Per-question difficulty signal derived from finalized attempts.
/// Consumed by the reporting layer; the fold itself lives here so reporting
/// never re-implements the correctness rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuestionStats {
    pub responses: u64,
    pub incorrect: u64,
}

impl QuestionStats {
    /// Fraction of responses graded incorrect, or None for a question that
    /// was never answered — never a fabricated 0% or 100%.
    pub fn error_rate(&self) -> Option<f64> {
        if self.responses == 0 {
            None
        } else {
            Some(self.incorrect as f64 / self.responses as f64)
        }
    }
}

/// Fold a stream of finalized attempts into per-question stats. Attempts
/// still in progress are skipped; answers without a grade result (which a
/// finalized attempt should not have) are skipped too.
pub fn project<'a, I>(attempts: I) -> HashMap<String, QuestionStats>
where
    I: IntoIterator<Item = &'a Attempt>,
{
    let mut stats: HashMap<String, QuestionStats> = HashMap::new();
    for attempt in attempts {
        if !attempt.is_finalized() {
            continue;
        }
        for answer in &attempt.answers {
            let Some(result) = &answer.result else {
                continue;
            };
            let entry = stats.entry(answer.question_id.clone()).or_default();
            entry.responses += 1;
            if !result.correct {
                entry.incorrect += 1;
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;
    use crate::models::domain::answer::GradeResult;
    use crate::models::domain::attempt::{AttemptAnswer, AttemptStatus};

    fn finalized_attempt(results: &[(&str, bool)]) -> Attempt {
        Attempt {
            id: Uuid::new_v4(),
            numero: 1,
            started_at: Utc::now(),
            finished_at: Some(Utc::now()),
            time_spent_secs: 60,
            answers: results
                .iter()
                .map(|(question_id, correct)| AttemptAnswer {
                    question_id: question_id.to_string(),
                    payload: Value::Null,
                    flagged_for_review: false,
                    result: Some(GradeResult {
                        correct: *correct,
                        score: if *correct { 1.0 } else { 0.0 },
                        detail: vec![],
                    }),
                    grading_error: None,
                })
                .collect(),
            total_questions: results.len(),
            total_correct: results.iter().filter(|(_, c)| *c).count(),
            nota: 0.0,
            status: AttemptStatus::Finalizada,
        }
    }

    #[test]
    fn project_counts_responses_and_errors_per_question() {
        let attempts = vec![
            finalized_attempt(&[("q-1", true), ("q-2", false)]),
            finalized_attempt(&[("q-1", false), ("q-2", false)]),
        ];

        let stats = project(&attempts);

        assert_eq!(stats["q-1"].responses, 2);
        assert_eq!(stats["q-1"].incorrect, 1);
        assert_eq!(stats["q-1"].error_rate(), Some(0.5));
        assert_eq!(stats["q-2"].error_rate(), Some(1.0));
    }

    #[test]
    fn project_skips_in_progress_attempts() {
        let mut in_progress = finalized_attempt(&[("q-1", true)]);
        in_progress.status = AttemptStatus::EmAndamento;

        let stats = project(std::iter::once(&in_progress));
        assert!(stats.is_empty());
    }

    #[test]
    fn unanswered_question_reports_no_error_rate() {
        let stats = QuestionStats::default();
        assert_eq!(stats.error_rate(), None);
    }
}
