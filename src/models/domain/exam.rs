use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::Question;

/// When graded results (including the answer key) become visible to the
/// student.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ShowResults {
    Imediato,
    PorData,
}

/// An exam instance ("prova"): an ordered list of questions with its own
/// pass threshold, time limit and result-disclosure policy.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Exam {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "questoes")]
    pub questions: Vec<Question>,
    /// Passing threshold on the 0-100 scale.
    #[serde(rename = "notaMinima")]
    pub min_score: f64,
    /// Minutes, or None for untimed exams.
    #[serde(rename = "tempoLimite", default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    #[serde(rename = "mostrarResultado")]
    pub show_results: ShowResults,
    /// Required iff `show_results` is `PorData`; enforced by the authoring
    /// layer, not here.
    #[serde(rename = "dataResultado", default, skip_serializing_if = "Option::is_none")]
    pub result_date: Option<DateTime<Utc>>,
}

impl Exam {
    /// Whether a finalized attempt's nota meets the passing threshold.
    pub fn is_passing(&self, nota: f64) -> bool {
        nota >= self.min_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_results_serializes_with_portuguese_names() {
        assert_eq!(
            serde_json::to_string(&ShowResults::Imediato).unwrap(),
            "\"Imediato\""
        );
        assert_eq!(
            serde_json::to_string(&ShowResults::PorData).unwrap(),
            "\"PorData\""
        );
    }

    #[test]
    fn passing_threshold_is_inclusive() {
        let exam = Exam {
            id: "p-1".to_string(),
            title: "Prova 1".to_string(),
            questions: vec![],
            min_score: 70.0,
            time_limit_minutes: None,
            show_results: ShowResults::Imediato,
            result_date: None,
        };

        assert!(exam.is_passing(70.0));
        assert!(exam.is_passing(75.0));
        assert!(!exam.is_passing(69.9));
    }
}
