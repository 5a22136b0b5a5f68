use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::question::{MatchPair, QuestionType};

/// What a respondent submitted for one question. Variants mirror
/// [`QuestionConfig`](super::question::QuestionConfig) and share its `tipo`
/// tag values, so a stored payload can be checked against the declared type.
///
/// Id references inside a payload are opaque strings; ids that do not resolve
/// against the configuration simply never match anything and degrade the
/// affected sub-element to incorrect. They are never a grading error.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum AnswerPayload {
    SingleChoice {
        selected: String,
    },
    MultiChoice {
        selected: Vec<String>,
    },
    DragDrop {
        /// Zone id -> item ids placed in that zone.
        placements: BTreeMap<String, Vec<String>>,
    },
    Matching {
        pairs: Vec<MatchPair>,
    },
    Ordering {
        sequence: Vec<String>,
    },
    FillBlank {
        /// Blank index (a JSON object key, so a stringified number) ->
        /// submitted string. Keys that are not valid indices resolve to no
        /// blank and are ignored.
        entries: BTreeMap<String, String>,
    },
    Hotspot {
        clicks: Vec<Click>,
    },
    Command {
        command: String,
    },
}

/// A tap/click on the hotspot image, in percentage coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Click {
    pub x: f64,
    pub y: f64,
}

impl AnswerPayload {
    pub fn question_type(&self) -> QuestionType {
        match self {
            AnswerPayload::SingleChoice { .. } => QuestionType::SingleChoice,
            AnswerPayload::MultiChoice { .. } => QuestionType::MultiChoice,
            AnswerPayload::DragDrop { .. } => QuestionType::DragDrop,
            AnswerPayload::Matching { .. } => QuestionType::Matching,
            AnswerPayload::Ordering { .. } => QuestionType::Ordering,
            AnswerPayload::FillBlank { .. } => QuestionType::FillBlank,
            AnswerPayload::Hotspot { .. } => QuestionType::Hotspot,
            AnswerPayload::Command { .. } => QuestionType::Command,
        }
    }
}

/// Outcome of grading one question.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GradeResult {
    /// True iff `score` is exactly 1.0 (within epsilon).
    pub correct: bool,
    /// Fraction in [0, 1].
    pub score: f64,
    /// One entry per scorable sub-element (alternative, position, pair,
    /// blank, zone, area, or the single compared string).
    pub detail: Vec<ElementResult>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ElementResult {
    /// Identifies the sub-element: an alternative/zone id, a 0-based
    /// position or blank index, or an area index.
    pub element: String,
    pub correct: bool,
}

impl GradeResult {
    /// Result for a question that was never answered: zero score, no detail.
    pub fn unanswered() -> Self {
        GradeResult {
            correct: false,
            score: 0.0,
            detail: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_payload_round_trip_preserves_tag() {
        let payload = AnswerPayload::FillBlank {
            entries: BTreeMap::from([
                ("0".to_string(), "linux".to_string()),
                ("1".to_string(), "kernel".to_string()),
            ]),
        };

        let json = serde_json::to_string(&payload).expect("payload should serialize");
        let parsed: AnswerPayload = serde_json::from_str(&json).expect("payload should deserialize");

        assert_eq!(payload, parsed);
        assert_eq!(parsed.question_type(), QuestionType::FillBlank);
    }

    #[test]
    fn answer_payload_rejects_unknown_tag() {
        let invalid = r#"{"tipo": "essay", "text": "free form"}"#;
        assert!(serde_json::from_str::<AnswerPayload>(invalid).is_err());
    }

    #[test]
    fn fill_blank_entries_keep_json_object_keys() {
        let json = r#"{"tipo": "fill_blank", "entries": {"0": "a", "2": "b"}}"#;
        let parsed: AnswerPayload = serde_json::from_str(json).expect("should deserialize");

        match parsed {
            AnswerPayload::FillBlank { entries } => {
                assert_eq!(entries.get("0").map(String::as_str), Some("a"));
                assert_eq!(entries.get("2").map(String::as_str), Some("b"));
                assert!(!entries.contains_key("1"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn unanswered_result_is_incorrect_with_zero_score() {
        let result = GradeResult::unanswered();
        assert!(!result.correct);
        assert_eq!(result.score, 0.0);
        assert!(result.detail.is_empty());
    }
}
