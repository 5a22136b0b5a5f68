pub mod fixtures {
    use crate::models::domain::exam::{Exam, ShowResults};
    use crate::models::domain::question::{
        Alternative, Blank, Difficulty, FillBlankConfig, MatchItem, MatchPair, MatchingConfig,
        Question, QuestionConfig, QuestionType, SingleChoiceConfig,
    };

    /// Single-choice question whose correct alternative has id `"correct"`.
    pub fn single_choice_question(id: &str, weight: f64) -> Question {
        Question {
            id: id.to_string(),
            statement: "Which alternative is correct?".to_string(),
            image_url: None,
            tipo: QuestionType::SingleChoice,
            config: QuestionConfig::SingleChoice(SingleChoiceConfig {
                alternatives: vec![
                    Alternative {
                        id: "correct".to_string(),
                        text: "The right one".to_string(),
                        correct: true,
                    },
                    Alternative {
                        id: "wrong".to_string(),
                        text: "The other one".to_string(),
                        correct: false,
                    },
                ],
            }),
            weight,
            difficulty: Difficulty::Easy,
            explanation: None,
            tags: vec![],
        }
    }

    /// Two-blank fill-in question accepting `"linux"` and `"bash"`.
    pub fn fill_blank_question(id: &str, weight: f64, partial_credit: bool) -> Question {
        Question {
            id: id.to_string(),
            statement: "Fill in the blanks".to_string(),
            image_url: None,
            tipo: QuestionType::FillBlank,
            config: QuestionConfig::FillBlank(FillBlankConfig {
                template: "___ is the kernel, ___ the shell".to_string(),
                blanks: vec![
                    Blank {
                        accepted: vec!["linux".to_string()],
                        hint: None,
                    },
                    Blank {
                        accepted: vec!["bash".to_string()],
                        hint: None,
                    },
                ],
                case_sensitive: false,
                partial_credit,
            }),
            weight,
            difficulty: Difficulty::Medium,
            explanation: None,
            tags: vec![],
        }
    }

    /// Matching question with three correct pairs l1-r1, l2-r2, l3-r3.
    pub fn matching_question(id: &str, weight: f64, partial_credit: bool) -> Question {
        let item = |id: &str, text: &str| MatchItem {
            id: id.to_string(),
            text: text.to_string(),
        };
        let pair = |left: &str, right: &str| MatchPair {
            left_id: left.to_string(),
            right_id: right.to_string(),
        };
        Question {
            id: id.to_string(),
            statement: "Connect each item to its match".to_string(),
            image_url: None,
            tipo: QuestionType::Matching,
            config: QuestionConfig::Matching(MatchingConfig {
                left: vec![item("l1", "cat"), item("l2", "dog"), item("l3", "bird")],
                right: vec![item("r1", "meow"), item("r2", "woof"), item("r3", "tweet")],
                pairs: vec![pair("l1", "r1"), pair("l2", "r2"), pair("l3", "r3")],
                allow_multiple_connections: false,
                partial_credit,
            }),
            weight,
            difficulty: Difficulty::Hard,
            explanation: None,
            tags: vec![],
        }
    }

    /// Immediate-results exam wrapping the given questions.
    pub fn exam(questions: Vec<Question>, min_score: f64) -> Exam {
        Exam {
            id: "prova-1".to_string(),
            title: "Prova de teste".to_string(),
            questions,
            min_score,
            time_limit_minutes: Some(30),
            show_results: ShowResults::Imediato,
            result_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_configs_are_valid() {
        assert!(single_choice_question("q-1", 1.0).config.validate().is_ok());
        assert!(fill_blank_question("q-2", 1.0, true).config.validate().is_ok());
        assert!(matching_question("q-3", 1.0, false).config.validate().is_ok());
    }

    #[test]
    fn test_fixture_tipo_matches_config() {
        let q = matching_question("q-1", 2.0, true);
        assert_eq!(q.config.question_type(), q.tipo);
        assert_eq!(q.weight, 2.0);
    }
}
