use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::errors::{CoreResult, GradeError};
use crate::models::domain::answer::{AnswerPayload, Click, ElementResult, GradeResult};
use crate::models::domain::question::{
    CommandConfig, DragDropConfig, FillBlankConfig, HotspotConfig, MatchPair, MatchingConfig,
    MultiChoiceConfig, OrderingConfig, QuestionConfig, QuestionType, SingleChoiceConfig,
};

/// Slack applied when deciding whether a fractional score counts as fully
/// correct, so partial-credit divisions like 3/3 survive rounding.
pub const SCORE_EPSILON: f64 = 1e-9;

/// The grading engine. Pure and side-effect free: safe to call concurrently
/// from any number of threads.
pub struct Grader;

impl Grader {
    /// Grade a loosely-typed (configuration, answer) pair against the
    /// declared question type.
    ///
    /// Payloads are validated into the strict per-type shapes before any
    /// grading logic runs; the grading algorithms never touch untyped JSON.
    pub fn grade(tipo: QuestionType, config: &Value, answer: &Value) -> CoreResult<GradeResult> {
        let config: QuestionConfig = serde_json::from_value(config.clone()).map_err(|e| {
            GradeError::InvalidConfiguration(format!("malformed configuration payload: {}", e))
        })?;
        if config.question_type() != tipo {
            return Err(GradeError::TypeMismatch {
                expected: tipo,
                found: format!("{:?} configuration", config.question_type()),
            });
        }

        Self::grade_value(&config, answer)
    }

    /// Grade an already-typed configuration against a raw answer payload,
    /// e.g. the stored submission inside an attempt.
    pub fn grade_value(config: &QuestionConfig, answer: &Value) -> CoreResult<GradeResult> {
        let answer: AnswerPayload = serde_json::from_value(answer.clone()).map_err(|_| {
            GradeError::TypeMismatch {
                expected: config.question_type(),
                found: describe_payload(answer),
            }
        })?;
        Self::grade_config(config, &answer)
    }

    /// Typed entry point used by the attempt service once payloads have
    /// already been validated.
    pub fn grade_config(config: &QuestionConfig, answer: &AnswerPayload) -> CoreResult<GradeResult> {
        config.validate()?;

        let result = match (config, answer) {
            (QuestionConfig::SingleChoice(cfg), AnswerPayload::SingleChoice { selected }) => {
                Self::grade_single_choice(cfg, selected)
            }
            (QuestionConfig::MultiChoice(cfg), AnswerPayload::MultiChoice { selected }) => {
                Self::grade_multi_choice(cfg, selected)
            }
            (QuestionConfig::Ordering(cfg), AnswerPayload::Ordering { sequence }) => {
                Self::grade_ordering(cfg, sequence)
            }
            (QuestionConfig::Matching(cfg), AnswerPayload::Matching { pairs }) => {
                Self::grade_matching(cfg, pairs)
            }
            (QuestionConfig::FillBlank(cfg), AnswerPayload::FillBlank { entries }) => {
                Self::grade_fill_blank(cfg, entries)
            }
            (QuestionConfig::Command(cfg), AnswerPayload::Command { command }) => {
                Self::grade_command(cfg, command)
            }
            (QuestionConfig::DragDrop(cfg), AnswerPayload::DragDrop { placements }) => {
                Self::grade_drag_drop(cfg, placements)
            }
            (QuestionConfig::Hotspot(cfg), AnswerPayload::Hotspot { clicks }) => {
                Self::grade_hotspot(cfg, clicks)
            }
            (config, answer) => {
                return Err(GradeError::TypeMismatch {
                    expected: config.question_type(),
                    found: format!("{:?} answer", answer.question_type()),
                })
            }
        };

        Ok(result)
    }

    fn grade_single_choice(cfg: &SingleChoiceConfig, selected: &str) -> GradeResult {
        // validate() guarantees exactly one correct alternative.
        let correct_id = cfg
            .alternatives
            .iter()
            .find(|a| a.correct)
            .map(|a| a.id.as_str())
            .unwrap_or_default();

        let correct = selected == correct_id;
        from_score(
            if correct { 1.0 } else { 0.0 },
            vec![ElementResult {
                element: selected.to_string(),
                correct,
            }],
        )
    }

    fn grade_multi_choice(cfg: &MultiChoiceConfig, selected: &[String]) -> GradeResult {
        let chosen: HashSet<&str> = selected.iter().map(String::as_str).collect();

        // One entry per alternative: correct iff the student's treatment of
        // it (chosen or left alone) matches its flag.
        let detail: Vec<ElementResult> = cfg
            .alternatives
            .iter()
            .map(|alt| ElementResult {
                element: alt.id.clone(),
                correct: chosen.contains(alt.id.as_str()) == alt.correct,
            })
            .collect();

        // Set equality, all-or-nothing. Ids that resolve to no alternative
        // count against the student (the sets cannot be equal).
        let correct_set: HashSet<&str> = cfg
            .alternatives
            .iter()
            .filter(|a| a.correct)
            .map(|a| a.id.as_str())
            .collect();
        let exact = chosen == correct_set;

        from_score(if exact { 1.0 } else { 0.0 }, detail)
    }

    fn grade_ordering(cfg: &OrderingConfig, sequence: &[String]) -> GradeResult {
        // validate() guarantees the positions form a permutation of 1..=n.
        let mut expected: Vec<&str> = vec![""; cfg.items.len()];
        for item in &cfg.items {
            expected[(item.correct_position - 1) as usize] = item.id.as_str();
        }

        let mut matched = 0;
        let detail: Vec<ElementResult> = expected
            .iter()
            .enumerate()
            .map(|(pos, &expected_id)| {
                let correct = sequence.get(pos).is_some_and(|got| got == expected_id);
                if correct {
                    matched += 1;
                }
                ElementResult {
                    element: expected_id.to_string(),
                    correct,
                }
            })
            .collect();

        let total = expected.len();
        let score = if cfg.partial_credit {
            matched as f64 / total as f64
        } else if matched == total && sequence.len() == total {
            1.0
        } else {
            0.0
        };
        from_score(score, detail)
    }

    fn grade_matching(cfg: &MatchingConfig, submitted: &[MatchPair]) -> GradeResult {
        let submitted = normalize_connections(submitted, cfg.allow_multiple_connections);
        let submitted_set: HashSet<&MatchPair> = submitted.iter().copied().collect();
        let correct_set: HashSet<&MatchPair> = cfg.pairs.iter().collect();

        let matched = correct_set.intersection(&submitted_set).count();
        let wrong_submitted = submitted_set.difference(&correct_set).count();
        let total = correct_set.len();

        let mut detail: Vec<ElementResult> = cfg
            .pairs
            .iter()
            .map(|pair| ElementResult {
                element: format!("{}->{}", pair.left_id, pair.right_id),
                correct: submitted_set.contains(pair),
            })
            .collect();
        for pair in submitted_set.difference(&correct_set) {
            detail.push(ElementResult {
                element: format!("{}->{}", pair.left_id, pair.right_id),
                correct: false,
            });
        }

        let score = if cfg.partial_credit {
            // Extra wrong pairs do not subtract; only correct hits count.
            matched as f64 / total as f64
        } else if matched == total && wrong_submitted == 0 {
            1.0
        } else {
            0.0
        };
        from_score(score, detail)
    }

    fn grade_fill_blank(
        cfg: &FillBlankConfig,
        entries: &std::collections::BTreeMap<String, String>,
    ) -> GradeResult {
        let mut matched = 0;
        let detail: Vec<ElementResult> = cfg
            .blanks
            .iter()
            .enumerate()
            .map(|(idx, blank)| {
                let correct = entries.get(&idx.to_string()).is_some_and(|submitted| {
                    let submitted = normalize_text(submitted, true, cfg.case_sensitive);
                    blank
                        .accepted
                        .iter()
                        .any(|a| normalize_text(a, true, cfg.case_sensitive) == submitted)
                });
                if correct {
                    matched += 1;
                }
                ElementResult {
                    element: idx.to_string(),
                    correct,
                }
            })
            .collect();

        let total = cfg.blanks.len();
        let score = if cfg.partial_credit {
            matched as f64 / total as f64
        } else if matched == total {
            1.0
        } else {
            0.0
        };
        from_score(score, detail)
    }

    fn grade_command(cfg: &CommandConfig, command: &str) -> GradeResult {
        let submitted = normalize_text(command, cfg.ignore_extra_whitespace, cfg.case_sensitive);
        let correct = cfg
            .accepted
            .iter()
            .any(|a| normalize_text(a, cfg.ignore_extra_whitespace, cfg.case_sensitive) == submitted);

        from_score(
            if correct { 1.0 } else { 0.0 },
            vec![ElementResult {
                element: command.to_string(),
                correct,
            }],
        )
    }

    fn grade_drag_drop(
        cfg: &DragDropConfig,
        placements: &std::collections::BTreeMap<String, Vec<String>>,
    ) -> GradeResult {
        let mut matched = 0;
        let detail: Vec<ElementResult> = cfg
            .zones
            .iter()
            .map(|zone| {
                let placed: HashSet<&str> = placements
                    .get(&zone.id)
                    .map(|items| items.iter().map(String::as_str).collect())
                    .unwrap_or_default();
                let expected: HashSet<&str> =
                    zone.correct_item_ids.iter().map(String::as_str).collect();

                // Exact set equality per zone; an unknown item id placed here
                // can never be in the expected set, so it makes the zone wrong.
                let correct = placed == expected;
                if correct {
                    matched += 1;
                }
                ElementResult {
                    element: zone.id.clone(),
                    correct,
                }
            })
            .collect();

        // Placements into zone ids that do not exist are ignored: there is
        // no zone to mark wrong, and they must not abort grading.
        let total = cfg.zones.len();
        let score = if cfg.partial_credit {
            matched as f64 / total as f64
        } else if matched == total {
            1.0
        } else {
            0.0
        };
        from_score(score, detail)
    }

    fn grade_hotspot(cfg: &HotspotConfig, clicks: &[Click]) -> GradeResult {
        // Single-click questions keep only the last click, mirroring the
        // replace-not-coexist rule of single-connection matching.
        let clicks: &[Click] = if cfg.allow_multiple_clicks {
            clicks
        } else {
            clicks
                .last()
                .map(std::slice::from_ref)
                .unwrap_or_default()
        };

        let mut hit_areas: HashSet<usize> = HashSet::new();
        let mut bad_click = false;
        for click in clicks {
            // A click in overlapping rectangles resolves to the first
            // containing area in configuration order.
            match cfg.areas.iter().position(|a| contains(a, click)) {
                Some(idx) if cfg.areas[idx].correct => {
                    hit_areas.insert(idx);
                }
                // Resolving to an incorrect area, or to no area at all,
                // spoils the whole answer.
                _ => bad_click = true,
            }
        }

        let mut all_correct_hit = true;
        let detail: Vec<ElementResult> = cfg
            .areas
            .iter()
            .enumerate()
            .map(|(idx, area)| {
                let correct = if area.correct {
                    hit_areas.contains(&idx)
                } else {
                    true
                };
                if area.correct && !correct {
                    all_correct_hit = false;
                }
                ElementResult {
                    element: idx.to_string(),
                    correct,
                }
            })
            .collect();

        let solved = all_correct_hit && !bad_click && !clicks.is_empty();
        from_score(if solved { 1.0 } else { 0.0 }, detail)
    }
}

fn from_score(score: f64, detail: Vec<ElementResult>) -> GradeResult {
    GradeResult {
        correct: score >= 1.0 - SCORE_EPSILON,
        score,
        detail,
    }
}

/// Fixed normalization order: trim and collapse whitespace first (when
/// enabled), then case-fold (when case-insensitive).
fn normalize_text(s: &str, normalize_whitespace: bool, case_sensitive: bool) -> String {
    let s = if normalize_whitespace {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        s.to_string()
    };
    if case_sensitive {
        s
    } else {
        s.to_lowercase()
    }
}

/// When multiple connections are disallowed, a later pair from the same left
/// item replaces the earlier one instead of coexisting with it.
fn normalize_connections(pairs: &[MatchPair], allow_multiple: bool) -> Vec<&MatchPair> {
    if allow_multiple {
        return pairs.iter().collect();
    }
    let mut last_for_left: HashMap<&str, usize> = HashMap::new();
    for (idx, pair) in pairs.iter().enumerate() {
        last_for_left.insert(pair.left_id.as_str(), idx);
    }
    pairs
        .iter()
        .enumerate()
        .filter(|(idx, pair)| last_for_left[pair.left_id.as_str()] == *idx)
        .map(|(_, pair)| pair)
        .collect()
}

fn contains(area: &crate::models::domain::question::HotspotArea, click: &Click) -> bool {
    click.x >= area.x
        && click.x <= area.x + area.width
        && click.y >= area.y
        && click.y <= area.y + area.height
}

fn describe_payload(value: &Value) -> String {
    match value.get("tipo").and_then(|v| v.as_str()) {
        Some(tag) => format!("{} answer", tag),
        None => "untagged answer payload".to_string(),
    }
}
