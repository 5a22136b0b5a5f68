use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{CoreResult, GradeError};

/// Closed enumeration of the eight supported question types. The grading
/// engine matches exhaustively on this enum, so adding a ninth type is a
/// compile-time requirement everywhere it is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultiChoice,
    DragDrop,
    Matching,
    Ordering,
    FillBlank,
    Hotspot,
    Command,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub enum Difficulty {
    #[serde(rename = "facil")]
    Easy,
    #[default]
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "dificil")]
    Hard,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Question {
    pub id: String,
    /// Rich text, opaque to the grading engine.
    #[serde(rename = "enunciado")]
    pub statement: String,
    #[serde(rename = "imagemUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub tipo: QuestionType,
    #[serde(rename = "configuracao")]
    pub config: QuestionConfig,
    /// Positive weight used in the attempt's weighted average.
    #[serde(rename = "peso", default = "default_weight")]
    pub weight: f64,
    #[serde(rename = "dificuldade", default)]
    pub difficulty: Difficulty,
    #[serde(rename = "explicacao", default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_weight() -> f64 {
    1.0
}

/// Authoritative per-type configuration. The `tipo` tag values coincide with
/// [`QuestionType`]'s serialized names so a stored payload can be checked
/// against the question's declared type.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum QuestionConfig {
    SingleChoice(SingleChoiceConfig),
    MultiChoice(MultiChoiceConfig),
    DragDrop(DragDropConfig),
    Matching(MatchingConfig),
    Ordering(OrderingConfig),
    FillBlank(FillBlankConfig),
    Hotspot(HotspotConfig),
    Command(CommandConfig),
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub id: String,
    #[serde(rename = "texto")]
    pub text: String,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SingleChoiceConfig {
    #[serde(rename = "alternativas")]
    pub alternatives: Vec<Alternative>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultiChoiceConfig {
    #[serde(rename = "alternativas")]
    pub alternatives: Vec<Alternative>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderingItem {
    pub id: String,
    #[serde(rename = "texto")]
    pub text: String,
    /// 1-based position this item belongs at in the correct sequence.
    #[serde(rename = "ordemCorreta")]
    pub correct_position: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderingConfig {
    #[serde(rename = "itens")]
    pub items: Vec<OrderingItem>,
    #[serde(default)]
    pub partial_credit: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchItem {
    pub id: String,
    #[serde(rename = "texto")]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub left_id: String,
    pub right_id: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchingConfig {
    pub left: Vec<MatchItem>,
    pub right: Vec<MatchItem>,
    /// The correct (left, right) connections.
    pub pairs: Vec<MatchPair>,
    #[serde(default)]
    pub allow_multiple_connections: bool,
    #[serde(default)]
    pub partial_credit: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Blank {
    /// Strings accepted as a correct fill for this blank.
    #[serde(rename = "aceitas")]
    pub accepted: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankConfig {
    /// Template text containing the ordered blank markers.
    pub template: String,
    pub blanks: Vec<Blank>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub partial_credit: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommandConfig {
    pub prompt: String,
    #[serde(rename = "cenario", default)]
    pub scenario: String,
    /// Exact command strings accepted as correct (after normalization).
    #[serde(rename = "aceitos")]
    pub accepted: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub ignore_extra_whitespace: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DragItem {
    pub id: String,
    #[serde(rename = "texto")]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DropZone {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub accepts_multiple: bool,
    pub correct_item_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DragDropConfig {
    #[serde(rename = "itens")]
    pub items: Vec<DragItem>,
    pub zones: Vec<DropZone>,
    #[serde(default)]
    pub partial_credit: bool,
}

/// Rectangle in percentage coordinates relative to the image.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotspotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotspotConfig {
    #[serde(rename = "imagemUrl")]
    pub image_url: String,
    /// Overlaps are resolved in favor of the earlier area in this list.
    pub areas: Vec<HotspotArea>,
    #[serde(default)]
    pub allow_multiple_clicks: bool,
}

impl QuestionConfig {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionConfig::SingleChoice(_) => QuestionType::SingleChoice,
            QuestionConfig::MultiChoice(_) => QuestionType::MultiChoice,
            QuestionConfig::DragDrop(_) => QuestionType::DragDrop,
            QuestionConfig::Matching(_) => QuestionType::Matching,
            QuestionConfig::Ordering(_) => QuestionType::Ordering,
            QuestionConfig::FillBlank(_) => QuestionType::FillBlank,
            QuestionConfig::Hotspot(_) => QuestionType::Hotspot,
            QuestionConfig::Command(_) => QuestionType::Command,
        }
    }

    /// Re-checks the authoring invariants. Run defensively before every
    /// grading call since configurations are long-lived data that may have
    /// been authored before the current rules existed.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            QuestionConfig::SingleChoice(cfg) => {
                let correct = cfg.alternatives.iter().filter(|a| a.correct).count();
                if correct != 1 {
                    return Err(GradeError::InvalidConfiguration(format!(
                        "single choice question must have exactly 1 correct alternative, found {}",
                        correct
                    )));
                }
            }
            QuestionConfig::MultiChoice(cfg) => {
                if cfg.alternatives.is_empty() {
                    return Err(GradeError::InvalidConfiguration(
                        "multi choice question has no alternatives".to_string(),
                    ));
                }
            }
            QuestionConfig::Ordering(cfg) => {
                if cfg.items.is_empty() {
                    return Err(GradeError::InvalidConfiguration(
                        "ordering question has no items".to_string(),
                    ));
                }
                // Correct positions must form a permutation of 1..=n.
                let n = cfg.items.len() as u32;
                let mut seen = vec![false; cfg.items.len()];
                for item in &cfg.items {
                    if item.correct_position < 1 || item.correct_position > n {
                        return Err(GradeError::InvalidConfiguration(format!(
                            "ordering position {} out of range 1..={}",
                            item.correct_position, n
                        )));
                    }
                    let idx = (item.correct_position - 1) as usize;
                    if seen[idx] {
                        return Err(GradeError::InvalidConfiguration(format!(
                            "duplicate ordering position {}",
                            item.correct_position
                        )));
                    }
                    seen[idx] = true;
                }
            }
            QuestionConfig::Matching(cfg) => {
                if cfg.pairs.is_empty() {
                    return Err(GradeError::InvalidConfiguration(
                        "matching question has no correct pairs".to_string(),
                    ));
                }
            }
            QuestionConfig::FillBlank(cfg) => {
                if cfg.blanks.is_empty() {
                    return Err(GradeError::InvalidConfiguration(
                        "fill-blank question has no blanks".to_string(),
                    ));
                }
                for (i, blank) in cfg.blanks.iter().enumerate() {
                    if blank.accepted.is_empty() {
                        return Err(GradeError::InvalidConfiguration(format!(
                            "blank {} has no accepted strings",
                            i
                        )));
                    }
                }
            }
            QuestionConfig::Command(cfg) => {
                if cfg.accepted.is_empty() {
                    return Err(GradeError::InvalidConfiguration(
                        "command question has no accepted commands".to_string(),
                    ));
                }
            }
            QuestionConfig::DragDrop(cfg) => {
                if cfg.zones.is_empty() {
                    return Err(GradeError::InvalidConfiguration(
                        "drag-drop question has no zones".to_string(),
                    ));
                }
            }
            QuestionConfig::Hotspot(cfg) => {
                if !cfg.areas.iter().any(|a| a.correct) {
                    return Err(GradeError::InvalidConfiguration(
                        "hotspot question has no correct area".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}
