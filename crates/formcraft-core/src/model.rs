//! Form and question data model.
//!
//! These are the authoritative shapes a form author produces: a form is
//! an ordered list of questions, each one of three typed exercises with
//! an embedded answer key. Field names stay camelCase on the wire so
//! documents produced by the original backend load unchanged.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An ordered collection of questions plus metadata, authored once and
/// referenced by many responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Identifier assigned by the form store.
    #[serde(default)]
    pub id: String,
    /// Display title.
    pub title: String,
    /// Optional header image URL.
    #[serde(default)]
    pub header_image: Option<String>,
    /// The questions, ordered; responses reference them by index.
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One question within a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Display text shown above the exercise.
    #[serde(default)]
    pub title: String,
    /// Optional per-question image URL.
    #[serde(default)]
    pub header_image: Option<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// The three question archetypes, discriminated by the `type` tag.
///
/// Forms are stored as loosely validated documents, so an unrecognized
/// type string must stay representable: it decodes to [`QuestionKind::Unknown`]
/// and fails later, at grading time, for the whole submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    #[serde(rename = "categorize")]
    Categorize(CategorizeQuestion),
    #[serde(rename = "cloze")]
    Cloze(ClozeQuestion),
    #[serde(rename = "comprehension")]
    Comprehension(ComprehensionQuestion),
    #[serde(other)]
    Unknown,
}

impl QuestionKind {
    /// The wire-level type string.
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::Categorize(_) => "categorize",
            QuestionKind::Cloze(_) => "cloze",
            QuestionKind::Comprehension(_) => "comprehension",
            QuestionKind::Unknown => "unknown",
        }
    }

    /// The form's intrinsic maximum for this question, independent of
    /// any submission. `None` for unrecognized kinds.
    pub fn max_points(&self) -> Option<f64> {
        match self {
            QuestionKind::Categorize(q) => Some(q.max_points()),
            QuestionKind::Cloze(q) => Some(q.max_points()),
            QuestionKind::Comprehension(q) => Some(q.max_points()),
            QuestionKind::Unknown => None,
        }
    }
}

/// Recognized question type tags, as recorded on graded answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Categorize,
    Cloze,
    Comprehension,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Categorize => write!(f, "categorize"),
            QuestionType::Cloze => write!(f, "cloze"),
            QuestionType::Comprehension => write!(f, "comprehension"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "categorize" => Ok(QuestionType::Categorize),
            "cloze" => Ok(QuestionType::Cloze),
            "comprehension" => Ok(QuestionType::Comprehension),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Categorize
// ---------------------------------------------------------------------------

/// A category-sorting exercise: respondents drag items into categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeQuestion {
    /// Categories, ordered; names are expected to be unique within the
    /// question.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Items to sort, each carrying its answer-key category.
    #[serde(default)]
    pub items: Vec<CategoryItem>,
}

/// One target category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    /// Points awarded per correctly placed item belonging here.
    #[serde(default = "default_points")]
    pub points: f64,
}

/// One sortable item and the category it belongs to.
///
/// `belongs_to` may name a category that does not exist; grading
/// tolerates the dangling reference and simply scores the item incorrect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryItem {
    pub text: String,
    pub belongs_to: String,
}

impl CategorizeQuestion {
    /// Sum over categories of owned-item count times category points.
    pub fn max_points(&self) -> f64 {
        self.categories
            .iter()
            .map(|cat| {
                let owned = self
                    .items
                    .iter()
                    .filter(|item| item.belongs_to == cat.name)
                    .count();
                owned as f64 * cat.points
            })
            .sum()
    }

    /// First item whose text matches exactly. Duplicate item texts
    /// resolve to whichever comes first.
    pub fn find_item(&self, text: &str) -> Option<&CategoryItem> {
        self.items.iter().find(|item| item.text == text)
    }

    /// Category lookup by name.
    pub fn find_category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|cat| cat.name == name)
    }
}

// ---------------------------------------------------------------------------
// Cloze
// ---------------------------------------------------------------------------

/// A fill-in-the-blank passage. Blanks are `[...]` markers in `text`,
/// index-aligned with `blanks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClozeQuestion {
    /// Passage text containing bracket-delimited blank markers.
    #[serde(default)]
    pub text: String,
    /// Canonical correct strings, one per marker.
    #[serde(default)]
    pub blanks: Vec<String>,
    /// Sparse per-blank overrides keyed by stringified blank index, the
    /// way the original backend persisted them. Absence for an index
    /// means fall back to `blanks` at 1 point, not zero points.
    #[serde(default)]
    pub blank_options: BTreeMap<String, BlankOption>,
}

/// Per-blank answer key entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlankOption {
    /// The only acceptable answer for the blank.
    pub correct: String,
    /// Distractor choices offered alongside the correct one. Never
    /// treated as acceptable answers, never scored.
    #[serde(default)]
    pub additional: Vec<String>,
    #[serde(default = "default_points")]
    pub points: f64,
}

impl ClozeQuestion {
    /// Total points across blank options when present, otherwise one
    /// point per blank.
    pub fn max_points(&self) -> f64 {
        if self.blank_options.is_empty() {
            self.blanks.len() as f64
        } else {
            self.blank_options.values().map(|opt| opt.points).sum()
        }
    }

    /// Answer-key override for a blank, looked up by its numeric index
    /// against the stringified map keys.
    pub fn blank_option(&self, blank_index: u32) -> Option<&BlankOption> {
        self.blank_options.get(blank_index.to_string().as_str())
    }

    /// The `[...]` markers in the passage, in order.
    pub fn blank_markers(&self) -> Vec<&str> {
        blank_markers(&self.text)
    }
}

/// Extract bracket-delimited blank markers from a cloze passage.
/// Unclosed brackets are ignored.
pub fn blank_markers(text: &str) -> Vec<&str> {
    let mut markers = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) => {
                markers.push(&after[..close]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    markers
}

// ---------------------------------------------------------------------------
// Comprehension
// ---------------------------------------------------------------------------

/// A reading passage with auto-gradable sub-questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensionQuestion {
    #[serde(default)]
    pub passage: String,
    #[serde(default)]
    pub sub_questions: Vec<SubQuestion>,
}

/// One sub-question under a comprehension passage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubQuestion {
    #[serde(rename = "type")]
    pub kind: SubQuestionType,
    #[serde(default)]
    pub question: String,
    /// Choices, mcq only.
    #[serde(default)]
    pub options: Vec<String>,
    /// Option index for mcq, boolean for true-false.
    pub answer: AnswerValue,
    #[serde(default = "default_points")]
    pub points: f64,
}

/// Sub-question flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubQuestionType {
    #[serde(rename = "mcq")]
    Mcq,
    #[serde(rename = "true-false")]
    TrueFalse,
}

impl ComprehensionQuestion {
    /// Sum of sub-question points.
    pub fn max_points(&self) -> f64 {
        self.sub_questions.iter().map(|sq| sq.points).sum()
    }
}

/// A sub-question answer value: a boolean for true-false, an option
/// index for mcq. `Text` exists so a respondent submitting the wrong
/// JSON type (e.g. the string `"true"`) is representable and grades
/// incorrect — the derived `PartialEq` never coerces across variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Index(u32),
    Text(String),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(b) => write!(f, "{b}"),
            AnswerValue::Index(i) => write!(f, "{i}"),
            AnswerValue::Text(s) => write!(f, "{s}"),
        }
    }
}

fn default_points() -> f64 {
    1.0
}
