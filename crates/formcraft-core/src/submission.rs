//! Respondent submission shapes, pre-grading.
//!
//! A submission is ephemeral: it is validated, graded into a
//! [`Response`](crate::response::Response), and discarded. The payload
//! keys (`categorizedItems`, `blankAnswers`, `subQuestionAnswers`)
//! match the original wire format.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::AnswerValue;

/// Raw answers for one response to one form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// One entry per answered question, keyed by question index.
    pub responses: Vec<QuestionSubmission>,
}

impl Submission {
    /// Decode a raw JSON body into a submission, mapping decode failures
    /// (including a missing `responses` array) to a validation error.
    pub fn from_json(body: serde_json::Value) -> Result<Self, EngineError> {
        serde_json::from_value(body).map_err(|e| {
            EngineError::Validation(format!(
                "invalid submission format, expected responses array: {e}"
            ))
        })
    }
}

/// Raw answers for a single question.
///
/// The answer payload is optional: a respondent can reference a question
/// without supplying any answers, and grading treats that as an empty
/// answer set rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawQuestionSubmission", into = "RawQuestionSubmission")]
pub struct QuestionSubmission {
    pub question_index: usize,
    pub answers: Option<SubmittedAnswers>,
}

/// The per-type answer payload.
#[derive(Debug, Clone)]
pub enum SubmittedAnswers {
    Categorized(Vec<SubmittedItem>),
    Blanks(Vec<SubmittedBlank>),
    SubQuestions(Vec<SubmittedSubAnswer>),
}

impl SubmittedAnswers {
    /// The wire key this payload arrives under, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SubmittedAnswers::Categorized(_) => "categorizedItems",
            SubmittedAnswers::Blanks(_) => "blankAnswers",
            SubmittedAnswers::SubQuestions(_) => "subQuestionAnswers",
        }
    }
}

/// Wire-level entry shape: the three payload keys are sibling fields of
/// `questionIndex`, at most one of them populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestionSubmission {
    question_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    categorized_items: Option<Vec<SubmittedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blank_answers: Option<Vec<SubmittedBlank>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_question_answers: Option<Vec<SubmittedSubAnswer>>,
}

impl From<RawQuestionSubmission> for QuestionSubmission {
    fn from(raw: RawQuestionSubmission) -> Self {
        let answers = if let Some(items) = raw.categorized_items {
            Some(SubmittedAnswers::Categorized(items))
        } else if let Some(blanks) = raw.blank_answers {
            Some(SubmittedAnswers::Blanks(blanks))
        } else {
            raw.sub_question_answers.map(SubmittedAnswers::SubQuestions)
        };
        QuestionSubmission {
            question_index: raw.question_index,
            answers,
        }
    }
}

impl From<QuestionSubmission> for RawQuestionSubmission {
    fn from(entry: QuestionSubmission) -> Self {
        let mut raw = RawQuestionSubmission {
            question_index: entry.question_index,
            categorized_items: None,
            blank_answers: None,
            sub_question_answers: None,
        };
        match entry.answers {
            Some(SubmittedAnswers::Categorized(items)) => raw.categorized_items = Some(items),
            Some(SubmittedAnswers::Blanks(blanks)) => raw.blank_answers = Some(blanks),
            Some(SubmittedAnswers::SubQuestions(subs)) => raw.sub_question_answers = Some(subs),
            None => {}
        }
        raw
    }
}

/// One item placed into a category by the respondent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedItem {
    pub item_text: String,
    pub selected_category: String,
}

/// One filled blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedBlank {
    pub blank_index: u32,
    pub user_answer: String,
}

/// One answered sub-question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSubAnswer {
    pub sub_question_index: usize,
    pub answer: AnswerValue,
}
