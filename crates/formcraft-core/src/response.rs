//! Graded answers, responses, and score aggregation.
//!
//! A [`Response`] is the persisted record of one respondent's graded
//! submission: one [`GradedAnswer`] per answered question plus the
//! derived totals. Responses are never mutated after creation except by
//! an explicit regrade, which rebuilds every derived field from the
//! current form definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnswerValue, QuestionType};
use crate::submission::{
    QuestionSubmission, SubmittedAnswers, SubmittedBlank, SubmittedItem, SubmittedSubAnswer,
    Submission,
};

/// The scored result of grading one question's submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawGradedAnswer", into = "RawGradedAnswer")]
pub struct GradedAnswer {
    pub question_index: usize,
    pub question_type: QuestionType,
    pub items: GradedItems,
    /// Points earned for this question. Never negative.
    pub total_points_earned: f64,
    /// The question's intrinsic maximum, independent of the submission.
    pub max_possible_points: f64,
}

impl GradedAnswer {
    /// Item-level correctness flags, used by analytics classification.
    pub fn correct_flags(&self) -> Vec<bool> {
        match &self.items {
            GradedItems::Categorized(items) => items.iter().map(|i| i.is_correct).collect(),
            GradedItems::Blanks(blanks) => blanks.iter().map(|b| b.is_correct).collect(),
            GradedItems::SubQuestions(subs) => subs.iter().map(|s| s.is_correct).collect(),
        }
    }

    /// Strip the grading back off, recovering the submitted answers.
    /// Used by regrading to re-run the graders against a changed form.
    pub fn to_submission_entry(&self) -> QuestionSubmission {
        let answers = match &self.items {
            GradedItems::Categorized(items) => SubmittedAnswers::Categorized(
                items
                    .iter()
                    .map(|i| SubmittedItem {
                        item_text: i.item_text.clone(),
                        selected_category: i.selected_category.clone(),
                    })
                    .collect(),
            ),
            GradedItems::Blanks(blanks) => SubmittedAnswers::Blanks(
                blanks
                    .iter()
                    .map(|b| SubmittedBlank {
                        blank_index: b.blank_index,
                        user_answer: b.user_answer.clone(),
                    })
                    .collect(),
            ),
            GradedItems::SubQuestions(subs) => SubmittedAnswers::SubQuestions(
                subs.iter()
                    .map(|s| SubmittedSubAnswer {
                        sub_question_index: s.sub_question_index,
                        answer: s.answer.clone(),
                    })
                    .collect(),
            ),
        };
        QuestionSubmission {
            question_index: self.question_index,
            answers: Some(answers),
        }
    }
}

/// Per-item grading detail, one variant per question type.
#[derive(Debug, Clone)]
pub enum GradedItems {
    Categorized(Vec<GradedItem>),
    Blanks(Vec<GradedBlank>),
    SubQuestions(Vec<GradedSubAnswer>),
}

impl GradedItems {
    pub fn len(&self) -> usize {
        match self {
            GradedItems::Categorized(v) => v.len(),
            GradedItems::Blanks(v) => v.len(),
            GradedItems::SubQuestions(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Wire-level graded answer: the per-type detail array sits under the
/// key the original backend persisted (`categorizedItems`, ...), with
/// the absent arrays omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGradedAnswer {
    question_index: usize,
    question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    categorized_items: Option<Vec<GradedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blank_answers: Option<Vec<GradedBlank>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_question_answers: Option<Vec<GradedSubAnswer>>,
    total_points_earned: f64,
    max_possible_points: f64,
}

impl From<RawGradedAnswer> for GradedAnswer {
    fn from(raw: RawGradedAnswer) -> Self {
        let items = match raw.question_type {
            QuestionType::Categorize => {
                GradedItems::Categorized(raw.categorized_items.unwrap_or_default())
            }
            QuestionType::Cloze => GradedItems::Blanks(raw.blank_answers.unwrap_or_default()),
            QuestionType::Comprehension => {
                GradedItems::SubQuestions(raw.sub_question_answers.unwrap_or_default())
            }
        };
        GradedAnswer {
            question_index: raw.question_index,
            question_type: raw.question_type,
            items,
            total_points_earned: raw.total_points_earned,
            max_possible_points: raw.max_possible_points,
        }
    }
}

impl From<GradedAnswer> for RawGradedAnswer {
    fn from(answer: GradedAnswer) -> Self {
        let mut raw = RawGradedAnswer {
            question_index: answer.question_index,
            question_type: answer.question_type,
            categorized_items: None,
            blank_answers: None,
            sub_question_answers: None,
            total_points_earned: answer.total_points_earned,
            max_possible_points: answer.max_possible_points,
        };
        match answer.items {
            GradedItems::Categorized(v) => raw.categorized_items = Some(v),
            GradedItems::Blanks(v) => raw.blank_answers = Some(v),
            GradedItems::SubQuestions(v) => raw.sub_question_answers = Some(v),
        }
        raw
    }
}

/// One graded categorize placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedItem {
    pub item_text: String,
    pub selected_category: String,
    /// The answer-key category, `None` when the submitted item text
    /// matched nothing in the question.
    pub correct_category: Option<String>,
    pub is_correct: bool,
}

/// One graded blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedBlank {
    pub blank_index: u32,
    pub user_answer: String,
    /// The answer-key string, `None` when the blank index has no
    /// correct-answer source of any kind.
    pub correct_answer: Option<String>,
    pub is_correct: bool,
}

/// One graded sub-question answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedSubAnswer {
    pub sub_question_index: usize,
    pub answer: AnswerValue,
    pub correct_answer: AnswerValue,
    pub is_correct: bool,
    pub points_earned: f64,
    pub max_points: f64,
}

/// The persisted record of one respondent's full graded submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: Uuid,
    pub form_id: String,
    /// Graded answers, ordered as submitted.
    #[serde(rename = "responses")]
    pub answers: Vec<GradedAnswer>,
    pub total_score: f64,
    pub max_score: f64,
    /// `totalScore / maxScore * 100` rounded to two decimals, 0 when
    /// `maxScore` is 0.
    pub percentage_score: f64,
    pub submitted_at: DateTime<Utc>,
}

impl Response {
    /// Recover the raw submission this response was graded from.
    pub fn to_submission(&self) -> Submission {
        Submission {
            responses: self
                .answers
                .iter()
                .map(GradedAnswer::to_submission_entry)
                .collect(),
        }
    }
}

/// Response-level score totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total_score: f64,
    pub max_score: f64,
    pub percentage_score: f64,
}

/// Sum per-question points into response-level totals.
///
/// Pure and idempotent: the same graded answers always produce the same
/// summary.
pub fn aggregate_scores(answers: &[GradedAnswer]) -> ScoreSummary {
    let total_score: f64 = answers.iter().map(|a| a.total_points_earned).sum();
    let max_score: f64 = answers.iter().map(|a| a.max_possible_points).sum();
    ScoreSummary {
        total_score,
        max_score,
        percentage_score: percentage(total_score, max_score),
    }
}

/// Two-decimal percentage, rounded on the percentage rather than the
/// raw score. Defined as 0 when the maximum is 0.
pub fn percentage(total: f64, max: f64) -> f64 {
    if max > 0.0 {
        (total / max * 10_000.0).round() / 100.0
    } else {
        0.0
    }
}
