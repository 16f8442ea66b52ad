//! Submission validator.
//!
//! Runs once, before any grading, so the graders can assume structural
//! well-formedness: every referenced question index exists and every
//! present answer payload matches its question's type. Author-side
//! inconsistencies inside a question's own answer key (dangling
//! `belongsTo`, missing blank sources) are deliberately not checked
//! here; those grade as incorrect rather than blocking submission.

use crate::error::EngineError;
use crate::model::{Form, QuestionKind};
use crate::submission::{Submission, SubmittedAnswers};

/// Validate a submission against its form.
pub fn validate_submission(form: &Form, submission: &Submission) -> Result<(), EngineError> {
    for entry in &submission.responses {
        let question = form.questions.get(entry.question_index).ok_or_else(|| {
            EngineError::Validation(format!(
                "question at index {} not found (form has {} questions)",
                entry.question_index,
                form.questions.len()
            ))
        })?;

        let Some(answers) = &entry.answers else {
            // Absent answer payloads grade as empty answer sets.
            continue;
        };

        let matches = match (&question.kind, answers) {
            (QuestionKind::Categorize(_), SubmittedAnswers::Categorized(_)) => true,
            (QuestionKind::Cloze(_), SubmittedAnswers::Blanks(_)) => true,
            (QuestionKind::Comprehension(_), SubmittedAnswers::SubQuestions(_)) => true,
            // Unknown kinds pass validation and abort in the grader.
            (QuestionKind::Unknown, _) => true,
            _ => false,
        };

        if !matches {
            return Err(EngineError::Validation(format!(
                "answer payload '{}' does not match question type '{}' at index {}",
                answers.kind_name(),
                question.kind.type_name(),
                entry.question_index
            )));
        }
    }

    Ok(())
}
