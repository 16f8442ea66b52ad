//! JSON form loading and author-side validation.
//!
//! Forms are JSON documents. Validation produces warnings, not errors:
//! answer-key inconsistencies originate in author data and grade as
//! incorrect/zero-point rather than blocking submissions.

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{AnswerValue, Form, QuestionKind, SubQuestionType};

/// Parse a single JSON file into a [`Form`].
pub fn parse_form(path: &Path) -> Result<Form> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form file: {}", path.display()))?;
    parse_form_str(&content, path)
}

/// Parse a JSON string into a [`Form`] (useful for testing).
pub fn parse_form_str(content: &str, source_path: &Path) -> Result<Form> {
    let form: Form = serde_json::from_str(content)
        .with_context(|| format!("failed to parse form JSON: {}", source_path.display()))?;
    Ok(form)
}

/// Recursively load all `.json` form files from a directory. Files that
/// fail to parse are skipped with a warning.
pub fn load_form_directory(dir: &Path) -> Result<Vec<Form>> {
    let mut forms = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            forms.extend(load_form_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match parse_form(&path) {
                Ok(form) => forms.push(form),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(forms)
}

/// A warning from form validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question index (if applicable).
    pub question_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn form(message: impl Into<String>) -> Self {
        ValidationWarning {
            question_index: None,
            message: message.into(),
        }
    }

    fn question(index: usize, message: impl Into<String>) -> Self {
        ValidationWarning {
            question_index: Some(index),
            message: message.into(),
        }
    }
}

/// Validate a form for common authoring issues.
pub fn validate_form(form: &Form) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if form.title.trim().is_empty() {
        warnings.push(ValidationWarning::form("form title is empty"));
    }
    if form.questions.is_empty() {
        warnings.push(ValidationWarning::form("form has no questions"));
    }

    for (index, question) in form.questions.iter().enumerate() {
        match &question.kind {
            QuestionKind::Categorize(q) => {
                if q.categories.is_empty() {
                    warnings.push(ValidationWarning::question(index, "no categories defined"));
                }

                let mut seen_names = std::collections::HashSet::new();
                for cat in &q.categories {
                    if !seen_names.insert(cat.name.as_str()) {
                        warnings.push(ValidationWarning::question(
                            index,
                            format!("duplicate category name: {}", cat.name),
                        ));
                    }
                    if cat.points < 0.0 {
                        warnings.push(ValidationWarning::question(
                            index,
                            format!("category '{}' has negative points", cat.name),
                        ));
                    }
                }

                let mut seen_texts = std::collections::HashSet::new();
                for item in &q.items {
                    if q.categories.iter().all(|cat| cat.name != item.belongs_to) {
                        warnings.push(ValidationWarning::question(
                            index,
                            format!(
                                "item '{}' belongs to nonexistent category '{}'",
                                item.text, item.belongs_to
                            ),
                        ));
                    }
                    if !seen_texts.insert(item.text.as_str()) {
                        warnings.push(ValidationWarning::question(
                            index,
                            format!("duplicate item text '{}' makes grading ambiguous", item.text),
                        ));
                    }
                }
            }
            QuestionKind::Cloze(q) => {
                let markers = q.blank_markers();
                if markers.len() != q.blanks.len() {
                    warnings.push(ValidationWarning::question(
                        index,
                        format!(
                            "passage has {} blank marker(s) but {} answer(s)",
                            markers.len(),
                            q.blanks.len()
                        ),
                    ));
                }
                for (key, option) in &q.blank_options {
                    match key.parse::<usize>() {
                        Ok(blank_index) if blank_index >= q.blanks.len().max(markers.len()) => {
                            warnings.push(ValidationWarning::question(
                                index,
                                format!("blank option index {blank_index} is out of range"),
                            ));
                        }
                        Ok(_) => {}
                        Err(_) => {
                            warnings.push(ValidationWarning::question(
                                index,
                                format!("blank option key '{key}' is not a blank index"),
                            ));
                        }
                    }
                    if option.points < 0.0 {
                        warnings.push(ValidationWarning::question(
                            index,
                            format!("blank option {key} has negative points"),
                        ));
                    }
                    if option.additional.iter().any(|d| d == &option.correct) {
                        warnings.push(ValidationWarning::question(
                            index,
                            format!(
                                "blank option {key} lists its correct answer as a distractor"
                            ),
                        ));
                    }
                }
            }
            QuestionKind::Comprehension(q) => {
                if q.sub_questions.is_empty() {
                    warnings.push(ValidationWarning::question(index, "no sub-questions defined"));
                }
                for (sub_index, sq) in q.sub_questions.iter().enumerate() {
                    match (sq.kind, &sq.answer) {
                        (SubQuestionType::Mcq, AnswerValue::Index(i)) => {
                            if *i as usize >= sq.options.len() {
                                warnings.push(ValidationWarning::question(
                                    index,
                                    format!(
                                        "sub-question {sub_index} answer index {i} is out of range \
                                         ({} options)",
                                        sq.options.len()
                                    ),
                                ));
                            }
                        }
                        (SubQuestionType::Mcq, _) => {
                            warnings.push(ValidationWarning::question(
                                index,
                                format!("sub-question {sub_index} mcq answer is not an option index"),
                            ));
                        }
                        (SubQuestionType::TrueFalse, AnswerValue::Bool(_)) => {}
                        (SubQuestionType::TrueFalse, _) => {
                            warnings.push(ValidationWarning::question(
                                index,
                                format!(
                                    "sub-question {sub_index} true-false answer is not a boolean"
                                ),
                            ));
                        }
                    }
                    if sq.points < 0.0 {
                        warnings.push(ValidationWarning::question(
                            index,
                            format!("sub-question {sub_index} has negative points"),
                        ));
                    }
                }
            }
            QuestionKind::Unknown => {
                warnings.push(ValidationWarning::question(
                    index,
                    "unrecognized question type; submissions against it will fail".to_string(),
                ));
            }
        }
    }

    warnings
}
