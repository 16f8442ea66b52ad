//! The grading engine: one grader per question type, plus the
//! submission-level entry points.
//!
//! Grading is a deterministic pure function of (form, submission): it
//! reads the form it is given, produces one new response, and touches
//! nothing else, so independent submissions may be graded concurrently
//! in any order.

use chrono::Utc;
use uuid::Uuid;

use crate::error::EngineError;
use crate::model::{
    AnswerValue, CategorizeQuestion, ClozeQuestion, ComprehensionQuestion, Form, QuestionKind,
    QuestionType,
};
use crate::response::{
    aggregate_scores, GradedAnswer, GradedBlank, GradedItem, GradedItems, GradedSubAnswer,
    Response,
};
use crate::submission::{
    Submission, SubmittedAnswers, SubmittedBlank, SubmittedItem, SubmittedSubAnswer,
};
use crate::validate::validate_submission;

/// Grade a raw submission against a form, producing a new [`Response`].
///
/// Validates first; any unknown question type aborts the whole
/// submission before a response exists, so nothing partially graded can
/// be persisted.
pub fn grade_submission(form: &Form, submission: &Submission) -> Result<Response, EngineError> {
    validate_submission(form, submission)?;

    let mut answers = Vec::with_capacity(submission.responses.len());
    for entry in &submission.responses {
        // Index bounds were checked by the validator.
        let question = &form.questions[entry.question_index];

        let graded = match &question.kind {
            QuestionKind::Categorize(q) => {
                let items = match entry.answers.as_ref() {
                    Some(SubmittedAnswers::Categorized(items)) => items.as_slice(),
                    _ => &[],
                };
                grade_categorize(q, items)
            }
            QuestionKind::Cloze(q) => {
                let blanks = match entry.answers.as_ref() {
                    Some(SubmittedAnswers::Blanks(blanks)) => blanks.as_slice(),
                    _ => &[],
                };
                grade_cloze(q, blanks)
            }
            QuestionKind::Comprehension(q) => {
                let subs = match entry.answers.as_ref() {
                    Some(SubmittedAnswers::SubQuestions(subs)) => subs.as_slice(),
                    _ => &[],
                };
                grade_comprehension(q, subs)
            }
            QuestionKind::Unknown => {
                return Err(EngineError::UnknownQuestionType {
                    question_index: entry.question_index,
                });
            }
        };

        tracing::debug!(
            question_index = entry.question_index,
            question_type = %graded.question_type,
            earned = graded.total_points_earned,
            max = graded.max_possible_points,
            "graded question"
        );

        answers.push(GradedAnswer {
            question_index: entry.question_index,
            ..graded
        });
    }

    let summary = aggregate_scores(&answers);

    Ok(Response {
        id: Uuid::new_v4(),
        form_id: form.id.clone(),
        answers,
        total_score: summary.total_score,
        max_score: summary.max_score,
        percentage_score: summary.percentage_score,
        submitted_at: Utc::now(),
    })
}

/// Re-apply grading and score aggregation to an existing response's
/// recorded answers against the current form definition.
///
/// Used when a form's answer key changed after responses exist: every
/// derived field is rebuilt, while the response identity and submission
/// time are preserved.
pub fn regrade(form: &Form, response: &Response) -> Result<Response, EngineError> {
    let submission = response.to_submission();
    let mut regraded = grade_submission(form, &submission)?;
    regraded.id = response.id;
    regraded.submitted_at = response.submitted_at;
    Ok(regraded)
}

fn grade_categorize(question: &CategorizeQuestion, submitted: &[SubmittedItem]) -> GradedAnswer {
    let max_possible_points = question.max_points();
    let mut earned = 0.0;
    let mut items = Vec::with_capacity(submitted.len());

    for user_item in submitted {
        // First match by exact text; duplicates resolve to the first.
        let correct_item = question.find_item(&user_item.item_text);
        let correct_category =
            correct_item.and_then(|item| question.find_category(&item.belongs_to));

        // A dangling belongsTo leaves the category lookup empty, which
        // grades incorrect even if the respondent picked that name.
        let is_correct = correct_category
            .is_some_and(|cat| cat.name == user_item.selected_category);

        if is_correct {
            if let Some(cat) = correct_category {
                earned += cat.points;
            }
        }

        items.push(GradedItem {
            item_text: user_item.item_text.clone(),
            selected_category: user_item.selected_category.clone(),
            correct_category: correct_item.map(|item| item.belongs_to.clone()),
            is_correct,
        });
    }

    GradedAnswer {
        question_index: 0,
        question_type: QuestionType::Categorize,
        items: GradedItems::Categorized(items),
        total_points_earned: earned,
        max_possible_points,
    }
}

fn grade_cloze(question: &ClozeQuestion, submitted: &[SubmittedBlank]) -> GradedAnswer {
    let max_possible_points = question.max_points();
    let mut earned = 0.0;
    let mut blanks = Vec::with_capacity(submitted.len());

    for user_blank in submitted {
        let user_answer = normalize(&user_blank.user_answer);

        let (correct_answer, is_correct, points) =
            if let Some(option) = question.blank_option(user_blank.blank_index) {
                // Compare against `correct` only; `additional` entries
                // are distractors and never earn points.
                let is_correct = normalize(&option.correct) == user_answer;
                (Some(option.correct.clone()), is_correct, option.points)
            } else if let Some(blank) = question.blanks.get(user_blank.blank_index as usize) {
                let is_correct = normalize(blank) == user_answer;
                (Some(blank.clone()), is_correct, 1.0)
            } else {
                (None, false, 0.0)
            };

        if is_correct {
            earned += points;
        }

        blanks.push(GradedBlank {
            blank_index: user_blank.blank_index,
            user_answer: user_blank.user_answer.trim().to_string(),
            correct_answer,
            is_correct,
        });
    }

    GradedAnswer {
        question_index: 0,
        question_type: QuestionType::Cloze,
        items: GradedItems::Blanks(blanks),
        total_points_earned: earned,
        max_possible_points,
    }
}

fn grade_comprehension(
    question: &ComprehensionQuestion,
    submitted: &[SubmittedSubAnswer],
) -> GradedAnswer {
    let max_possible_points = question.max_points();
    let mut earned = 0.0;
    let mut subs = Vec::with_capacity(submitted.len());

    for user_sub in submitted {
        // A submitted index with no sub-question is silently skipped.
        let Some(sub_question) = question.sub_questions.get(user_sub.sub_question_index) else {
            continue;
        };

        // Strict equality: no coercion across number/boolean/string.
        let is_correct = user_sub.answer == sub_question.answer;
        let points_earned = if is_correct { sub_question.points } else { 0.0 };
        earned += points_earned;

        subs.push(GradedSubAnswer {
            sub_question_index: user_sub.sub_question_index,
            answer: user_sub.answer.clone(),
            correct_answer: sub_question.answer.clone(),
            is_correct,
            points_earned,
            max_points: sub_question.points,
        });
    }

    GradedAnswer {
        question_index: 0,
        question_type: QuestionType::Comprehension,
        items: GradedItems::SubQuestions(subs),
        total_points_earned: earned,
        max_possible_points,
    }
}

/// Trim surrounding whitespace and case-fold for blank comparison.
fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::submission::*;
    use std::collections::BTreeMap;

    fn form_with(kind: QuestionKind) -> Form {
        Form {
            id: "form-1".into(),
            title: "Test form".into(),
            header_image: None,
            questions: vec![Question {
                title: "Q1".into(),
                header_image: None,
                kind,
            }],
            created_at: None,
            updated_at: None,
        }
    }

    fn categorize_question() -> QuestionKind {
        QuestionKind::Categorize(CategorizeQuestion {
            categories: vec![
                Category {
                    name: "A".into(),
                    points: 2.0,
                },
                Category {
                    name: "B".into(),
                    points: 3.0,
                },
            ],
            items: vec![
                CategoryItem {
                    text: "x".into(),
                    belongs_to: "A".into(),
                },
                CategoryItem {
                    text: "y".into(),
                    belongs_to: "B".into(),
                },
            ],
        })
    }

    fn submit(entries: Vec<QuestionSubmission>) -> Submission {
        Submission { responses: entries }
    }

    fn categorized(items: Vec<(&str, &str)>) -> QuestionSubmission {
        QuestionSubmission {
            question_index: 0,
            answers: Some(SubmittedAnswers::Categorized(
                items
                    .into_iter()
                    .map(|(text, cat)| SubmittedItem {
                        item_text: text.into(),
                        selected_category: cat.into(),
                    })
                    .collect(),
            )),
        }
    }

    #[test]
    fn categorize_awards_category_points() {
        let form = form_with(categorize_question());
        let response =
            grade_submission(&form, &submit(vec![categorized(vec![("x", "A"), ("y", "A")])]))
                .unwrap();

        let answer = &response.answers[0];
        assert_eq!(answer.total_points_earned, 2.0);
        assert_eq!(answer.max_possible_points, 5.0);
        assert_eq!(answer.correct_flags(), vec![true, false]);
        let GradedItems::Categorized(items) = &answer.items else {
            panic!("expected categorized items");
        };
        assert_eq!(items[1].correct_category.as_deref(), Some("B"));
    }

    #[test]
    fn categorize_max_holds_for_empty_submission() {
        let form = form_with(categorize_question());
        let response = grade_submission(
            &form,
            &submit(vec![QuestionSubmission {
                question_index: 0,
                answers: None,
            }]),
        )
        .unwrap();
        assert_eq!(response.answers[0].max_possible_points, 5.0);
        assert_eq!(response.answers[0].total_points_earned, 0.0);
        assert_eq!(response.percentage_score, 0.0);
    }

    #[test]
    fn categorize_unmatched_item_grades_incorrect() {
        let form = form_with(categorize_question());
        let response =
            grade_submission(&form, &submit(vec![categorized(vec![("zzz", "A")])])).unwrap();

        let GradedItems::Categorized(items) = &response.answers[0].items else {
            panic!("expected categorized items");
        };
        assert!(!items[0].is_correct);
        assert_eq!(items[0].correct_category, None);
        assert_eq!(response.answers[0].total_points_earned, 0.0);
    }

    #[test]
    fn categorize_dangling_belongs_to_grades_incorrect() {
        let form = form_with(QuestionKind::Categorize(CategorizeQuestion {
            categories: vec![Category {
                name: "A".into(),
                points: 1.0,
            }],
            items: vec![CategoryItem {
                text: "x".into(),
                belongs_to: "Ghost".into(),
            }],
        }));
        // Even naming the dangling category exactly earns nothing.
        let response =
            grade_submission(&form, &submit(vec![categorized(vec![("x", "Ghost")])])).unwrap();

        let GradedItems::Categorized(items) = &response.answers[0].items else {
            panic!("expected categorized items");
        };
        assert!(!items[0].is_correct);
        assert_eq!(items[0].correct_category.as_deref(), Some("Ghost"));
        assert_eq!(response.answers[0].total_points_earned, 0.0);
    }

    #[test]
    fn categorize_duplicate_texts_resolve_to_first() {
        let form = form_with(QuestionKind::Categorize(CategorizeQuestion {
            categories: vec![
                Category {
                    name: "A".into(),
                    points: 1.0,
                },
                Category {
                    name: "B".into(),
                    points: 1.0,
                },
            ],
            items: vec![
                CategoryItem {
                    text: "dup".into(),
                    belongs_to: "A".into(),
                },
                CategoryItem {
                    text: "dup".into(),
                    belongs_to: "B".into(),
                },
            ],
        }));
        let response =
            grade_submission(&form, &submit(vec![categorized(vec![("dup", "B")])])).unwrap();

        // The first "dup" belongs to A, so placing it in B is wrong.
        let GradedItems::Categorized(items) = &response.answers[0].items else {
            panic!("expected categorized items");
        };
        assert!(!items[0].is_correct);
        assert_eq!(items[0].correct_category.as_deref(), Some("A"));
    }

    fn blank(index: u32, answer: &str) -> QuestionSubmission {
        QuestionSubmission {
            question_index: 0,
            answers: Some(SubmittedAnswers::Blanks(vec![SubmittedBlank {
                blank_index: index,
                user_answer: answer.into(),
            }])),
        }
    }

    #[test]
    fn cloze_distractors_never_score() {
        let mut blank_options = BTreeMap::new();
        blank_options.insert(
            "0".to_string(),
            BlankOption {
                correct: "cat".into(),
                additional: vec!["dog".into(), "cat ".into()],
                points: 2.0,
            },
        );
        let form = form_with(QuestionKind::Cloze(ClozeQuestion {
            text: "A [cat] sat".into(),
            blanks: vec!["cat".into()],
            blank_options,
        }));

        let wrong = grade_submission(&form, &submit(vec![blank(0, "dog")])).unwrap();
        assert_eq!(wrong.answers[0].total_points_earned, 0.0);
        assert_eq!(wrong.answers[0].correct_flags(), vec![false]);

        // Case/whitespace variants of the correct answer still match.
        let right = grade_submission(&form, &submit(vec![blank(0, " Cat ")])).unwrap();
        assert_eq!(right.answers[0].total_points_earned, 2.0);
        assert_eq!(right.answers[0].max_possible_points, 2.0);
    }

    #[test]
    fn cloze_falls_back_to_blanks_at_one_point() {
        let form = form_with(QuestionKind::Cloze(ClozeQuestion {
            text: "The [sky] is blue".into(),
            blanks: vec!["sky".into()],
            blank_options: BTreeMap::new(),
        }));
        let response = grade_submission(&form, &submit(vec![blank(0, "Sky ")])).unwrap();
        let answer = &response.answers[0];
        assert_eq!(answer.total_points_earned, 1.0);
        assert_eq!(answer.max_possible_points, 1.0);
        assert_eq!(response.percentage_score, 100.0);
    }

    #[test]
    fn cloze_blank_without_source_grades_incorrect() {
        let form = form_with(QuestionKind::Cloze(ClozeQuestion {
            text: "The [sky] is blue".into(),
            blanks: vec!["sky".into()],
            blank_options: BTreeMap::new(),
        }));
        let response = grade_submission(&form, &submit(vec![blank(7, "anything")])).unwrap();
        let GradedItems::Blanks(blanks) = &response.answers[0].items else {
            panic!("expected blanks");
        };
        assert_eq!(blanks[0].correct_answer, None);
        assert!(!blanks[0].is_correct);
        assert_eq!(response.answers[0].total_points_earned, 0.0);
    }

    fn comprehension_question() -> QuestionKind {
        QuestionKind::Comprehension(ComprehensionQuestion {
            passage: "Water boils at 100C".into(),
            sub_questions: vec![
                SubQuestion {
                    kind: SubQuestionType::Mcq,
                    question: "Boiling point?".into(),
                    options: vec!["50".into(), "100".into()],
                    answer: AnswerValue::Index(1),
                    points: 2.0,
                },
                SubQuestion {
                    kind: SubQuestionType::TrueFalse,
                    question: "Water is wet".into(),
                    options: vec![],
                    answer: AnswerValue::Bool(true),
                    points: 1.0,
                },
            ],
        })
    }

    fn sub_answers(answers: Vec<(usize, AnswerValue)>) -> QuestionSubmission {
        QuestionSubmission {
            question_index: 0,
            answers: Some(SubmittedAnswers::SubQuestions(
                answers
                    .into_iter()
                    .map(|(i, answer)| SubmittedSubAnswer {
                        sub_question_index: i,
                        answer,
                    })
                    .collect(),
            )),
        }
    }

    #[test]
    fn comprehension_grades_by_strict_equality() {
        let form = form_with(comprehension_question());
        let response = grade_submission(
            &form,
            &submit(vec![sub_answers(vec![
                (0, AnswerValue::Index(1)),
                (1, AnswerValue::Bool(false)),
            ])]),
        )
        .unwrap();

        let answer = &response.answers[0];
        assert_eq!(answer.total_points_earned, 2.0);
        assert_eq!(answer.max_possible_points, 3.0);
        assert_eq!(answer.correct_flags(), vec![true, false]);
    }

    #[test]
    fn comprehension_rejects_type_coerced_answers() {
        let form = form_with(comprehension_question());
        // The string "true" is not the boolean true.
        let response = grade_submission(
            &form,
            &submit(vec![sub_answers(vec![(1, AnswerValue::Text("true".into()))])]),
        )
        .unwrap();
        assert_eq!(response.answers[0].correct_flags(), vec![false]);
        assert_eq!(response.answers[0].total_points_earned, 0.0);
    }

    #[test]
    fn comprehension_skips_unknown_sub_index() {
        let form = form_with(comprehension_question());
        let response = grade_submission(
            &form,
            &submit(vec![sub_answers(vec![
                (9, AnswerValue::Bool(true)),
                (1, AnswerValue::Bool(true)),
            ])]),
        )
        .unwrap();
        // The out-of-range entry is dropped, not graded.
        assert_eq!(response.answers[0].items.len(), 1);
        assert_eq!(response.answers[0].total_points_earned, 1.0);
    }

    #[test]
    fn unknown_question_type_aborts_whole_submission() {
        let mut form = form_with(comprehension_question());
        form.questions.push(Question {
            title: "Mystery".into(),
            header_image: None,
            kind: QuestionKind::Unknown,
        });
        let submission = submit(vec![
            sub_answers(vec![(0, AnswerValue::Index(1))]),
            QuestionSubmission {
                question_index: 1,
                answers: None,
            },
        ]);
        let err = grade_submission(&form, &submission).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownQuestionType { question_index: 1 }
        ));
    }

    #[test]
    fn regrade_is_a_fixpoint_on_unchanged_form() {
        let form = form_with(categorize_question());
        let original =
            grade_submission(&form, &submit(vec![categorized(vec![("x", "A"), ("y", "B")])]))
                .unwrap();
        let regraded = regrade(&form, &original).unwrap();

        assert_eq!(regraded.id, original.id);
        assert_eq!(regraded.submitted_at, original.submitted_at);
        assert_eq!(regraded.total_score, original.total_score);
        assert_eq!(regraded.max_score, original.max_score);
        assert_eq!(regraded.percentage_score, original.percentage_score);
    }

    #[test]
    fn regrade_applies_changed_answer_key() {
        let form = form_with(categorize_question());
        let original =
            grade_submission(&form, &submit(vec![categorized(vec![("x", "B")])])).unwrap();
        assert_eq!(original.total_score, 0.0);

        // The author moves item "x" into category B after the fact.
        let mut changed = form.clone();
        let QuestionKind::Categorize(q) = &mut changed.questions[0].kind else {
            panic!("expected categorize");
        };
        q.items[0].belongs_to = "B".into();

        let regraded = regrade(&changed, &original).unwrap();
        assert_eq!(regraded.total_score, 3.0);
        assert_eq!(regraded.id, original.id);
    }

    #[test]
    fn grading_is_deterministic() {
        let form = form_with(categorize_question());
        let submission = submit(vec![categorized(vec![("x", "A"), ("y", "A")])]);
        let a = grade_submission(&form, &submission).unwrap();
        let b = grade_submission(&form, &submission).unwrap();
        assert_eq!(a.total_score, b.total_score);
        assert_eq!(a.max_score, b.max_score);
        assert_eq!(a.percentage_score, b.percentage_score);
    }
}
