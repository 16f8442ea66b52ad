//! Analytics aggregation over a form's full response collection.
//!
//! Everything here is re-derived from scratch on every call: there is no
//! incremental aggregation or caching, and no response is ever mutated.
//! Empty response sets produce zeroed reports rather than errors.

use chrono::Utc;
use uuid::Uuid;

use crate::model::{Form, QuestionType};
use crate::report::{
    AnalyticsReport, FormSummary, QuestionAnalytics, ResponseSummary, ScoreBucket,
};
use crate::response::{GradedAnswer, Response};

/// The five fixed score-distribution buckets, highest first.
const SCORE_RANGES: [&str; 5] = ["90-100%", "80-89%", "70-79%", "60-69%", "Below 60%"];

/// How many of the latest responses the report lists individually.
const RECENT_LIMIT: usize = 10;

/// Compute the full analytics report for a form and its responses.
pub fn compute_analytics(form: &Form, responses: &[Response]) -> AnalyticsReport {
    let total_responses = responses.len();

    let (average_score, highest_score, lowest_score) = if responses.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let sum: f64 = responses.iter().map(|r| r.percentage_score).sum();
        let highest = responses
            .iter()
            .map(|r| r.percentage_score)
            .fold(f64::MIN, f64::max);
        let lowest = responses
            .iter()
            .map(|r| r.percentage_score)
            .fold(f64::MAX, f64::min);
        (sum / total_responses as f64, highest, lowest)
    };

    AnalyticsReport {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        form: summarize_form(form),
        total_responses,
        average_score,
        highest_score,
        lowest_score,
        score_distribution: score_distribution(responses),
        question_analytics: question_analytics(form, responses),
        recent_submissions: recent_submissions(responses),
    }
}

/// Partition responses into the five fixed percentage buckets.
pub fn score_distribution(responses: &[Response]) -> Vec<ScoreBucket> {
    let mut counts = [0usize; SCORE_RANGES.len()];
    for response in responses {
        counts[bucket_index(response.percentage_score)] += 1;
    }

    let total = responses.len();
    SCORE_RANGES
        .iter()
        .zip(counts)
        .map(|(range, count)| ScoreBucket {
            range: (*range).to_string(),
            count,
            percentage: if total > 0 {
                count as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

fn bucket_index(score: f64) -> usize {
    if score >= 90.0 {
        0
    } else if score >= 80.0 {
        1
    } else if score >= 70.0 {
        2
    } else if score >= 60.0 {
        3
    } else {
        4
    }
}

fn summarize_form(form: &Form) -> FormSummary {
    let mut question_type_counts = std::collections::BTreeMap::new();
    for question in &form.questions {
        *question_type_counts
            .entry(question.kind.type_name().to_string())
            .or_insert(0usize) += 1;
    }
    FormSummary {
        id: form.id.clone(),
        title: form.title.clone(),
        question_count: form.questions.len(),
        question_type_counts,
    }
}

fn recent_submissions(responses: &[Response]) -> Vec<ResponseSummary> {
    let mut ordered: Vec<&Response> = responses.iter().collect();
    ordered.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    ordered
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|r| ResponseSummary {
            id: r.id,
            score: r.percentage_score,
            submitted_at: r.submitted_at,
            total_points: r.total_score,
            max_points: r.max_score,
        })
        .collect()
}

/// Per-question accuracy, partial accuracy, and points efficiency,
/// derived independently for each question index from the subset of
/// graded answers whose index matches.
pub fn question_analytics(form: &Form, responses: &[Response]) -> Vec<QuestionAnalytics> {
    form.questions
        .iter()
        .enumerate()
        .map(|(question_index, question)| {
            let attempts: Vec<&GradedAnswer> = responses
                .iter()
                .filter_map(|r| {
                    r.answers
                        .iter()
                        .find(|a| a.question_index == question_index)
                })
                .collect();

            let total_attempts = attempts.len();
            let mut correct = 0usize;
            let mut partially_correct = 0usize;
            let mut earned = 0.0f64;

            for answer in &attempts {
                earned += answer.total_points_earned;
                match classify(&answer.correct_flags()) {
                    Classification::FullyCorrect => correct += 1,
                    Classification::PartiallyCorrect => partially_correct += 1,
                    Classification::Incorrect => {}
                }
            }

            let incorrect = total_attempts - correct - partially_correct;
            let max_possible_points = question.kind.max_points().unwrap_or(0.0);

            let rate = |n: usize| {
                if total_attempts > 0 {
                    n as f64 / total_attempts as f64 * 100.0
                } else {
                    0.0
                }
            };

            QuestionAnalytics {
                question_index,
                question_type: question.kind.type_name().to_string(),
                question_title: if question.title.is_empty() {
                    format!("Question {}", question_index + 1)
                } else {
                    question.title.clone()
                },
                total_attempts,
                correct_answers: correct,
                partially_correct_answers: partially_correct,
                incorrect_answers: incorrect,
                accuracy_rate: rate(correct),
                partial_accuracy_rate: rate(correct + partially_correct),
                average_points: if total_attempts > 0 {
                    earned / total_attempts as f64
                } else {
                    0.0
                },
                max_possible_points,
                points_efficiency: if total_attempts > 0 && max_possible_points > 0.0 {
                    earned / (total_attempts as f64 * max_possible_points) * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

enum Classification {
    FullyCorrect,
    PartiallyCorrect,
    Incorrect,
}

/// Fully correct iff every item is correct and there is at least one;
/// partially correct iff at least one but not all.
fn classify(flags: &[bool]) -> Classification {
    let correct = flags.iter().filter(|&&c| c).count();
    if correct == flags.len() && !flags.is_empty() {
        Classification::FullyCorrect
    } else if correct > 0 {
        Classification::PartiallyCorrect
    } else {
        Classification::Incorrect
    }
}
