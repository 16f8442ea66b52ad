//! Analytics report types with JSON persistence and markdown rendering.
//!
//! A report is fully derived: it is computed on demand from a form and
//! its responses, and is never the source of truth for anything.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A complete analytics report for one form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was computed.
    pub created_at: DateTime<Utc>,
    /// Summary of the form the report covers.
    pub form: FormSummary,
    pub total_responses: usize,
    /// Mean of response percentage scores.
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    /// The five fixed percentage buckets, highest first.
    pub score_distribution: Vec<ScoreBucket>,
    /// One entry per form question, in form order.
    pub question_analytics: Vec<QuestionAnalytics>,
    /// Latest submissions, newest first.
    pub recent_submissions: Vec<ResponseSummary>,
}

/// Summary of a form (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
    /// Question count per type tag.
    pub question_type_counts: BTreeMap<String, usize>,
}

/// One score-distribution bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBucket {
    pub range: String,
    pub count: usize,
    /// Share of all responses in this bucket, 0-100.
    pub percentage: f64,
}

/// Per-question statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalytics {
    pub question_index: usize,
    pub question_type: String,
    pub question_title: String,
    pub total_attempts: usize,
    pub correct_answers: usize,
    pub partially_correct_answers: usize,
    pub incorrect_answers: usize,
    /// Fully correct attempts as a share of all attempts, 0-100.
    pub accuracy_rate: f64,
    /// Fully plus partially correct attempts as a share, 0-100.
    pub partial_accuracy_rate: f64,
    pub average_points: f64,
    pub max_possible_points: f64,
    /// Earned points over attainable points across all attempts, 0-100.
    pub points_efficiency: f64,
}

/// A single response, as listed under recent submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub id: Uuid,
    pub score: f64,
    pub submitted_at: DateTime<Utc>,
    pub total_points: f64,
    pub max_points: f64,
}

impl AnalyticsReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalyticsReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Analytics: {}\n\n", self.form.title));
        md.push_str(&format!(
            "**{} responses**, average {:.2}%, highest {:.2}%, lowest {:.2}%\n\n",
            self.total_responses, self.average_score, self.highest_score, self.lowest_score
        ));

        md.push_str("### Score distribution\n\n");
        md.push_str("| Range | Count | Share |\n");
        md.push_str("|-------|-------|-------|\n");
        for bucket in &self.score_distribution {
            md.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                bucket.range, bucket.count, bucket.percentage
            ));
        }
        md.push('\n');

        md.push_str("### Questions\n\n");
        md.push_str(
            "| # | Type | Attempts | Correct | Partial | Incorrect | Accuracy | Efficiency |\n",
        );
        md.push_str(
            "|---|------|----------|---------|---------|-----------|----------|------------|\n",
        );
        for q in &self.question_analytics {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {:.1}% | {:.1}% |\n",
                q.question_index + 1,
                q.question_type,
                q.total_attempts,
                q.correct_answers,
                q.partially_correct_answers,
                q.incorrect_answers,
                q.accuracy_rate,
                q.points_efficiency
            ));
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report() -> AnalyticsReport {
        AnalyticsReport {
            id: Uuid::nil(),
            created_at: Utc::now(),
            form: FormSummary {
                id: "f1".into(),
                title: "Science Quiz".into(),
                question_count: 1,
                question_type_counts: BTreeMap::from([("cloze".to_string(), 1)]),
            },
            total_responses: 2,
            average_score: 75.0,
            highest_score: 100.0,
            lowest_score: 50.0,
            score_distribution: vec![ScoreBucket {
                range: "90-100%".into(),
                count: 1,
                percentage: 50.0,
            }],
            question_analytics: vec![QuestionAnalytics {
                question_index: 0,
                question_type: "cloze".into(),
                question_title: "Fill in".into(),
                total_attempts: 2,
                correct_answers: 1,
                partially_correct_answers: 0,
                incorrect_answers: 1,
                accuracy_rate: 50.0,
                partial_accuracy_rate: 50.0,
                average_points: 1.0,
                max_possible_points: 2.0,
                points_efficiency: 50.0,
            }],
            recent_submissions: vec![],
        }
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = AnalyticsReport::load_json(&path).unwrap();

        assert_eq!(loaded.form.title, "Science Quiz");
        assert_eq!(loaded.total_responses, 2);
        assert_eq!(loaded.question_analytics.len(), 1);
    }

    #[test]
    fn wire_keys_are_camel_case() {
        let json = serde_json::to_value(make_report()).unwrap();
        assert!(json.get("totalResponses").is_some());
        assert!(json.get("scoreDistribution").is_some());
        assert!(json["questionAnalytics"][0].get("accuracyRate").is_some());
        assert!(json["questionAnalytics"][0]
            .get("pointsEfficiency")
            .is_some());
    }

    #[test]
    fn markdown_output() {
        let md = make_report().to_markdown();
        assert!(md.contains("Science Quiz"));
        assert!(md.contains("90-100%"));
        assert!(md.contains("| 1 | cloze | 2 | 1 | 0 | 1 | 50.0% | 50.0% |"));
    }
}
