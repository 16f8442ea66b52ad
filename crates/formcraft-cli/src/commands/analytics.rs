//! The `formcraft analytics` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use formcraft_core::parser;
use formcraft_core::report::AnalyticsReport;
use formcraft_core::service::GradingService;
use formcraft_core::traits::{FormStore, ResponseStore};
use formcraft_store::MemoryStore;

pub async fn execute(
    form_path: PathBuf,
    responses_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let form = parser::parse_form(&form_path)?;
    let responses = super::load_responses(&responses_path)?;

    let store = Arc::new(MemoryStore::new());
    let form = store.create_form(form).await?;
    for mut response in responses {
        // Stored responses are taken to belong to the given form,
        // whatever id they were graded under.
        response.form_id = form.id.clone();
        store.create_response(response).await?;
    }

    let service = GradingService::new(store.clone(), store.clone());
    let report = service.analytics(&form.id).await?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        _ => {
            print_report(&report);
        }
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_report(report: &AnalyticsReport) {
    use comfy_table::{Cell, Table};

    println!("Analytics: {}", report.form.title);
    println!(
        "{} response(s), average {:.2}%, highest {:.2}%, lowest {:.2}%",
        report.total_responses, report.average_score, report.highest_score, report.lowest_score
    );

    let mut distribution = Table::new();
    distribution.set_header(vec!["Range", "Count", "Share"]);
    for bucket in &report.score_distribution {
        distribution.add_row(vec![
            Cell::new(&bucket.range),
            Cell::new(bucket.count),
            Cell::new(format!("{:.1}%", bucket.percentage)),
        ]);
    }
    println!("\n{distribution}");

    let mut questions = Table::new();
    questions.set_header(vec![
        "#",
        "Question",
        "Type",
        "Attempts",
        "Correct",
        "Partial",
        "Incorrect",
        "Accuracy",
        "Efficiency",
    ]);
    for q in &report.question_analytics {
        questions.add_row(vec![
            Cell::new(q.question_index + 1),
            Cell::new(&q.question_title),
            Cell::new(&q.question_type),
            Cell::new(q.total_attempts),
            Cell::new(q.correct_answers),
            Cell::new(q.partially_correct_answers),
            Cell::new(q.incorrect_answers),
            Cell::new(format!("{:.1}%", q.accuracy_rate)),
            Cell::new(format!("{:.1}%", q.points_efficiency)),
        ]);
    }
    println!("\n{questions}");
}
