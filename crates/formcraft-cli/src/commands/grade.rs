//! The `formcraft grade` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use formcraft_core::model::Form;
use formcraft_core::parser;
use formcraft_core::response::Response;
use formcraft_core::service::GradingService;
use formcraft_core::traits::FormStore;
use formcraft_store::MemoryStore;

pub async fn execute(
    form_path: PathBuf,
    submission_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let form = parser::parse_form(&form_path)?;

    let body: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(&submission_path)
            .with_context(|| format!("failed to read submission: {}", submission_path.display()))?,
    )
    .with_context(|| format!("failed to parse submission JSON: {}", submission_path.display()))?;

    let store = Arc::new(MemoryStore::new());
    let form = store.create_form(form).await?;
    let service = GradingService::new(store.clone(), store.clone());
    let response = service.submit(&form.id, body).await?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        _ => {
            print_graded(&form, &response);
        }
    }

    if let Some(path) = output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(&response)?)
            .with_context(|| format!("failed to write response to {}", path.display()))?;
        eprintln!("Graded response saved to: {}", path.display());
    }

    Ok(())
}

fn print_graded(form: &Form, response: &Response) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Type", "Correct", "Points"]);

    for answer in &response.answers {
        let flags = answer.correct_flags();
        let correct = flags.iter().filter(|&&c| c).count();
        let title = form
            .questions
            .get(answer.question_index)
            .map(|q| q.title.as_str())
            .unwrap_or("");

        table.add_row(vec![
            Cell::new(answer.question_index + 1),
            Cell::new(title),
            Cell::new(answer.question_type),
            Cell::new(format!("{correct}/{}", flags.len())),
            Cell::new(format!(
                "{:.2}/{:.2}",
                answer.total_points_earned, answer.max_possible_points
            )),
        ]);
    }

    println!("{table}");
    println!(
        "\nTotal: {:.2}/{:.2} ({:.2}%)",
        response.total_score, response.max_score, response.percentage_score
    );
}
