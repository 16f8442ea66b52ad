//! The `formcraft regrade` command.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use formcraft_core::service::GradingService;
use formcraft_core::traits::{FormStore, ResponseStore};
use formcraft_store::MemoryStore;

pub async fn execute(
    form_path: PathBuf,
    responses_path: PathBuf,
    output: Option<PathBuf>,
) -> Result<()> {
    let form = formcraft_core::parser::parse_form(&form_path)?;
    let responses = super::load_responses(&responses_path)?;
    anyhow::ensure!(
        !responses.is_empty(),
        "no responses found at {}",
        responses_path.display()
    );

    let store = Arc::new(MemoryStore::new());
    let form = store.create_form(form).await?;

    let mut previous: HashMap<Uuid, f64> = HashMap::new();
    for mut response in responses {
        response.form_id = form.id.clone();
        previous.insert(response.id, response.percentage_score);
        store.create_response(response).await?;
    }

    let service = GradingService::new(store.clone(), store.clone());
    let count = service.regrade_all(&form.id).await?;
    let regraded = store.list_by_form(&form.id).await?;

    print_changes(&previous, &regraded);

    if let Some(dir) = output {
        std::fs::create_dir_all(&dir)?;
        for response in &regraded {
            let path = dir.join(format!("{}.json", response.id));
            std::fs::write(&path, serde_json::to_string_pretty(response)?)
                .with_context(|| format!("failed to write response to {}", path.display()))?;
        }
        eprintln!("Regraded responses written to: {}", dir.display());
    }

    println!("\n{count} response(s) regraded.");
    Ok(())
}

fn print_changes(
    previous: &HashMap<Uuid, f64>,
    regraded: &[formcraft_core::response::Response],
) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Response", "Before", "After"]);

    for response in regraded {
        let before = previous.get(&response.id).copied().unwrap_or(0.0);
        table.add_row(vec![
            Cell::new(response.id),
            Cell::new(format!("{before:.2}%")),
            Cell::new(format!("{:.2}%", response.percentage_score)),
        ]);
    }

    println!("{table}");
}
