pub mod analytics;
pub mod grade;
pub mod regrade;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use formcraft_core::response::Response;

/// Load graded responses from a JSON file or, recursively, from a
/// directory of `.json` files. A file may hold a single response or an
/// array of them; inside a directory, files that fail to parse are
/// skipped with a warning.
pub(crate) fn load_responses(path: &Path) -> Result<Vec<Response>> {
    if path.is_dir() {
        let mut responses = Vec::new();
        for entry in std::fs::read_dir(path)
            .with_context(|| format!("failed to read directory: {}", path.display()))?
        {
            let entry = entry?;
            let entry_path = entry.path();
            if entry_path.is_dir() {
                responses.extend(load_responses(&entry_path)?);
            } else if entry_path.extension().is_some_and(|ext| ext == "json") {
                match load_response_file(&entry_path) {
                    Ok(loaded) => responses.extend(loaded),
                    Err(e) => {
                        tracing::warn!("skipping {}: {}", entry_path.display(), e);
                    }
                }
            }
        }
        Ok(responses)
    } else {
        load_response_file(path)
    }
}

fn load_response_file(path: &Path) -> Result<Vec<Response>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read response file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse response JSON: {}", path.display()))?;

    let responses = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|r| vec![r])
    }
    .with_context(|| format!("unexpected response shape in {}", path.display()))?;

    Ok(responses)
}
