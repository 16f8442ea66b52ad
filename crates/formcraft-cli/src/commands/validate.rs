//! The `formcraft validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(form_path: PathBuf) -> Result<()> {
    let forms = if form_path.is_dir() {
        formcraft_core::parser::load_form_directory(&form_path)?
    } else {
        vec![formcraft_core::parser::parse_form(&form_path)?]
    };

    let mut total_warnings = 0;

    for form in &forms {
        println!("Form: {} ({} questions)", form.title, form.questions.len());

        let warnings = formcraft_core::parser::validate_form(form);
        for w in &warnings {
            let prefix = w
                .question_index
                .map(|i| format!("  [question {}]", i + 1))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All forms valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
