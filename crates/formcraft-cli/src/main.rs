//! formcraft CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "formcraft", version, about = "Quiz form grading and analytics engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission against a form
    Grade {
        /// Path to the form JSON file
        #[arg(long)]
        form: PathBuf,

        /// Path to the submission JSON file
        #[arg(long)]
        submission: PathBuf,

        /// Write the graded response JSON here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Re-grade stored responses against the current form definition
    Regrade {
        /// Path to the form JSON file
        #[arg(long)]
        form: PathBuf,

        /// Graded response JSON file or directory
        #[arg(long)]
        responses: PathBuf,

        /// Directory to write regraded responses into
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compute the analytics report for a form
    Analytics {
        /// Path to the form JSON file
        #[arg(long)]
        form: PathBuf,

        /// Graded response JSON file or directory
        #[arg(long)]
        responses: PathBuf,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report JSON here
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate form JSON files
    Validate {
        /// Path to form file or directory
        #[arg(long)]
        form: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("formcraft=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            form,
            submission,
            output,
            format,
        } => commands::grade::execute(form, submission, output, format).await,
        Commands::Regrade {
            form,
            responses,
            output,
        } => commands::regrade::execute(form, responses, output).await,
        Commands::Analytics {
            form,
            responses,
            format,
            output,
        } => commands::analytics::execute(form, responses, format, output).await,
        Commands::Validate { form } => commands::validate::execute(form),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
