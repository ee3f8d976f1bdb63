//! Binary entry point: argument parsing, logging setup, dispatch.

use clap::{Parser, Subcommand};
use parsons::{api, cli};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Exit code for a graded-but-incorrect submission, distinct from
/// operational failures.
const EXIT_INCORRECT: u8 = 1;

/// Exit code for operational failures (bad files, unknown slugs, ...).
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(
    name = "parsons",
    version,
    about = "Parsons exercise runner: validate, present, grade, serve"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate every exercise in a bank.
    Check {
        /// Path to the bank JSON file.
        bank: PathBuf,
    },

    /// Print the shuffled presentation of one exercise.
    Present {
        /// Path to the bank JSON file.
        bank: PathBuf,

        /// Slug of the exercise to present.
        #[arg(long)]
        exercise: String,

        /// Shuffle seed; the same seed always yields the same order.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Emit JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Grade a submission file against one exercise.
    Grade {
        /// Path to the bank JSON file.
        bank: PathBuf,

        /// Slug of the exercise to grade against.
        #[arg(long)]
        exercise: String,

        /// Path to the submission file.
        #[arg(long)]
        submission: PathBuf,

        /// Submission file format: `json` or `text`.
        #[arg(long, default_value = "text")]
        format: String,

        /// Emit the feedback as JSON instead of a text report.
        #[arg(long)]
        json: bool,
    },

    /// Serve the grading API over HTTP.
    Serve {
        /// Path to the bank JSON file.
        bank: PathBuf,

        /// Listen address.
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let arguments = Cli::parse();
    let result = match arguments.command {
        Command::Check { bank } => cli::cmd_check(&bank).map(|()| ExitCode::SUCCESS),

        Command::Present {
            bank,
            exercise,
            seed,
            json,
        } => cli::cmd_present(&bank, &exercise, seed, json).map(|()| ExitCode::SUCCESS),

        Command::Grade {
            bank,
            exercise,
            submission,
            format,
            json,
        } => cli::cmd_grade(&bank, &exercise, &submission, &format, json).map(|feedback| {
            if feedback.is_correct() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_INCORRECT)
            }
        }),

        Command::Serve { bank, addr } => api::serve(&bank, &addr).await.map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
