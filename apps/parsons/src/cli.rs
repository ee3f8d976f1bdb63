//! # CLI Commands
//!
//! Each command is a plain function over paths and options, so the
//! integration tests call them directly instead of spawning a binary.
//!
//! User-facing results go to stdout; diagnostics go through `tracing`
//! (stderr). Learner-facing output never includes the distractor flag.

use parsons_core::{
    BankDefinition, BlockId, DefinitionError, ExerciseBank, Feedback, Indent, Submission,
    SubmissionEntry, grade, load_exercise, present, render_feedback,
};
use serde_json::json;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Spaces per indentation step in the text submission format.
const INDENT_WIDTH: usize = 4;

// =============================================================================
// ERRORS
// =============================================================================

/// Failures surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Underlying file I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An exercise definition violated an authoring invariant.
    #[error("definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// The bank holds no exercise with the requested slug.
    #[error("no exercise with slug `{0}` in this bank")]
    UnknownExercise(String),

    /// The submission format flag is not one of the supported names.
    #[error("unknown submission format `{0}` (expected `json` or `text`)")]
    UnknownFormat(String),

    /// A line of a text submission could not be parsed.
    #[error("malformed submission line `{0}`")]
    MalformedLine(String),

    /// `check` found invalid exercises; stdout lists them.
    #[error("{0} exercise(s) failed validation")]
    InvalidBank(usize),
}

// =============================================================================
// BANK LOADING
// =============================================================================

/// Read and validate an exercise bank from a JSON file.
pub fn load_bank(path: &Path) -> Result<ExerciseBank, CliError> {
    debug!(path = %path.display(), "loading exercise bank");
    let content = std::fs::read_to_string(path)?;
    let definition: BankDefinition = serde_json::from_str(&content)?;
    Ok(ExerciseBank::from_definition(&definition)?)
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Validate every exercise in a bank, reporting per-exercise status.
///
/// All exercises are checked even after a failure, so authors see every
/// problem in one run.
pub fn cmd_check(bank_path: &Path) -> Result<(), CliError> {
    let content = std::fs::read_to_string(bank_path)?;
    let definition: BankDefinition = serde_json::from_str(&content)?;

    let mut failures = 0usize;
    for entry in &definition.exercises {
        match load_exercise(&entry.exercise) {
            Ok(exercise) => {
                println!(
                    "ok    {} ({} blocks, {} solutions)",
                    entry.slug,
                    exercise.block_count(),
                    exercise.solution_count()
                );
            }
            Err(error) => {
                failures = failures.saturating_add(1);
                println!("error {}: {}", entry.slug, error);
            }
        }
    }

    if failures > 0 {
        return Err(CliError::InvalidBank(failures));
    }

    // Per-exercise checks passed; this catches duplicated slugs.
    let bank = ExerciseBank::from_definition(&definition)?;
    info!(exercises = bank.len(), "bank is valid");
    Ok(())
}

// =============================================================================
// PRESENT COMMAND
// =============================================================================

/// Print the shuffled presentation of one exercise.
pub fn cmd_present(bank_path: &Path, slug: &str, seed: u64, json: bool) -> Result<(), CliError> {
    let bank = load_bank(bank_path)?;
    let exercise = bank
        .get(slug)
        .ok_or_else(|| CliError::UnknownExercise(slug.to_string()))?;

    let blocks = present(exercise, seed);

    if json {
        // Learner-facing payload: no distractor flag.
        let payload = json!({
            "slug": slug,
            "seed": seed,
            "blocks": blocks
                .iter()
                .map(|block| {
                    json!({
                        "id": block.id.as_str(),
                        "text": block.text,
                        "indent": block.indent.map(Indent::level),
                    })
                })
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        if let Some(title) = exercise.title() {
            println!("# {title}");
        }
        for block in &blocks {
            println!("[{}] {}", block.id, block.text);
        }
    }

    Ok(())
}

// =============================================================================
// GRADE COMMAND
// =============================================================================

/// Grade a submission file against one exercise and print the feedback.
///
/// Returns the feedback so the caller can map the verdict to an exit
/// code. Malformed block ids inside a well-formed file are not errors;
/// the grader classifies them.
pub fn cmd_grade(
    bank_path: &Path,
    slug: &str,
    submission_path: &Path,
    format: &str,
    json: bool,
) -> Result<Feedback, CliError> {
    let bank = load_bank(bank_path)?;
    let exercise = bank
        .get(slug)
        .ok_or_else(|| CliError::UnknownExercise(slug.to_string()))?;

    let raw = std::fs::read_to_string(submission_path)?;
    let submission = match format {
        "json" => serde_json::from_str::<Submission>(&raw)?,
        "text" => parse_text_submission(&raw)?,
        other => return Err(CliError::UnknownFormat(other.to_string())),
    };

    debug!(slug, placed = submission.len(), "grading submission");
    let feedback = grade(exercise, &submission);

    if json {
        println!("{}", serde_json::to_string_pretty(&feedback)?);
    } else {
        print!("{}", render_feedback(exercise, &feedback));
    }

    Ok(feedback)
}

/// Parse the text submission format: one block id per line, indented by
/// `INDENT_WIDTH` spaces per level. Blank lines are skipped.
fn parse_text_submission(raw: &str) -> Result<Submission, CliError> {
    let mut entries = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let id = line.trim_start_matches(' ');
        if id.contains(char::is_whitespace) {
            return Err(CliError::MalformedLine(line.to_string()));
        }
        let indent = (line.len().saturating_sub(id.len())) / INDENT_WIDTH;
        entries.push(SubmissionEntry::new(
            BlockId::new(id),
            Indent::new(indent as u16),
        ));
    }

    Ok(Submission::new(entries))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_submission_parses_indentation() {
        let submission = parse_text_submission("a\n    b\n        c\n").ok();
        let levels: Option<Vec<u16>> = submission
            .as_ref()
            .map(|s| s.entries().iter().map(|e| e.indent.level()).collect());

        assert_eq!(levels, Some(vec![0, 1, 2]));
    }

    #[test]
    fn text_submission_skips_blank_lines() {
        let submission = parse_text_submission("a\n\n    b\n").ok();
        assert_eq!(submission.map(|s| s.len()), Some(2));
    }

    #[test]
    fn text_submission_rejects_embedded_whitespace() {
        let result = parse_text_submission("a b\n");
        assert!(matches!(result, Err(CliError::MalformedLine(_))));
    }
}
