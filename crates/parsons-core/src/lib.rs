//! # Parsons Core
//!
//! The deterministic engine for Parsons (block-reordering) exercises.
//!
//! This crate holds the validated exercise model, the seeded presentation
//! shuffler, the grader, and the attempt state machine. Every operation is
//! a pure, terminating computation over in-memory data: no I/O, no async,
//! no wall-clock time. Randomness enters only through explicit seeds, so
//! presentations are reproducible and tests are exact.
//!
//! The three entry points the surrounding runtime uses:
//!
//! - [`load_exercise`] — turn a plain definition record into a validated
//!   [`Exercise`], or a [`DefinitionError`] naming the broken invariant.
//! - [`present`] — the seed-deterministic shuffled block order to render.
//! - [`grade`] — compare a [`Submission`] and produce [`Feedback`];
//!   grading never errors, however malformed the submission.
//!
//! Markup parsing, widget rendering, and persistence of learner progress
//! belong to the surrounding runtime; see `apps/parsons` for the
//! reference CLI and HTTP surface.

pub mod attempt;
pub mod exercise;
pub mod formats;
pub mod grade;
pub mod primitives;
pub mod report;
pub mod shuffle;

pub use attempt::{Attempt, AttemptState, InvalidTransition};
pub use exercise::{Block, DefinitionError, Exercise, Solution, SolutionEntry};
pub use formats::{
    BankDefinition, BankEntry, BlockDefinition, ExerciseBank, ExerciseDefinition,
    SolutionEntryDefinition, load_exercise,
};
pub use grade::{Diagnostic, DiagnosticKind, Feedback, Submission, SubmissionEntry, grade};
pub use primitives::{BlockId, Indent, MAX_BLOCKS, MAX_INDENT, MAX_SHUFFLE_ROUNDS};
pub use report::render_feedback;
pub use shuffle::present;
