//! # Grader
//!
//! Pure comparison of a learner submission against an exercise's accepted
//! solutions.
//!
//! Grading never errors: any submission, however malformed (missing
//! blocks, duplicate ids, unknown ids), degrades to an `Incorrect` verdict
//! with a positional diagnostic. The learner-facing surface reads a
//! diagnostic, never a crash.

use crate::exercise::{Exercise, Solution};
use crate::primitives::{BlockId, Indent};
use serde::{Deserialize, Serialize};

// =============================================================================
// SUBMISSION
// =============================================================================

/// One position of a learner submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEntry {
    /// The block the learner placed at this position.
    pub id: BlockId,

    /// The indentation the learner chose.
    #[serde(default)]
    pub indent: Indent,
}

impl SubmissionEntry {
    /// Create a submission entry.
    #[must_use]
    pub fn new(id: impl Into<BlockId>, indent: Indent) -> Self {
        Self {
            id: id.into(),
            indent,
        }
    }
}

/// A learner-proposed ordering of presented blocks.
///
/// Submissions are created fresh per attempt and discarded after feedback
/// is produced; nothing here is retained by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    entries: Vec<SubmissionEntry>,
}

impl Submission {
    /// Create a submission from ordered entries.
    #[must_use]
    pub fn new(entries: Vec<SubmissionEntry>) -> Self {
        Self { entries }
    }

    /// Normalize `(id, indent)` pairs into a submission.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (BlockId, Indent)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(id, indent)| SubmissionEntry { id, indent })
                .collect(),
        }
    }

    /// The ordered entries.
    #[must_use]
    pub fn entries(&self) -> &[SubmissionEntry] {
        &self.entries
    }

    /// Number of placed blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the learner placed no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// FEEDBACK
// =============================================================================

/// How a submission diverges from the best-matching accepted solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Right block at this position, wrong indentation.
    WrongIndentation,

    /// The submitted block is a distractor.
    DistractorPresent,

    /// A different non-distractor block is expected at this position.
    WrongBlock,

    /// The submission continues past the end of the solution.
    ExtraBlock,

    /// The submission stops before the solution is complete.
    MissingBlock,
}

impl DiagnosticKind {
    /// The kebab-case wire name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WrongIndentation => "wrong-indentation",
            Self::DistractorPresent => "distractor-present",
            Self::WrongBlock => "wrong-block",
            Self::ExtraBlock => "extra-block",
            Self::MissingBlock => "missing-block",
        }
    }
}

/// Positional diagnostic for an incorrect submission.
///
/// Points at a single actionable place: the first position where the
/// submission diverges from the accepted solution it got closest to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Index of the first divergence.
    pub index: usize,

    /// What went wrong at that index.
    pub kind: DiagnosticKind,

    /// The submitted block at the divergence, when there is one.
    pub block: Option<BlockId>,

    /// Authoring index of the best-matching accepted solution.
    pub solution: usize,
}

/// Verdict of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum Feedback {
    /// The submission matches an accepted solution exactly.
    Correct,

    /// The submission diverges; the diagnostic says where and how.
    Incorrect {
        /// Single-point divergence report.
        diagnostic: Diagnostic,
    },
}

impl Feedback {
    /// Whether the verdict is `Correct`.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

// =============================================================================
// GRADING
// =============================================================================

/// Grade a submission against the exercise's accepted solutions.
///
/// A submission is `Correct` iff it is identical (by id and indentation,
/// in order, same length) to at least one accepted solution. Otherwise
/// the diagnostic is computed against the solution sharing the longest
/// common prefix with the submission; ties go to the solution listed
/// first by the author.
#[must_use]
pub fn grade(exercise: &Exercise, submission: &Submission) -> Feedback {
    let mut best_solution = 0usize;
    let mut best_prefix = 0usize;

    for (solution_index, solution) in exercise.solutions().iter().enumerate() {
        let prefix = common_prefix(submission, solution);
        if prefix == submission.len() && prefix == solution.len() {
            return Feedback::Correct;
        }
        // Strictly longer wins; equal keeps the earlier-authored solution.
        if prefix > best_prefix || solution_index == 0 {
            best_solution = solution_index;
            best_prefix = prefix;
        }
    }

    Feedback::Incorrect {
        diagnostic: classify(exercise, submission, best_solution, best_prefix),
    }
}

/// Length of the shared `(id, indent)` prefix.
fn common_prefix(submission: &Submission, solution: &Solution) -> usize {
    submission
        .entries()
        .iter()
        .zip(solution.entries())
        .take_while(|(got, expected)| got.id == expected.id && got.indent == expected.indent)
        .count()
}

/// Classify the first divergence against the best-matching solution.
fn classify(
    exercise: &Exercise,
    submission: &Submission,
    solution_index: usize,
    index: usize,
) -> Diagnostic {
    let solution = &exercise.solutions()[solution_index];
    let (kind, block) = match (submission.entries().get(index), solution.get(index)) {
        (Some(got), Some(expected)) => {
            let kind = if got.id == expected.id {
                DiagnosticKind::WrongIndentation
            } else if exercise.is_distractor(&got.id) {
                DiagnosticKind::DistractorPresent
            } else {
                DiagnosticKind::WrongBlock
            };
            (kind, Some(got.id.clone()))
        }
        (Some(got), None) => (DiagnosticKind::ExtraBlock, Some(got.id.clone())),
        (None, _) => (DiagnosticKind::MissingBlock, None),
    };

    Diagnostic {
        index,
        kind,
        block,
        solution: solution_index,
    }
}

// =============================================================================
// TESTS
// =============================================================================
