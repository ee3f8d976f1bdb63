//! # Attempt State Machine
//!
//! One learner's lifecycle through presenting, submitting, and grading a
//! single exercise instance.
//!
//! Attempts are independent value objects with no shared state; any number
//! of them may be graded concurrently without locking. Retry policy
//! (bounding the number of retries) belongs to the surrounding runner; the
//! machine itself supports unlimited re-grading of fresh submissions.

use crate::exercise::Exercise;
use crate::grade::{Feedback, Submission, grade};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// STATES
// =============================================================================

/// Lifecycle states of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptState {
    /// Shuffled blocks shown; no submission captured yet.
    Presented,

    /// A submission is captured and waiting to be graded.
    Submitted,

    /// A correct submission was graded; the attempt is finished.
    Graded,
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Presented => "presented",
            Self::Submitted => "submitted",
            Self::Graded => "graded",
        };
        f.write_str(name)
    }
}

// =============================================================================
// INVALID TRANSITIONS
// =============================================================================

/// Runtime misuse of the attempt lifecycle by the caller.
///
/// The valid transitions are `Presented --submit--> Submitted` and
/// `Submitted --grade--> Graded | Presented`. Everything else fails here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    /// `submit` was called while a submission is already pending.
    #[error("cannot submit: the previous submission has not been graded")]
    SubmissionPending,

    /// `submit` or `grade` was called on a finished attempt.
    #[error("cannot continue: the attempt was already graded correct")]
    AlreadyCorrect,

    /// `grade` was called with no submission captured.
    #[error("cannot grade: no submission captured")]
    NothingToGrade,
}

// =============================================================================
// ATTEMPT
// =============================================================================

/// One learner's attempt at one exercise.
///
/// An incorrect grade returns the machine to `Presented` so a fresh
/// submission can be captured; a correct grade is terminal.
#[derive(Debug, Clone)]
pub struct Attempt {
    state: AttemptState,
    submission: Option<Submission>,
    last_feedback: Option<Feedback>,
    retries: u32,
}

impl Attempt {
    /// Start an attempt in the `Presented` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: AttemptState::Presented,
            submission: None,
            last_feedback: None,
            retries: 0,
        }
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Feedback from the most recent grading, if any.
    #[must_use]
    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    /// Number of incorrect submissions graded so far.
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Whether the attempt reached the terminal correct state.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == AttemptState::Graded
    }

    /// Capture the learner's ordering.
    ///
    /// Valid only in `Presented`.
    pub fn submit(&mut self, submission: Submission) -> Result<(), InvalidTransition> {
        match self.state {
            AttemptState::Presented => {
                self.submission = Some(submission);
                self.state = AttemptState::Submitted;
                Ok(())
            }
            AttemptState::Submitted => Err(InvalidTransition::SubmissionPending),
            AttemptState::Graded => Err(InvalidTransition::AlreadyCorrect),
        }
    }

    /// Grade the captured submission against the exercise.
    ///
    /// Correct feedback finishes the attempt; incorrect feedback returns
    /// the machine to `Presented` and counts a retry. Valid only in
    /// `Submitted`.
    pub fn grade(&mut self, exercise: &Exercise) -> Result<Feedback, InvalidTransition> {
        match self.state {
            AttemptState::Submitted => {}
            AttemptState::Presented => return Err(InvalidTransition::NothingToGrade),
            AttemptState::Graded => return Err(InvalidTransition::AlreadyCorrect),
        }

        let Some(submission) = self.submission.take() else {
            return Err(InvalidTransition::NothingToGrade);
        };

        let feedback = grade(exercise, &submission);
        if feedback.is_correct() {
            self.state = AttemptState::Graded;
        } else {
            self.state = AttemptState::Presented;
            self.retries = self.retries.saturating_add(1);
        }
        self.last_feedback = Some(feedback.clone());

        Ok(feedback)
    }
}

impl Default for Attempt {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{Block, Solution, SolutionEntry};
    use crate::grade::{Submission, SubmissionEntry};
    use crate::primitives::Indent;

    fn exercise() -> Exercise {
        Exercise::new(
            None,
            vec![
                Block::new("a", "def f(n):"),
                Block::new("b", "    return 1"),
                Block::distractor("c", "    return 0"),
            ],
            vec![Solution::new(vec![
                SolutionEntry::new("a", Indent::ZERO),
                SolutionEntry::new("b", Indent::new(1)),
            ])],
        )
        .expect("exercise is valid")
    }

    fn correct() -> Submission {
        Submission::new(vec![
            SubmissionEntry::new("a", Indent::ZERO),
            SubmissionEntry::new("b", Indent::new(1)),
        ])
    }

    fn wrong() -> Submission {
        Submission::new(vec![
            SubmissionEntry::new("a", Indent::ZERO),
            SubmissionEntry::new("c", Indent::new(1)),
        ])
    }

    #[test]
    fn happy_path_reaches_terminal_state() {
        let exercise = exercise();
        let mut attempt = Attempt::new();
        assert_eq!(attempt.state(), AttemptState::Presented);

        assert_eq!(attempt.submit(correct()), Ok(()));
        assert_eq!(attempt.state(), AttemptState::Submitted);

        let feedback = attempt.grade(&exercise);
        assert_eq!(feedback.map(|f| f.is_correct()), Ok(true));
        assert!(attempt.is_complete());
        assert_eq!(attempt.retries(), 0);
    }

    #[test]
    fn incorrect_grade_returns_to_presented() {
        let exercise = exercise();
        let mut attempt = Attempt::new();

        assert_eq!(attempt.submit(wrong()), Ok(()));
        let feedback = attempt.grade(&exercise);
        assert_eq!(feedback.map(|f| f.is_correct()), Ok(false));

        assert_eq!(attempt.state(), AttemptState::Presented);
        assert_eq!(attempt.retries(), 1);
        assert!(attempt.last_feedback().is_some());
    }

    #[test]
    fn retry_after_incorrect_can_succeed() {
        let exercise = exercise();
        let mut attempt = Attempt::new();

        assert_eq!(attempt.submit(wrong()), Ok(()));
        assert!(attempt.grade(&exercise).is_ok());

        assert_eq!(attempt.submit(correct()), Ok(()));
        let feedback = attempt.grade(&exercise);
        assert_eq!(feedback.map(|f| f.is_correct()), Ok(true));
        assert!(attempt.is_complete());
        assert_eq!(attempt.retries(), 1);
    }

    #[test]
    fn grade_before_submit_is_invalid() {
        let exercise = exercise();
        let mut attempt = Attempt::new();
        assert_eq!(
            attempt.grade(&exercise),
            Err(InvalidTransition::NothingToGrade)
        );
    }

    #[test]
    fn double_submit_is_invalid() {
        let mut attempt = Attempt::new();
        assert_eq!(attempt.submit(wrong()), Ok(()));
        assert_eq!(
            attempt.submit(correct()),
            Err(InvalidTransition::SubmissionPending)
        );
    }

    #[test]
    fn terminal_state_rejects_everything() {
        let exercise = exercise();
        let mut attempt = Attempt::new();
        assert_eq!(attempt.submit(correct()), Ok(()));
        assert!(attempt.grade(&exercise).is_ok());

        assert_eq!(
            attempt.submit(wrong()),
            Err(InvalidTransition::AlreadyCorrect)
        );
        assert_eq!(
            attempt.grade(&exercise),
            Err(InvalidTransition::AlreadyCorrect)
        );
    }

    #[test]
    fn retries_count_each_incorrect_grade() {
        let exercise = exercise();
        let mut attempt = Attempt::new();

        for expected in 1..=3 {
            assert_eq!(attempt.submit(wrong()), Ok(()));
            assert!(attempt.grade(&exercise).is_ok());
            assert_eq!(attempt.retries(), expected);
        }
    }
}
