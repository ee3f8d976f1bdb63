//! # Report Module
//!
//! Plain-text rendering of grading feedback for terminal display.
//!
//! The grader returns raw structure only; every formatting decision lives
//! here, so callers that want JSON or their own widgets never pay for it.

use crate::exercise::Exercise;
use crate::grade::{Diagnostic, DiagnosticKind, Feedback};

/// Render feedback as a plain-text panel.
///
/// The exercise is consulted to echo the text of the offending block, so
/// learners see the code line, not just an id.
#[must_use]
pub fn render_feedback(exercise: &Exercise, feedback: &Feedback) -> String {
    let mut output = String::new();

    output.push_str("┌─────────────────────────────────────┐\n");

    match feedback {
        Feedback::Correct => {
            output.push_str("│ VERDICT: correct                    │\n");
            output.push_str("├─────────────────────────────────────┤\n");
            output.push_str("│ - every block in place              │\n");
        }
        Feedback::Incorrect { diagnostic } => {
            output.push_str("│ VERDICT: incorrect                  │\n");
            output.push_str("├─────────────────────────────────────┤\n");
            output.push_str(&format!(
                "│ - at position {}: {}\n",
                diagnostic.index,
                diagnostic.kind.as_str()
            ));
            output.push_str(&format!("│ - {}\n", describe(diagnostic.kind)));

            if let Some(line) = offending_line(exercise, diagnostic) {
                output.push_str(&format!("│ - placed there: {}\n", line));
            }
        }
    }

    output.push_str("└─────────────────────────────────────┘\n");

    output
}

/// Learner-facing explanation for a diagnostic kind.
fn describe(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::WrongIndentation => "right block, wrong indentation",
        DiagnosticKind::DistractorPresent => "this block belongs to no correct program",
        DiagnosticKind::WrongBlock => "a different block is expected here",
        DiagnosticKind::ExtraBlock => "the program is already complete before this block",
        DiagnosticKind::MissingBlock => "the program stops too early; more blocks are needed",
    }
}

/// The text of the submitted block at the divergence, when known.
fn offending_line<'a>(exercise: &'a Exercise, diagnostic: &Diagnostic) -> Option<&'a str> {
    let id = diagnostic.block.as_ref()?;
    exercise.block(id).map(|block| block.text.trim())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{Block, Solution, SolutionEntry};
    use crate::grade::{Submission, SubmissionEntry, grade};
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

    #[test]
    fn correct_report_mentions_verdict() {
        let exercise = exercise();
        let text = render_feedback(&exercise, &Feedback::Correct);
        assert!(text.contains("VERDICT: correct"));
    }

    #[test]
    fn incorrect_report_names_kind_and_position() {
        let exercise = exercise();
        let submission = Submission::new(vec![
            SubmissionEntry::new("a", Indent::ZERO),
            SubmissionEntry::new("c", Indent::new(1)),
        ]);
        let text = render_feedback(&exercise, &grade(&exercise, &submission));

        assert!(text.contains("VERDICT: incorrect"));
        assert!(text.contains("at position 1: distractor-present"));
        assert!(text.contains("return 0"));
    }

    #[test]
    fn missing_block_report_has_no_offending_line() {
        let exercise = exercise();
        let submission = Submission::new(vec![SubmissionEntry::new("a", Indent::ZERO)]);
        let text = render_feedback(&exercise, &grade(&exercise, &submission));

        assert!(text.contains("missing-block"));
        assert!(!text.contains("placed there"));
    }
}
