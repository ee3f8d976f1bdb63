//! # Exercise Model
//!
//! The validated exercise: authored blocks plus accepted solutions.
//!
//! All authoring invariants are checked once, at construction time. An
//! exercise that violates any of them never exists as a value, so the
//! shuffler and the grader can assume a well-formed block set.

use crate::primitives::{BlockId, Indent, MAX_BLOCKS, MAX_INDENT};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

// =============================================================================
// BLOCK
// =============================================================================

/// A single reorderable unit of code shown to the learner.
///
/// Distractor blocks are part of the presented set but never part of any
/// accepted solution. The optional indent is the authored presentation
/// default; accepted solutions pin indentation explicitly per position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Identifier, unique within the exercise.
    pub id: BlockId,

    /// The code line or snippet the learner sees.
    pub text: String,

    /// Whether this block belongs to no correct solution.
    #[serde(default)]
    pub distractor: bool,

    /// Authored presentation indent, if any.
    #[serde(default)]
    pub indent: Option<Indent>,
}

impl Block {
    /// Create a non-distractor block with no authored indent.
    #[must_use]
    pub fn new(id: impl Into<BlockId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            distractor: false,
            indent: None,
        }
    }

    /// Create a distractor block.
    #[must_use]
    pub fn distractor(id: impl Into<BlockId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            distractor: true,
            indent: None,
        }
    }

    /// Set the authored presentation indent.
    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = Some(indent);
        self
    }
}

// =============================================================================
// SOLUTION
// =============================================================================

/// One position of an accepted solution: which block, at which indent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionEntry {
    /// The block expected at this position.
    pub id: BlockId,

    /// The indentation expected at this position.
    pub indent: Indent,
}

impl SolutionEntry {
    /// Create a solution entry.
    #[must_use]
    pub fn new(id: impl Into<BlockId>, indent: Indent) -> Self {
        Self {
            id: id.into(),
            indent,
        }
    }
}

/// An accepted solution: the full ordered sequence of non-distractor
/// blocks, with indentation, that counts as completely correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    entries: Vec<SolutionEntry>,
}

impl Solution {
    /// Create a solution from ordered entries.
    #[must_use]
    pub fn new(entries: Vec<SolutionEntry>) -> Self {
        Self { entries }
    }

    /// The ordered entries.
    #[must_use]
    pub fn entries(&self) -> &[SolutionEntry] {
        &self.entries
    }

    /// The entry at a position, if the solution is that long.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&SolutionEntry> {
        self.entries.get(position)
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the solution has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// DEFINITION ERRORS
// =============================================================================

/// Authoring-time validation failures.
///
/// These are fatal: an exercise that fails any of these checks must never
/// be presented to a learner. Grading itself never produces an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The exercise declares no blocks at all.
    #[error("exercise declares no blocks")]
    NoBlocks,

    /// The exercise exceeds the block budget.
    #[error("exercise declares {0} blocks, maximum is {MAX_BLOCKS}")]
    TooManyBlocks(usize),

    /// Two blocks share an id.
    #[error("duplicate block id `{0}`")]
    DuplicateBlock(BlockId),

    /// The exercise declares no accepted solutions, so it is unsolvable.
    #[error("exercise declares no accepted solutions")]
    NoSolutions,

    /// An accepted solution has no positions.
    #[error("solution {index} is empty")]
    EmptySolution {
        /// Authoring index of the solution.
        index: usize,
    },

    /// A solution references a block the exercise does not declare.
    #[error("solution {index} references unknown block `{id}`")]
    UnknownSolutionBlock {
        /// Authoring index of the solution.
        index: usize,
        /// The unknown id.
        id: BlockId,
    },

    /// A solution includes a distractor block.
    #[error("solution {index} includes distractor block `{id}`")]
    DistractorInSolution {
        /// Authoring index of the solution.
        index: usize,
        /// The distractor's id.
        id: BlockId,
    },

    /// A solution lists the same block at two positions.
    #[error("solution {index} lists block `{id}` more than once")]
    RepeatedSolutionBlock {
        /// Authoring index of the solution.
        index: usize,
        /// The repeated id.
        id: BlockId,
    },

    /// A non-distractor block appears in no accepted solution.
    #[error("block `{0}` appears in no accepted solution")]
    UnusedBlock(BlockId),

    /// An indentation value exceeds the authoring bound.
    #[error("indentation {indent} on block `{id}` exceeds the maximum of {MAX_INDENT}")]
    IndentOutOfRange {
        /// The block the value was attached to.
        id: BlockId,
        /// The out-of-range level.
        indent: u16,
    },

    /// Two exercises in one bank share a slug.
    #[error("duplicate exercise slug `{0}`")]
    DuplicateSlug(String),

    /// A bank entry failed validation; the slug says which one.
    #[error("exercise `{slug}`: {source}")]
    InExercise {
        /// Slug of the failing exercise.
        slug: String,
        /// The underlying failure.
        #[source]
        source: Box<DefinitionError>,
    },
}

// =============================================================================
// EXERCISE
// =============================================================================

/// One Parsons exercise: authored blocks plus accepted solutions.
///
/// Immutable once constructed. The authored block order is preserved (the
/// shuffler permutes a copy), and an id index allows ordered lookups
/// without scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    title: Option<String>,
    blocks: Vec<Block>,
    index: BTreeMap<BlockId, usize>,
    solutions: Vec<Solution>,
}

impl Exercise {
    /// Build an exercise, checking every authoring invariant.
    ///
    /// Returns the first violated invariant as a [`DefinitionError`].
    /// Checks run here, at load time, never at grading time.
    pub fn new(
        title: Option<String>,
        blocks: Vec<Block>,
        solutions: Vec<Solution>,
    ) -> Result<Self, DefinitionError> {
        if blocks.is_empty() {
            return Err(DefinitionError::NoBlocks);
        }
        if blocks.len() > MAX_BLOCKS {
            return Err(DefinitionError::TooManyBlocks(blocks.len()));
        }

        let mut index = BTreeMap::new();
        for (position, block) in blocks.iter().enumerate() {
            if index.insert(block.id.clone(), position).is_some() {
                return Err(DefinitionError::DuplicateBlock(block.id.clone()));
            }
            if let Some(indent) = block.indent {
                if !indent.in_range() {
                    return Err(DefinitionError::IndentOutOfRange {
                        id: block.id.clone(),
                        indent: indent.level(),
                    });
                }
            }
        }

        if solutions.is_empty() {
            return Err(DefinitionError::NoSolutions);
        }

        let mut used: BTreeSet<BlockId> = BTreeSet::new();
        for (solution_index, solution) in solutions.iter().enumerate() {
            if solution.is_empty() {
                return Err(DefinitionError::EmptySolution {
                    index: solution_index,
                });
            }

            let mut seen: BTreeSet<&BlockId> = BTreeSet::new();
            for entry in solution.entries() {
                let Some(&block_position) = index.get(&entry.id) else {
                    return Err(DefinitionError::UnknownSolutionBlock {
                        index: solution_index,
                        id: entry.id.clone(),
                    });
                };
                if blocks[block_position].distractor {
                    return Err(DefinitionError::DistractorInSolution {
                        index: solution_index,
                        id: entry.id.clone(),
                    });
                }
                if !seen.insert(&entry.id) {
                    return Err(DefinitionError::RepeatedSolutionBlock {
                        index: solution_index,
                        id: entry.id.clone(),
                    });
                }
                if !entry.indent.in_range() {
                    return Err(DefinitionError::IndentOutOfRange {
                        id: entry.id.clone(),
                        indent: entry.indent.level(),
                    });
                }
                used.insert(entry.id.clone());
            }
        }

        // Every non-distractor block must be reachable through some solution.
        for block in &blocks {
            if !block.distractor && !used.contains(&block.id) {
                return Err(DefinitionError::UnusedBlock(block.id.clone()));
            }
        }

        Ok(Self {
            title,
            blocks,
            index,
            solutions,
        })
    }

    /// The authored title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// All blocks in authored order, distractors included.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Look up a block by id.
    #[must_use]
    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.index.get(id).map(|&position| &self.blocks[position])
    }

    /// Whether the id names a distractor block.
    ///
    /// Unknown ids are not distractors; the grader classifies them as
    /// wrong blocks.
    #[must_use]
    pub fn is_distractor(&self, id: &BlockId) -> bool {
        self.block(id).is_some_and(|block| block.distractor)
    }

    /// Accepted solutions in authoring order.
    #[must_use]
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Number of blocks, distractors included.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of accepted solutions.
    #[must_use]
    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(ids: &[&str]) -> Solution {
        Solution::new(
            ids.iter()
                .map(|id| SolutionEntry::new(*id, Indent::ZERO))
                .collect(),
        )
    }

    #[test]
    fn valid_exercise_constructs() {
        let exercise = Exercise::new(
            Some("sum".into()),
            vec![
                Block::new("a", "def f(n):"),
                Block::new("b", "    return 1").with_indent(Indent::new(1)),
                Block::distractor("c", "    return 0"),
            ],
            vec![solution(&["a", "b"])],
        );

        assert!(exercise.is_ok());
        let exercise = exercise.ok();
        assert_eq!(exercise.as_ref().map(Exercise::block_count), Some(3));
        assert_eq!(exercise.as_ref().map(Exercise::solution_count), Some(1));
    }

    #[test]
    fn no_blocks_rejected() {
        let result = Exercise::new(None, vec![], vec![solution(&[])]);
        assert_eq!(result.err(), Some(DefinitionError::NoBlocks));
    }

    #[test]
    fn no_solutions_rejected() {
        let result = Exercise::new(None, vec![Block::new("a", "x = 1")], vec![]);
        assert_eq!(result.err(), Some(DefinitionError::NoSolutions));
    }

    #[test]
    fn empty_solution_rejected() {
        let result = Exercise::new(None, vec![Block::new("a", "x = 1")], vec![solution(&[])]);
        assert_eq!(result.err(), Some(DefinitionError::EmptySolution { index: 0 }));
    }

    #[test]
    fn duplicate_block_id_rejected() {
        let result = Exercise::new(
            None,
            vec![Block::new("a", "x = 1"), Block::new("a", "y = 2")],
            vec![solution(&["a"])],
        );
        assert_eq!(
            result.err(),
            Some(DefinitionError::DuplicateBlock(BlockId::new("a")))
        );
    }

    #[test]
    fn unknown_solution_block_rejected() {
        let result = Exercise::new(
            None,
            vec![Block::new("a", "x = 1")],
            vec![solution(&["a", "ghost"])],
        );
        assert_eq!(
            result.err(),
            Some(DefinitionError::UnknownSolutionBlock {
                index: 0,
                id: BlockId::new("ghost"),
            })
        );
    }

    #[test]
    fn distractor_in_solution_rejected() {
        let result = Exercise::new(
            None,
            vec![Block::new("a", "x = 1"), Block::distractor("d", "x = 2")],
            vec![solution(&["a", "d"])],
        );
        assert_eq!(
            result.err(),
            Some(DefinitionError::DistractorInSolution {
                index: 0,
                id: BlockId::new("d"),
            })
        );
    }

    #[test]
    fn repeated_solution_block_rejected() {
        let result = Exercise::new(
            None,
            vec![Block::new("a", "x = 1"), Block::new("b", "y = 2")],
            vec![solution(&["a", "b", "a"])],
        );
        assert_eq!(
            result.err(),
            Some(DefinitionError::RepeatedSolutionBlock {
                index: 0,
                id: BlockId::new("a"),
            })
        );
    }

    #[test]
    fn unused_block_rejected() {
        let result = Exercise::new(
            None,
            vec![Block::new("a", "x = 1"), Block::new("b", "y = 2")],
            vec![solution(&["a"])],
        );
        assert_eq!(
            result.err(),
            Some(DefinitionError::UnusedBlock(BlockId::new("b")))
        );
    }

    #[test]
    fn unused_distractor_allowed() {
        let result = Exercise::new(
            None,
            vec![Block::new("a", "x = 1"), Block::distractor("d", "x = 2")],
            vec![solution(&["a"])],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn out_of_range_indent_rejected() {
        let result = Exercise::new(
            None,
            vec![Block::new("a", "x = 1").with_indent(Indent::new(MAX_INDENT + 1))],
            vec![solution(&["a"])],
        );
        assert_eq!(
            result.err(),
            Some(DefinitionError::IndentOutOfRange {
                id: BlockId::new("a"),
                indent: MAX_INDENT + 1,
            })
        );
    }

    #[test]
    fn out_of_range_solution_indent_rejected() {
        let result = Exercise::new(
            None,
            vec![Block::new("a", "x = 1")],
            vec![Solution::new(vec![SolutionEntry::new(
                "a",
                Indent::new(MAX_INDENT + 1),
            )])],
        );
        assert_eq!(
            result.err(),
            Some(DefinitionError::IndentOutOfRange {
                id: BlockId::new("a"),
                indent: MAX_INDENT + 1,
            })
        );
    }

    #[test]
    fn lookup_by_id() {
        let exercise = Exercise::new(
            None,
            vec![Block::new("a", "x = 1"), Block::distractor("d", "x = 2")],
            vec![solution(&["a"])],
        )
        .ok();

        let block = exercise.as_ref().and_then(|e| e.block(&BlockId::new("a")));
        assert_eq!(block.map(|b| b.text.as_str()), Some("x = 1"));

        assert_eq!(
            exercise.as_ref().map(|e| e.is_distractor(&BlockId::new("d"))),
            Some(true)
        );
        assert_eq!(
            exercise
                .as_ref()
                .map(|e| e.is_distractor(&BlockId::new("nope"))),
            Some(false)
        );
    }
}
