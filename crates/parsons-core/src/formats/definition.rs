//! Structured definition records for exercises and exercise banks.
//!
//! These are the plain records authoring tools produce. Loading converts
//! them into validated [`Exercise`] values; every invariant violation is a
//! [`DefinitionError`] raised here, at load time, never during grading.

use crate::exercise::{Block, DefinitionError, Exercise, Solution, SolutionEntry};
use crate::primitives::{BlockId, Indent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// EXERCISE RECORDS
// =============================================================================

/// Authored record for one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Label unique within the exercise.
    pub id: String,

    /// The code line or snippet.
    pub text: String,

    /// Whether the block belongs to no correct solution.
    #[serde(default)]
    pub distractor: bool,

    /// Authored presentation indent, if any.
    #[serde(default)]
    pub indent: Option<u16>,
}

/// Authored record for one solution position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionEntryDefinition {
    /// The block expected at this position.
    pub id: String,

    /// The indentation expected at this position.
    #[serde(default)]
    pub indent: u16,
}

/// The plain structured record one exercise is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    /// Display title, if any.
    #[serde(default)]
    pub title: Option<String>,

    /// All blocks, distractors included.
    pub blocks: Vec<BlockDefinition>,

    /// Accepted solutions; authoring order is the grading tie-break.
    pub solutions: Vec<Vec<SolutionEntryDefinition>>,
}

/// Load and validate one exercise from its definition record.
pub fn load_exercise(definition: &ExerciseDefinition) -> Result<Exercise, DefinitionError> {
    let blocks = definition
        .blocks
        .iter()
        .map(|block| Block {
            id: BlockId::new(block.id.as_str()),
            text: block.text.clone(),
            distractor: block.distractor,
            indent: block.indent.map(Indent::new),
        })
        .collect();

    let solutions = definition
        .solutions
        .iter()
        .map(|entries| {
            Solution::new(
                entries
                    .iter()
                    .map(|entry| {
                        SolutionEntry::new(BlockId::new(entry.id.as_str()), Indent::new(entry.indent))
                    })
                    .collect(),
            )
        })
        .collect();

    Exercise::new(definition.title.clone(), blocks, solutions)
}

// =============================================================================
// BANK RECORDS
// =============================================================================

/// One named exercise inside a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankEntry {
    /// Stable name the runtime addresses the exercise by.
    pub slug: String,

    /// The exercise definition itself.
    #[serde(flatten)]
    pub exercise: ExerciseDefinition,
}

/// A bank: the set of exercises one lesson ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDefinition {
    /// All exercises, in authoring order.
    pub exercises: Vec<BankEntry>,
}

/// Validated bank keyed by slug, with deterministic iteration order.
#[derive(Debug, Clone)]
pub struct ExerciseBank {
    exercises: BTreeMap<String, Exercise>,
}

impl ExerciseBank {
    /// Validate every entry of a bank definition.
    ///
    /// Fails on the first broken exercise (wrapped with its slug) or on a
    /// duplicated slug.
    pub fn from_definition(definition: &BankDefinition) -> Result<Self, DefinitionError> {
        let mut exercises = BTreeMap::new();

        for entry in &definition.exercises {
            let exercise =
                load_exercise(&entry.exercise).map_err(|source| DefinitionError::InExercise {
                    slug: entry.slug.clone(),
                    source: Box::new(source),
                })?;
            if exercises.insert(entry.slug.clone(), exercise).is_some() {
                return Err(DefinitionError::DuplicateSlug(entry.slug.clone()));
            }
        }

        Ok(Self { exercises })
    }

    /// Look up an exercise by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Exercise> {
        self.exercises.get(slug)
    }

    /// All exercises in slug order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Exercise)> {
        self.exercises
            .iter()
            .map(|(slug, exercise)| (slug.as_str(), exercise))
    }

    /// Number of exercises.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// Whether the bank holds no exercises.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
