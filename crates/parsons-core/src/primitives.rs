//! # Primitives
//!
//! Shared identifier and value types for the Parsons engine.
//!
//! Everything here is small, ordered, and serializable so it can key
//! `BTreeMap`s and travel through the definition formats unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// COMPUTATIONAL BOUNDS
// =============================================================================

/// Maximum number of blocks a single exercise may declare.
///
/// Parsons exercises are short programs; a definition exceeding this is an
/// authoring mistake, not a bigger exercise.
pub const MAX_BLOCKS: usize = 64;

/// Maximum indentation level accepted from authors and learners.
pub const MAX_INDENT: u16 = 16;

/// Maximum number of fresh shuffle draws before the shuffler falls back to
/// deterministic transpositions.
pub const MAX_SHUFFLE_ROUNDS: usize = 16;

// =============================================================================
// BLOCK IDENTIFIER
// =============================================================================

/// Identifier of a single code block within one exercise.
///
/// Ids are short author-chosen labels (`"a"`, `"ret0"`). They are only
/// meaningful within the exercise that declares them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Create a block id from a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for BlockId {
    fn from(label: String) -> Self {
        Self(label)
    }
}

// =============================================================================
// INDENTATION LEVEL
// =============================================================================

/// Indentation level of a block, in logical steps (not spaces).
///
/// Non-negativity is structural; the upper bound (`MAX_INDENT`) is checked
/// when a definition is loaded.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Indent(u16);

impl Indent {
    /// No indentation.
    pub const ZERO: Self = Self(0);

    /// Create an indentation level.
    #[must_use]
    pub fn new(level: u16) -> Self {
        Self(level)
    }

    /// The level as an integer.
    #[must_use]
    pub fn level(self) -> u16 {
        self.0
    }

    /// Whether the level is within the authoring bound.
    #[must_use]
    pub fn in_range(self) -> bool {
        self.0 <= MAX_INDENT
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_ids_order_by_label() {
        let a = BlockId::new("a");
        let b = BlockId::new("b");
        assert!(a < b);
        assert_eq!(a.as_str(), "a");
    }

    #[test]
    fn indent_range_check() {
        assert!(Indent::ZERO.in_range());
        assert!(Indent::new(MAX_INDENT).in_range());
        assert!(!Indent::new(MAX_INDENT + 1).in_range());
    }

    #[test]
    fn display_forms() {
        assert_eq!(BlockId::new("ret0").to_string(), "ret0");
        assert_eq!(Indent::new(3).to_string(), "3");
    }
}
