//! # Formats Module
//!
//! Definition records and format conversion for Parsons exercises.
//!
//! This module contains the serde-facing records exercises are authored
//! in, and their conversion into validated engine types.
//!
//! Note: File I/O operations remain in the app layer (apps/parsons).
//! This module only handles format conversion (pure transformations).

mod definition;

pub use definition::*;
