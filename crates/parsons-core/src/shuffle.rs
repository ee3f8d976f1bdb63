//! # Shuffler
//!
//! Deterministic presentation ordering for an exercise's blocks.
//!
//! The same seed always produces the same ordering, on every platform, so
//! presentations are reproducible in tests and replayable by the runtime.
//! Distractors are always part of the presented set.

use crate::exercise::{Block, Exercise};
use crate::primitives::{BlockId, MAX_SHUFFLE_ROUNDS};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Produce the presentation order for an exercise's blocks.
///
/// The result is always a permutation of the full block set, distractors
/// included. Whenever an alternative ordering exists, the result never
/// spells out an accepted solution once restricted to non-distractor
/// blocks, so the presentation cannot telegraph an answer.
///
/// Seeded `ChaCha8` keeps this a pure function of `(exercise, seed)`.
#[must_use]
pub fn present(exercise: &Exercise, seed: u64) -> Vec<Block> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<Block> = exercise.blocks().to_vec();
    if order.len() < 2 {
        return order;
    }

    for _ in 0..MAX_SHUFFLE_ROUNDS {
        order.shuffle(&mut rng);
        if !spells_out_solution(exercise, &order) {
            return order;
        }
    }

    // Every draw landed on a solution order. Transposing two
    // non-distractor blocks is the smallest change that alters the
    // restricted sequence; scan the pairs deterministically.
    let real_positions: Vec<usize> = order
        .iter()
        .enumerate()
        .filter(|(_, block)| !block.distractor)
        .map(|(position, _)| position)
        .collect();

    for (offset, &first) in real_positions.iter().enumerate() {
        for &second in &real_positions[offset + 1..] {
            order.swap(first, second);
            if !spells_out_solution(exercise, &order) {
                return order;
            }
            order.swap(first, second);
        }
    }

    // Every transposition is itself an accepted order (e.g. a single
    // non-distractor block). There is nothing left to hide.
    order
}

/// True when the order, restricted to non-distractor blocks, matches the
/// id sequence of any accepted solution.
fn spells_out_solution(exercise: &Exercise, order: &[Block]) -> bool {
    let restricted: Vec<&BlockId> = order
        .iter()
        .filter(|block| !block.distractor)
        .map(|block| &block.id)
        .collect();

    exercise.solutions().iter().any(|solution| {
        solution.len() == restricted.len()
            && solution
                .entries()
                .iter()
                .zip(&restricted)
                .all(|(entry, id)| entry.id == **id)
    })
}

// =============================================================================
// TESTS
// =============================================================================
