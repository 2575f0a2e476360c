//! Hash utilities for exact row signatures.
//!
//! A row signature folds the normalized value of every compared, non-empty cell together
//! with its column index. Two rows with equal signatures are treated as identical by the
//! sequence aligner. Signatures are not re-verified cell by cell, so a 64-bit collision
//! would pair two different rows.

use crate::normalize::{Normalizer, value_at};
use std::hash::{Hash, Hasher};
use xxhash_rust::xxh64::Xxh64;

pub(crate) const XXH64_SEED: u64 = 0;
const HASH_MIX_CONSTANT: u64 = 0x9e3779b97f4a7c15;

pub(crate) type RowSignature = u64;

pub(crate) fn hash_cell_contribution(col: usize, value: &str) -> u64 {
    let mut hasher = Xxh64::new(XXH64_SEED);
    (col as u64).hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

pub(crate) fn mix_hash(hash: u64) -> u64 {
    hash.rotate_left(13) ^ HASH_MIX_CONSTANT
}

pub(crate) fn combine_hashes(current: u64, contribution: u64) -> u64 {
    current.wrapping_add(mix_hash(contribution))
}

/// Signature of one normalized row. Trailing empty cells and ignored columns do not
/// contribute, so `["a", ""]` and `["a"]` share a signature.
pub(crate) fn row_signature(row: &[String], normalizer: &Normalizer) -> RowSignature {
    (0..row.len())
        .filter(|&col| !normalizer.is_ignored(col))
        .map(|col| (col, value_at(row, col)))
        .filter(|(_, value)| !value.is_empty())
        .fold(0u64, |acc, (col, value)| {
            combine_hashes(acc, hash_cell_contribution(col, value))
        })
}
