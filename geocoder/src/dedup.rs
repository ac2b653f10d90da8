//! Order-preserving deduplication by place id.
//!
//! The geo-encoder may return one place several times under different administrative
//! groupings; the first occurrence wins and the relative order of first occurrences is kept.

use crate::candidate::LocationCandidate;
use std::collections::HashSet;

/// Keeps the first candidate for each distinct `place_id`.
pub fn dedup_by_place(candidates: Vec<LocationCandidate>) -> Vec<LocationCandidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.place_id))
        .collect()
}
