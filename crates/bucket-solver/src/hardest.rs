//! Finding the hardest puzzle in a family.
//!
//! Each puzzle in the family is solved independently, so the searches run in
//! parallel. The winner is then picked in enumeration order: when several
//! puzzles tie for the longest solution, the first one listed is reported.

use rayon::prelude::*;

use crate::puzzle::{BucketError, BucketState};
use crate::search::{breadth_first_search, SearchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum HardestError {
    #[display("cannot pick a maximum from an empty collection")]
    EmptyDomain,
}

/// Return the element with the greatest key, keeping the first one on ties.
pub fn argmax<T, K, F>(domain: &[T], mut key: F) -> Result<&T, HardestError>
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    let (first, rest) = domain.split_first().ok_or(HardestError::EmptyDomain)?;
    let mut best = first;
    let mut best_key = key(first);
    for item in rest {
        let item_key = key(item);
        if item_key > best_key {
            best = item;
            best_key = item_key;
        }
    }
    Ok(best)
}

/// All two-bucket puzzles starting empty with both capacities in
/// `1..=max_capacity` and a target in `0..=max_capacity`, refills allowed.
///
/// Puzzles are listed in `(first capacity, second capacity, target)` order.
pub fn two_bucket_family(max_capacity: u32) -> Result<Vec<BucketState>, BucketError> {
    let mut family = Vec::new();
    for first in 1..=max_capacity {
        for second in 1..=max_capacity {
            for target in 0..=max_capacity {
                family.push(BucketState::new(&[0, 0], &[first, second], target, true)?);
            }
        }
    }
    Ok(family)
}

/// The puzzle with the longest shortest solution, and that solution.
#[derive(Debug, Clone)]
pub struct Hardest {
    pub puzzle: BucketState,
    pub solution: SearchResult<BucketState>,
}

impl Hardest {
    /// Number of states on the solution path
    pub fn difficulty(&self) -> usize {
        self.solution.path.len()
    }
}

/// Solve every puzzle in `family` and return the one whose solution path is
/// longest.
pub fn hardest_puzzle(family: &[BucketState]) -> Result<Hardest, HardestError> {
    log::info!("solving {} puzzles", family.len());

    let solved: Vec<(&BucketState, SearchResult<BucketState>)> = family
        .par_iter()
        .map(|puzzle| (puzzle, breadth_first_search(puzzle)))
        .collect();

    let (puzzle, solution) = argmax(&solved, |(_, solution)| solution.path.len())?;
    log::info!(
        "hardest puzzle: start {} capacities {:?} target {} ({} states)",
        puzzle,
        puzzle.capacities(),
        puzzle.target(),
        solution.path.len()
    );

    Ok(Hardest {
        puzzle: (*puzzle).clone(),
        solution: solution.clone(),
    })
}
