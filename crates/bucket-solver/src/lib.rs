//! Shortest-path solver for water bucket puzzles.
//!
//! Given buckets of fixed capacity, a starting fill level for each and a
//! target amount, the solver finds the fewest fill/empty/pour moves that leave
//! the target amount in some bucket. The breadth-first search itself is
//! generic over [`SearchNode`], and [`hardest_puzzle`] searches a family of
//! puzzles for the one needing the most moves.

pub mod hardest;
pub mod moves;
pub mod puzzle;
pub mod search;

// Re-export main types
pub use hardest::{argmax, hardest_puzzle, two_bucket_family, Hardest, HardestError};
pub use moves::{describe_path, Move};
pub use puzzle::{BucketError, BucketState, Levels, PuzzleConfig};
pub use search::{
    breadth_first_search, difficulty, reconstruct_path, Predecessor, PredecessorMap, SearchError,
    SearchNode, SearchResult,
};
