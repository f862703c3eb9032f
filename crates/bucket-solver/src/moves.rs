//! Naming the move behind each step of a solution path.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::puzzle::BucketState;

/// A single legal move. Bucket indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Move {
    Fill { bucket: usize },
    Empty { bucket: usize },
    Pour { from: usize, to: usize },
}

impl Move {
    /// Recover the move that turns `before` into `after`, if a single legal
    /// move does.
    pub fn between(before: &BucketState, after: &BucketState) -> Option<Move> {
        let capacities = before.capacities();
        let old = before.values();
        let new = after.values();
        if old.len() != new.len() {
            return None;
        }

        let changed: Vec<usize> = (0..old.len()).filter(|&i| old[i] != new[i]).collect();
        match changed[..] {
            [bucket] if new[bucket] == 0 => Some(Move::Empty { bucket }),
            [bucket] if new[bucket] == capacities[bucket] && before.allows_refills() => {
                Some(Move::Fill { bucket })
            }
            [a, b] => {
                let (from, to) = if new[a] < old[a] { (a, b) } else { (b, a) };
                let moved = old[from].min(capacities[to] - old[to]);
                let legal = moved > 0
                    && new[from] == old[from] - moved
                    && new[to] == old[to] + moved;
                legal.then_some(Move::Pour { from, to })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Fill { bucket } => write!(f, "fill bucket {bucket}"),
            Move::Empty { bucket } => write!(f, "empty bucket {bucket}"),
            Move::Pour { from, to } => write!(f, "pour bucket {from} into bucket {to}"),
        }
    }
}

/// The moves along a path, one per consecutive pair of states.
///
/// Returns `None` if two consecutive states are not one legal move apart.
pub fn describe_path(path: &[BucketState]) -> Option<Vec<Move>> {
    path.windows(2)
        .map(|pair| Move::between(&pair[0], &pair[1]))
        .collect()
}
