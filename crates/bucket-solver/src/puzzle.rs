//! Bucket puzzle representation.
//!
//! A [`BucketState`] is one node of the puzzle graph: the fill level of every
//! bucket, plus a shared handle to the rules (capacities, target, refills)
//! that stay fixed for the whole search.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::search::SearchNode;

/// Fill levels (or capacities), one entry per bucket.
pub type Levels = SmallVec<[u32; 4]>;

/// Reasons a bucket configuration is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BucketError {
    #[display("puzzle has no buckets")]
    NoBuckets,
    #[display("{values} fill levels given for {capacities} buckets")]
    LengthMismatch { values: usize, capacities: usize },
    #[display("bucket {index} has zero capacity")]
    ZeroCapacity { index: usize },
    #[display("bucket {index} holds {value} but its capacity is {capacity}")]
    Overfilled {
        index: usize,
        value: u32,
        capacity: u32,
    },
}

/// Rules shared by every state of one puzzle.
#[derive(Debug, PartialEq, Eq)]
struct Rules {
    capacities: Levels,
    target: u32,
    allow_refills: bool,
}

/// A snapshot of the fill level of every bucket.
///
/// Equality and hashing only look at the fill levels: two states reached by
/// different move sequences are the same node.
#[derive(Debug, Clone)]
pub struct BucketState {
    values: Levels,
    rules: Arc<Rules>,
}

impl BucketState {
    /// Build an initial state, checking that every bucket has a positive
    /// capacity and holds no more than it fits.
    pub fn new(
        values: &[u32],
        capacities: &[u32],
        target: u32,
        allow_refills: bool,
    ) -> Result<Self, BucketError> {
        if capacities.is_empty() {
            return Err(BucketError::NoBuckets);
        }
        if values.len() != capacities.len() {
            return Err(BucketError::LengthMismatch {
                values: values.len(),
                capacities: capacities.len(),
            });
        }
        for (index, (&value, &capacity)) in values.iter().zip(capacities).enumerate() {
            if capacity == 0 {
                return Err(BucketError::ZeroCapacity { index });
            }
            if value > capacity {
                return Err(BucketError::Overfilled {
                    index,
                    value,
                    capacity,
                });
            }
        }

        Ok(Self {
            values: Levels::from_slice(values),
            rules: Arc::new(Rules {
                capacities: Levels::from_slice(capacities),
                target,
                allow_refills,
            }),
        })
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn capacities(&self) -> &[u32] {
        &self.rules.capacities
    }

    pub fn target(&self) -> u32 {
        self.rules.target
    }

    pub fn allows_refills(&self) -> bool {
        self.rules.allow_refills
    }

    /// Check if some bucket holds exactly the target amount
    pub fn is_goal(&self) -> bool {
        self.values.iter().any(|&value| value == self.rules.target)
    }

    /// Every distinct state reachable with a single move.
    ///
    /// Moves are: empty a bucket, fill a bucket to capacity (only when refills
    /// are allowed), or pour one bucket into another until the source is empty
    /// or the destination is full. Moves that change nothing are skipped, and
    /// different moves landing on the same fill levels yield one state. The
    /// order is deterministic: empties and fills first, then pours.
    pub fn neighbors(&self) -> Vec<BucketState> {
        let capacities = &self.rules.capacities;
        let mut seen = HashSet::new();
        let mut neighbors = Vec::new();

        for (i, &value) in self.values.iter().enumerate() {
            if value != 0 {
                self.push_successor(&mut seen, &mut neighbors, self.with_level(i, 0));
            }
            if self.rules.allow_refills && value != capacities[i] {
                self.push_successor(&mut seen, &mut neighbors, self.with_level(i, capacities[i]));
            }
        }

        for (i, &from) in self.values.iter().enumerate() {
            if from == 0 {
                continue;
            }
            for (j, &to) in self.values.iter().enumerate() {
                if i == j {
                    continue;
                }
                let moved = from.min(capacities[j] - to);
                if moved == 0 {
                    continue;
                }
                let mut next = self.values.clone();
                next[i] = from - moved;
                next[j] = to + moved;
                self.push_successor(&mut seen, &mut neighbors, next);
            }
        }

        neighbors
    }

    fn with_level(&self, index: usize, level: u32) -> Levels {
        let mut next = self.values.clone();
        next[index] = level;
        next
    }

    fn push_successor(
        &self,
        seen: &mut HashSet<Levels>,
        neighbors: &mut Vec<BucketState>,
        values: Levels,
    ) {
        if values == self.values || !seen.insert(values.clone()) {
            return;
        }
        neighbors.push(BucketState {
            values,
            rules: Arc::clone(&self.rules),
        });
    }
}

impl PartialEq for BucketState {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for BucketState {}

impl Hash for BucketState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.hash(state);
    }
}

impl fmt::Display for BucketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

impl SearchNode for BucketState {
    fn is_goal(&self) -> bool {
        BucketState::is_goal(self)
    }

    fn neighbors(&self) -> Vec<Self> {
        BucketState::neighbors(self)
    }
}

fn default_allow_refills() -> bool {
    true
}

/// Puzzle description as read from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConfig {
    /// Initial fill levels; all buckets start empty when omitted
    #[serde(default)]
    pub values: Option<Vec<u32>>,
    pub capacities: Vec<u32>,
    pub target: u32,
    #[serde(default = "default_allow_refills")]
    pub allow_refills: bool,
}

impl PuzzleConfig {
    /// Validate the description and build its initial state
    pub fn to_state(&self) -> Result<BucketState, BucketError> {
        match &self.values {
            Some(values) => BucketState::new(
                values,
                &self.capacities,
                self.target,
                self.allow_refills,
            ),
            None => BucketState::new(
                &vec![0; self.capacities.len()],
                &self.capacities,
                self.target,
                self.allow_refills,
            ),
        }
    }
}

impl From<&BucketState> for PuzzleConfig {
    fn from(state: &BucketState) -> Self {
        Self {
            values: Some(state.values().to_vec()),
            capacities: state.capacities().to_vec(),
            target: state.target(),
            allow_refills: state.allows_refills(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(values: &[u32], capacities: &[u32], target: u32, refills: bool) -> BucketState {
        BucketState::new(values, capacities, target, refills).unwrap()
    }

    fn levels(states: &[BucketState]) -> Vec<Vec<u32>> {
        let mut out: Vec<Vec<u32>> = states.iter().map(|s| s.values().to_vec()).collect();
        out.sort();
        out
    }

    #[test]
    fn test_new_rejects_invalid_configurations() {
        assert_eq!(
            BucketState::new(&[], &[], 1, true).unwrap_err(),
            BucketError::NoBuckets
        );
        assert_eq!(
            BucketState::new(&[0], &[5, 3], 4, true).unwrap_err(),
            BucketError::LengthMismatch {
                values: 1,
                capacities: 2
            }
        );
        assert_eq!(
            BucketState::new(&[0, 0], &[5, 0], 4, true).unwrap_err(),
            BucketError::ZeroCapacity { index: 1 }
        );
        assert_eq!(
            BucketState::new(&[6, 0], &[5, 3], 4, true).unwrap_err(),
            BucketError::Overfilled {
                index: 0,
                value: 6,
                capacity: 5
            }
        );
    }

    #[test]
    fn test_neighbors_from_empty() {
        let start = state(&[0, 0], &[5, 3], 4, true);
        assert_eq!(levels(&start.neighbors()), vec![vec![0, 3], vec![5, 0]]);
    }

    #[test]
    fn test_neighbors_covers_all_move_classes() {
        let start = state(&[2, 1], &[5, 3], 4, true);
        assert_eq!(
            levels(&start.neighbors()),
            vec![
                vec![0, 1], // empty 0
                vec![0, 3], // pour 0 -> 1
                vec![2, 0], // empty 1
                vec![2, 3], // fill 1
                vec![3, 0], // pour 1 -> 0
                vec![5, 1], // fill 0
            ]
        );
    }

    #[test]
    fn test_neighbors_without_refills() {
        let start = state(&[8, 0, 0], &[8, 5, 3], 4, false);
        assert_eq!(
            levels(&start.neighbors()),
            vec![vec![0, 0, 0], vec![3, 5, 0], vec![5, 0, 3]]
        );
    }

    #[test]
    fn test_neighbors_skip_fill_of_full_bucket() {
        let start = state(&[3, 0], &[3, 3], 1, true);
        assert_eq!(
            levels(&start.neighbors()),
            vec![vec![0, 0], vec![0, 3], vec![3, 3]]
        );
    }

    #[test]
    fn test_is_goal() {
        assert!(state(&[0, 4], &[5, 4], 4, true).is_goal());
        assert!(!state(&[1, 2], &[5, 4], 4, true).is_goal());
        assert!(state(&[0, 0], &[1, 1], 0, true).is_goal());
    }

    #[test]
    fn test_search_node_delegates() {
        let start = state(&[2, 1], &[5, 3], 1, true);
        assert!(SearchNode::is_goal(&start));
        assert_eq!(SearchNode::neighbors(&start), start.neighbors());
        assert_eq!(crate::search::difficulty(&start), 1);
    }

    #[test]
    fn test_equality_ignores_rules() {
        let a = state(&[1, 2], &[5, 3], 4, true);
        let b = state(&[1, 2], &[9, 9], 7, false);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_display() {
        assert_eq!(state(&[10, 0, 4], &[10, 7, 4], 2, false).to_string(), "(10, 0, 4)");
    }

    #[test]
    fn test_config_defaults() {
        let config: PuzzleConfig =
            serde_json::from_str(r#"{"capacities": [5, 3], "target": 4}"#).unwrap();
        assert!(config.allow_refills);
        let start = config.to_state().unwrap();
        assert_eq!(start.values(), &[0, 0]);
        assert_eq!(start.capacities(), &[5, 3]);
    }

    #[test]
    fn test_config_round_trips_state() {
        let start = state(&[10, 0, 0], &[10, 7, 4], 2, false);
        let config = PuzzleConfig::from(&start);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"allowRefills\":false"));
        let back: PuzzleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_state().unwrap(), start);
    }

    fn arb_state() -> impl Strategy<Value = BucketState> {
        prop::collection::vec(1u32..8, 1..4)
            .prop_flat_map(|capacities| {
                let values = capacities
                    .iter()
                    .map(|&c| 0..=c)
                    .collect::<Vec<_>>();
                (Just(capacities), values, 0u32..10, any::<bool>())
            })
            .prop_map(|(capacities, values, target, refills)| {
                BucketState::new(&values, &capacities, target, refills).unwrap()
            })
    }

    proptest! {
        #[test]
        fn prop_neighbors_respect_capacities(start in arb_state()) {
            for next in start.neighbors() {
                for (&value, &capacity) in next.values().iter().zip(next.capacities()) {
                    prop_assert!(value <= capacity);
                }
            }
        }

        #[test]
        fn prop_neighbors_exclude_self_and_repeats(start in arb_state()) {
            let neighbors = start.neighbors();
            prop_assert!(!neighbors.contains(&start));
            let unique: HashSet<_> = neighbors.iter().collect();
            prop_assert_eq!(unique.len(), neighbors.len());
        }

        #[test]
        fn prop_neighbors_share_rules(start in arb_state()) {
            let total: u32 = start.values().iter().sum();
            for next in start.neighbors() {
                let after: u32 = next.values().iter().sum();
                // Only emptying can lose water, and fills are disabled.
                if !start.allows_refills() {
                    prop_assert!(after <= total);
                }
                prop_assert_eq!(next.target(), start.target());
                prop_assert_eq!(next.allows_refills(), start.allows_refills());
            }
        }
    }
}
