//! Breadth-first search over an implicit graph.
//!
//! The search only talks to nodes through [`SearchNode`], so it works for any
//! puzzle that can test for a goal and list its one-move successors. Nodes are
//! identified by their `Eq`/`Hash` implementation.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::time::Instant;

/// A node of a graph explored by [`breadth_first_search`].
pub trait SearchNode: Clone + Eq + Hash {
    /// Whether this node ends the search
    fn is_goal(&self) -> bool;

    /// Distinct nodes reachable in one step
    fn neighbors(&self) -> Vec<Self>;
}

/// How a discovered node was first reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predecessor<N> {
    /// The node the search started from
    Origin,
    /// The node whose expansion discovered this one
    Node(N),
}

/// Every discovered node mapped to the node that first discovered it.
pub type PredecessorMap<N> = HashMap<N, Predecessor<N>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SearchError {
    #[display("node was never discovered by the search")]
    UnknownNode,
    #[display("predecessor links form a cycle")]
    CyclicPredecessors,
}

/// Result of a search
#[derive(Debug, Clone)]
pub struct SearchResult<N> {
    /// Nodes from the start to the first goal found, both included.
    /// Empty when no goal is reachable.
    pub path: Vec<N>,
    /// Distinct nodes discovered, the start included
    pub states_discovered: usize,
    /// Nodes taken off the queue
    pub states_expanded: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl<N> SearchResult<N> {
    pub fn is_solved(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of moves on the path (one less than its length)
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn goal(&self) -> Option<&N> {
        self.path.last()
    }
}

/// Find a shortest path from `initial` to a goal node.
///
/// Nodes are recorded on first discovery and never revisited, so the first
/// goal taken off the queue is at minimum distance. If `initial` is already a
/// goal the path holds just that node; if the reachable graph has no goal the
/// path is empty.
pub fn breadth_first_search<N: SearchNode>(initial: &N) -> SearchResult<N> {
    let start_time = Instant::now();

    let mut predecessors: PredecessorMap<N> = HashMap::new();
    predecessors.insert(initial.clone(), Predecessor::Origin);

    let mut queue: VecDeque<N> = VecDeque::new();
    queue.push_back(initial.clone());

    let mut states_expanded: usize = 0;
    let mut path = Vec::new();

    while let Some(state) = queue.pop_front() {
        states_expanded += 1;

        if state.is_goal() {
            // The map built here is acyclic and holds every queued node.
            path = reconstruct_path(&state, &predecessors).unwrap_or_default();
            break;
        }

        for next in state.neighbors() {
            if let Entry::Vacant(slot) = predecessors.entry(next.clone()) {
                slot.insert(Predecessor::Node(state.clone()));
                queue.push_back(next);
            }
        }
        log::trace!(
            "expanded {} states, {} queued",
            states_expanded,
            queue.len()
        );
    }

    let result = SearchResult {
        path,
        states_discovered: predecessors.len(),
        states_expanded,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    };
    log::debug!(
        "search finished: solved={} moves={} discovered={} expanded={}",
        result.is_solved(),
        result.moves(),
        result.states_discovered,
        result.states_expanded
    );
    result
}

/// Walk predecessor links back from `goal` to the origin and return the path
/// in start-to-goal order.
///
/// Fails if `goal` or a node on its chain is missing from the map, or if the
/// links loop instead of reaching [`Predecessor::Origin`].
pub fn reconstruct_path<N: Clone + Eq + Hash>(
    goal: &N,
    predecessors: &PredecessorMap<N>,
) -> Result<Vec<N>, SearchError> {
    let mut link = predecessors.get(goal).ok_or(SearchError::UnknownNode)?;
    let mut path = vec![goal.clone()];
    while let Predecessor::Node(previous) = link {
        // A chain longer than the map must revisit a node.
        if path.len() >= predecessors.len() {
            return Err(SearchError::CyclicPredecessors);
        }
        path.push(previous.clone());
        link = predecessors
            .get(previous)
            .ok_or(SearchError::UnknownNode)?;
    }
    path.reverse();
    Ok(path)
}

/// Number of states on the shortest solution path, or 0 if there is none.
pub fn difficulty<N: SearchNode>(initial: &N) -> usize {
    breadth_first_search(initial).path.len()
}
