use crate::{CellState, RuleTable, rules};

/// A lookup table for a rule table, compiled once per step
///
/// The table is indexed by `state * (max_neighbors + 1) + live_neighbors` and
/// holds the next state of the cell. States the rule does not know about
/// (left over from an earlier multi-state rule) always die.
#[derive(Debug, Clone)]
pub struct TransitionIndex {
    stride: usize,
    table: Vec<CellState>,
}

impl TransitionIndex {
    /// Builds the table by evaluating [`rules::next_state`] for every
    /// state/count pair
    pub fn new(rule: &RuleTable, max_neighbors: u8) -> Self {
        let stride = max_neighbors as usize + 1;
        let table = (0..rule.states())
            .flat_map(|state| {
                (0..=max_neighbors).map(move |count| (CellState(state), count))
            })
            .map(|(state, count)| rules::next_state(state, count, rule))
            .collect();
        Self { stride, table }
    }

    #[inline]
    pub fn next_state(&self, state: CellState, live_neighbors: u8) -> CellState {
        let count = live_neighbors as usize;
        if count >= self.stride {
            return CellState::DEAD;
        }
        self.table
            .get(state.0 as usize * self.stride + count)
            .copied()
            .unwrap_or_default()
    }
}
