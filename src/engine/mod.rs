mod index;
mod window;

pub use self::index::TransitionIndex;
pub use self::window::{GridWindow, glyph};
use crate::{BoundsPolicy, Cell, CellState, Coord, Delta, Error, Geometry, GridStore, Result, RuleTable};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Every cell whose state may change this generation: stored cells plus the
/// neighbors of alive cells.
///
/// A rule that gives birth on 0 neighbors can wake any dead cell, so on a
/// bounded grid every cell is a candidate.
fn candidates(
    cells: &HashMap<Coord, CellState>,
    geometry: &Geometry,
    birth_on_zero: bool,
) -> Vec<Coord> {
    if birth_on_zero {
        let (w, h) = (geometry.width() as i32, geometry.height() as i32);
        return (0..h)
            .flat_map(|row| (0..w).map(move |col| Coord::new(col, row)))
            .collect();
    }

    let mut set: HashSet<Coord> = HashSet::with_capacity(cells.len() * 4);
    for (&coord, state) in cells {
        set.insert(coord);
        if state.is_alive() {
            set.extend(geometry.neighbors(coord));
        }
    }
    set.into_iter().collect()
}

/// Counts the alive neighbors of `coord` in the pre-step cells
#[inline]
fn live_neighbors(cells: &HashMap<Coord, CellState>, geometry: &Geometry, coord: Coord) -> u8 {
    geometry
        .neighbors(coord)
        .filter(|n| cells.get(n).is_some_and(|s| s.is_alive()))
        .count() as u8
}

/// Computes the transition of `coord`, if it changes
#[inline]
fn transition(
    cells: &HashMap<Coord, CellState>,
    geometry: &Geometry,
    index: &TransitionIndex,
    coord: Coord,
) -> Option<Cell> {
    let current = cells.get(&coord).copied().unwrap_or_default();
    let next = index.next_state(current, live_neighbors(cells, geometry, coord));
    (next != current).then(|| Cell::new(coord, next))
}

/// Computes the delta from the current generation of `store` to the next
/// under `rules`, without modifying the store.
///
/// Every read goes to the pre-step cells, so the result does not depend on
/// the order in which candidates are visited.
pub fn next_delta(store: &GridStore, rules: &RuleTable, parallel: bool) -> Result<Delta> {
    let geometry = store.geometry();
    if let Err(err) = rules.validate(geometry.shape(), geometry.adjacency()) {
        warn!(rules = %rules, "rejected rule table");
        return Err(err);
    }
    let birth_on_zero = rules.births_on(0);
    if birth_on_zero && geometry.bounds() == BoundsPolicy::Unbounded {
        return Err(Error::UnboundedBirth {
            rule: rules.to_string(),
        });
    }

    let index = TransitionIndex::new(rules, geometry.max_neighbors());
    let cells = &store.cells;
    let candidates = candidates(cells, geometry, birth_on_zero);

    let mut changes: Vec<Cell> = if parallel {
        candidates
            .par_iter()
            .filter_map(|&c| transition(cells, geometry, &index, c))
            .collect()
    } else {
        candidates
            .iter()
            .filter_map(|&c| transition(cells, geometry, &index, c))
            .collect()
    };
    changes.sort_unstable();

    let (removed, added): (Vec<Cell>, Vec<Cell>) =
        changes.into_iter().partition(|cell| cell.state.is_dead());
    let from = store.generation();
    debug!(
        generation = from,
        candidates = candidates.len(),
        added = added.len(),
        removed = removed.len(),
        "computed generation"
    );

    Ok(Delta {
        from,
        to: from + 1,
        added,
        removed: removed.into_iter().map(|cell| cell.coord).collect(),
    })
}

impl GridStore {
    /// Advances one generation under the store's rule table and returns what changed.
    ///
    /// Fails with [`Error::InvalidRuleTable`] if the rules mention more
    /// neighbors than the geometry has; the store is then left as it was.
    pub fn step(&mut self) -> Result<Delta> {
        let delta = next_delta(self, &self.config.rules, false)?;
        self.commit(delta.clone());
        Ok(delta)
    }

    /// Like [`GridStore::step`], but evaluates candidates on the rayon thread pool.
    ///
    /// The result is identical to [`GridStore::step`].
    pub fn step_parallel(&mut self) -> Result<Delta> {
        let delta = next_delta(self, &self.config.rules, true)?;
        self.commit(delta.clone());
        Ok(delta)
    }

    /// Advances one generation under `rules` instead of the configured rule table
    pub fn step_with(&mut self, rules: &RuleTable) -> Result<Delta> {
        let delta = next_delta(self, rules, false)?;
        self.commit(delta.clone());
        Ok(delta)
    }

    /// Writes a delta computed from the current generation
    fn commit(&mut self, delta: Delta) {
        for coord in &delta.removed {
            self.cells.remove(coord);
        }
        for cell in &delta.added {
            self.cells.insert(cell.coord, cell.state);
        }
        self.generation = delta.to;
        self.last_delta = Some(delta);
    }
}
