//! The sparse cell store that owns the current generation.

use crate::{
    CellState, Config, Coord, Delta, Error, Geometry, Result, RuleTable, engine::GridWindow,
};
use std::collections::{HashMap, hash_map};
use tracing::info;

/// Sparse mapping from coordinate to non-dead cell state.
///
/// A coordinate absent from the store is dead; a dead cell is never stored.
/// Coordinates are stored in their normalized form (wrapped on a torus,
/// verified on a clipped grid).
#[derive(Debug, Clone)]
pub struct GridStore {
    pub(crate) config: Config,
    pub(crate) geometry: Geometry,
    pub(crate) cells: HashMap<Coord, CellState>,
    pub(crate) generation: u64,
    pub(crate) last_delta: Option<Delta>,
}

impl GridStore {
    /// Creates an empty store at generation 0
    pub fn new(config: Config) -> Result<Self> {
        let geometry = config.geometry()?;
        info!(
            shape = %config.shape,
            adjacency = %config.adjacency,
            width = config.width,
            height = config.height,
            rules = %config.rules,
            "configured grid"
        );
        Ok(Self {
            config,
            geometry,
            cells: HashMap::new(),
            generation: 0,
            last_delta: None,
        })
    }

    /// Applies a new configuration.
    ///
    /// If only the rules change, the cells and generation are kept. Any
    /// change to the layout rebuilds the coordinate mapping, so the store is
    /// emptied and reset to generation 0.
    pub fn reconfigure(&mut self, config: Config) -> Result<()> {
        if self.config.same_layout(&config) {
            self.set_rules(config.rules);
            return Ok(());
        }
        *self = Self::new(config)?;
        Ok(())
    }

    /// Swaps the rule table used by the next [`GridStore::step`].
    ///
    /// Cells in a dying state the new rule does not have are removed, so
    /// the store only ever holds states its rule can produce. If any are
    /// removed, the recorded delta is dropped.
    pub fn set_rules(&mut self, rules: RuleTable) {
        let states = rules.states();
        let before = self.cells.len();
        self.cells.retain(|_, state| state.0 < states);
        let dropped = before - self.cells.len();
        if dropped > 0 {
            self.last_delta = None;
        }

        info!(rules = %rules, dropped, "rules changed");
        self.config.rules = rules;
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }
    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
    #[inline]
    pub fn rules(&self) -> &RuleTable {
        &self.config.rules
    }
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of stored (non-dead) cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    #[inline]
    pub fn alive_count(&self) -> usize {
        self.cells.values().filter(|s| s.is_alive()).count()
    }

    /// The state at `coord`; dead if unset or outside a clipped grid
    pub fn get(&self, coord: Coord) -> CellState {
        self.geometry
            .resolve(coord)
            .and_then(|c| self.cells.get(&c).copied())
            .unwrap_or_default()
    }

    /// Sets a single cell. Setting a cell dead removes it.
    ///
    /// This edits the current generation in place: the generation number
    /// stays the same and the recorded delta is dropped, since it no longer
    /// leads to the current state.
    pub fn set(&mut self, coord: Coord, state: CellState) -> Result<()> {
        let coord = self.check_cell(coord, state, true)?;
        if state.is_dead() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, state);
        }
        self.last_delta = None;
        Ok(())
    }

    /// Replaces the content with `pattern` (all alive) and restarts at generation 0.
    ///
    /// Nothing changes if any coordinate is rejected by the bounds policy.
    pub fn seed<I: IntoIterator<Item = Coord>>(&mut self, pattern: I) -> Result<()> {
        let cells = pattern
            .into_iter()
            .map(|c| self.geometry.normalize(c).map(|c| (c, CellState::ALIVE)))
            .collect::<Result<HashMap<_, _>>>()?;

        info!(cells = cells.len(), "seeded grid");
        self.cells = cells;
        self.generation = 0;
        self.last_delta = None;
        Ok(())
    }

    /// Coordinates of every alive cell.
    ///
    /// The order is unspecified but stable until the store is next mutated,
    /// and the iterator can be cloned to restart it.
    pub fn live_cells(&self) -> impl Iterator<Item = Coord> + Clone + '_ {
        self.cells
            .iter()
            .filter(|(_, s)| s.is_alive())
            .map(|(&c, _)| c)
    }

    /// Every stored cell with its state, including multi-state dying cells
    pub fn cells(&self) -> Cells<'_> {
        Cells {
            inner: self.cells.iter(),
        }
    }

    /// All stored cells in row-major order
    pub fn sorted_cells(&self) -> Vec<(Coord, CellState)> {
        let mut cells: Vec<_> = self.cells().collect();
        cells.sort_unstable();
        cells
    }

    /// The delta that produced the current generation, if it is known
    #[inline]
    pub fn last_delta(&self) -> Option<&Delta> {
        self.last_delta.as_ref()
    }

    /// A view of the cells in `[top_left, bottom_right)`
    pub fn window(&self, top_left: Coord, bottom_right: Coord) -> GridWindow<'_> {
        GridWindow::new(self, top_left, bottom_right)
    }

    /// Validates a cell against the bounds policy and the rule's state count,
    /// returning its normalized coordinate.
    pub(crate) fn check_cell(&self, coord: Coord, state: CellState, allow_dead: bool) -> Result<Coord> {
        let states = self.config.rules.states();
        if (!allow_dead && state.is_dead()) || state.0 >= states {
            return Err(Error::InvalidCellState {
                coord,
                state: state.0,
                states,
            });
        }
        self.geometry.normalize(coord)
    }
}

/// Iterator over the stored cells of a [`GridStore`]
#[derive(Clone)]
pub struct Cells<'a> {
    inner: hash_map::Iter<'a, Coord, CellState>,
}
impl Iterator for Cells<'_> {
    type Item = (Coord, CellState);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&c, &s)| (c, s))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
impl ExactSizeIterator for Cells<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoundsPolicy, TileShape};

    fn store(bounds: BoundsPolicy) -> GridStore {
        GridStore::new(Config::new(TileShape::Square, 8, 8).with_bounds(bounds)).unwrap()
    }

    #[test]
    fn absent_cells_are_dead() {
        let grid = store(BoundsPolicy::Unbounded);

        assert_eq!(grid.get(Coord::new(3, 3)), CellState::DEAD);
        assert!(grid.is_empty());
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn setting_dead_removes_entry() {
        let mut grid = store(BoundsPolicy::Unbounded);
        let c = Coord::new(-5, 100);

        grid.set(c, CellState::ALIVE).unwrap();
        assert_eq!(grid.get(c), CellState::ALIVE);
        assert_eq!(grid.len(), 1);

        grid.set(c, CellState::DEAD).unwrap();
        assert_eq!(grid.get(c), CellState::DEAD);
        assert!(grid.is_empty());
    }

    #[test]
    fn clip_rejects_outside_coordinates() {
        let mut grid = store(BoundsPolicy::Clip);

        let err = grid.set(Coord::new(8, 0), CellState::ALIVE).unwrap_err();
        assert!(matches!(err, Error::OutOfBoundsCoordinate { width: 8, height: 8, .. }));

        // a failing seed leaves the previous content alone
        grid.seed([Coord::new(1, 1)]).unwrap();
        assert!(grid.seed([Coord::new(2, 2), Coord::new(-1, 0)]).is_err());
        assert_eq!(grid.live_cells().collect::<Vec<_>>(), vec![Coord::new(1, 1)]);
    }

    #[test]
    fn wrap_normalizes_coordinates() {
        let mut grid = store(BoundsPolicy::Wrap);

        grid.set(Coord::new(-1, 9), CellState::ALIVE).unwrap();
        assert_eq!(grid.get(Coord::new(7, 1)), CellState::ALIVE);
        assert_eq!(grid.get(Coord::new(-1, 9)), CellState::ALIVE);
        assert_eq!(grid.live_cells().next(), Some(Coord::new(7, 1)));
    }

    #[test]
    fn rejects_states_beyond_rule() {
        let mut grid = store(BoundsPolicy::Unbounded);

        assert!(grid.set(Coord::zero(), CellState(2)).is_err());

        grid.set_rules(RuleTable::brians_brain());
        grid.set(Coord::zero(), CellState(2)).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.alive_count(), 0);
        assert_eq!(grid.live_cells().count(), 0);
    }

    #[test]
    fn rule_swap_drops_unknown_states() {
        let mut grid = store(BoundsPolicy::Unbounded);
        grid.set_rules(RuleTable::brians_brain());
        grid.seed([Coord::new(1, 1), Coord::new(2, 1)]).unwrap();
        grid.step().unwrap();
        assert_eq!(grid.get(Coord::new(1, 1)), CellState(2));
        assert!(grid.last_delta().is_some());

        grid.set_rules(RuleTable::conway());
        assert!(grid.cells().all(|(_, s)| s.is_alive()));
        assert_eq!(grid.get(Coord::new(1, 1)), CellState::DEAD);
        assert!(grid.last_delta().is_none());
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn live_cells_is_restartable() {
        let mut grid = store(BoundsPolicy::Unbounded);
        grid.seed([Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)]).unwrap();

        let cells = grid.live_cells();
        let first: Vec<_> = cells.clone().collect();
        let second: Vec<_> = cells.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn reconfigure_keeps_cells_for_rule_changes() {
        let mut grid = store(BoundsPolicy::Unbounded);
        grid.seed([Coord::new(0, 0)]).unwrap();

        let config = grid.config().clone().with_rules(RuleTable::high_life());
        grid.reconfigure(config).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.rules(), &RuleTable::high_life());

        let config = grid.config().clone().with_bounds(BoundsPolicy::Clip);
        grid.reconfigure(config).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.geometry().bounds(), BoundsPolicy::Clip);
    }
}
