//! Full snapshots and single-step deltas, plus their import/export on a
//! [`GridStore`].
//!
//! Wire form (JSON):
//! ```text
//! generation: {"shape":"square","width":8,"height":8,"adjacency":"moore",
//!              "cells":[[col,row,state],...],"generation":12}
//! delta:      {"from":12,"to":13,"added":[[col,row,state],...],"removed":[[col,row],...]}
//! ```

use crate::{Adjacency, CellState, Coord, Error, GridStore, Result, TileShape, error::Layout};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// A coordinate and its state, serialized as `[col, row, state]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32, u8)", into = "(i32, i32, u8)")]
pub struct Cell {
    pub coord: Coord,
    pub state: CellState,
}
impl Cell {
    #[inline]
    pub fn new(coord: Coord, state: CellState) -> Self {
        Self { coord, state }
    }
    #[inline]
    pub fn alive(coord: Coord) -> Self {
        Self::new(coord, CellState::ALIVE)
    }
}
impl From<(i32, i32, u8)> for Cell {
    #[inline]
    fn from((col, row, state): (i32, i32, u8)) -> Self {
        Self::new(Coord::new(col, row), CellState(state))
    }
}
impl From<Cell> for (i32, i32, u8) {
    #[inline]
    fn from(cell: Cell) -> Self {
        (cell.coord.col, cell.coord.row, cell.state.0)
    }
}

/// A complete simulation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub shape: TileShape,
    pub width: u32,
    pub height: u32,
    pub adjacency: Adjacency,
    /// Non-dead cells in row-major order
    pub cells: Vec<Cell>,
    pub generation: u64,
}

impl Generation {
    pub fn layout(&self) -> Layout {
        Layout {
            shape: self.shape,
            width: self.width,
            height: self.height,
            adjacency: self.adjacency,
        }
    }

    /// Advances this snapshot by `delta`, e.g. to replay a delta log.
    ///
    /// `removed` is applied before `added`, so a coordinate listed in both
    /// ends up with its `added` state.
    pub fn apply(&mut self, delta: &Delta) -> Result<()> {
        delta.check_base(self.generation)?;

        let mut cells: HashMap<Coord, CellState> =
            self.cells.iter().map(|c| (c.coord, c.state)).collect();
        for coord in &delta.removed {
            cells.remove(coord);
        }
        for cell in &delta.added {
            if cell.state.is_dead() {
                cells.remove(&cell.coord);
            } else {
                cells.insert(cell.coord, cell.state);
            }
        }

        let mut cells: Vec<_> = cells.into_iter().map(|(c, s)| Cell::new(c, s)).collect();
        cells.sort_unstable();
        self.cells = cells;
        self.generation = delta.to;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
    pub fn from_json<S: AsRef<str>>(s: S) -> Result<Self> {
        Ok(serde_json::from_str(s.as_ref())?)
    }
}

/// The cell changes between generation `from` and `from + 1`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub from: u64,
    pub to: u64,
    /// Cells that became alive or changed state, in row-major order
    pub added: Vec<Cell>,
    /// Cells that died, in row-major order
    pub removed: Vec<Coord>,
}

impl Delta {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    /// Checks that this delta is a single step starting at `generation`
    fn check_base(&self, generation: u64) -> Result<()> {
        if self.from != generation {
            return Err(Error::StaleDelta {
                expected: generation,
                found: self.from,
            });
        }
        if self.from.checked_add(1) != Some(self.to) {
            return Err(Error::MalformedDelta {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
    pub fn from_json<S: AsRef<str>>(s: S) -> Result<Self> {
        Ok(serde_json::from_str(s.as_ref())?)
    }
}

impl GridStore {
    fn layout(&self) -> Layout {
        Layout {
            shape: self.config.shape,
            width: self.config.width,
            height: self.config.height,
            adjacency: self.config.adjacency,
        }
    }

    /// A full dump of the current generation
    pub fn export_snapshot(&self) -> Generation {
        Generation {
            shape: self.config.shape,
            width: self.config.width,
            height: self.config.height,
            adjacency: self.config.adjacency,
            cells: self
                .sorted_cells()
                .into_iter()
                .map(|(c, s)| Cell::new(c, s))
                .collect(),
            generation: self.generation,
        }
    }

    /// Replaces the whole content and generation number with `snapshot`.
    ///
    /// The snapshot must have been taken from a store with the same shape,
    /// dimensions, and adjacency. On error the store is left untouched.
    pub fn import_snapshot(&mut self, snapshot: &Generation) -> Result<()> {
        let (expected, found) = (self.layout(), snapshot.layout());
        if expected != found {
            return Err(Error::ShapeMismatch { expected, found });
        }

        let cells = snapshot
            .cells
            .iter()
            .map(|cell| Ok((self.check_cell(cell.coord, cell.state, false)?, cell.state)))
            .collect::<Result<HashMap<_, _>>>()?;

        info!(
            generation = snapshot.generation,
            cells = cells.len(),
            "imported snapshot"
        );
        self.cells = cells;
        self.generation = snapshot.generation;
        self.last_delta = None;
        Ok(())
    }

    /// The delta for the transition `from -> to`.
    ///
    /// Only the most recent transition is retained, so any other range fails
    /// with [`Error::DeltaUnavailable`].
    pub fn export_delta(&self, from: u64, to: u64) -> Result<Delta> {
        match &self.last_delta {
            Some(delta) if delta.from == from && delta.to == to => Ok(delta.clone()),
            _ => Err(Error::DeltaUnavailable { from, to }),
        }
    }

    /// Merges a delta produced by another store into this one.
    ///
    /// The delta must start at this store's current generation; applying it
    /// advances the store to `delta.to`. A delta is never applied twice or
    /// out of order. On error the store is left untouched.
    pub fn import_delta(&mut self, delta: &Delta) -> Result<()> {
        if let Err(err) = delta.check_base(self.generation) {
            warn!(
                generation = self.generation,
                from = delta.from,
                to = delta.to,
                "rejected delta"
            );
            return Err(err);
        }

        // validate everything before touching the cells
        let removed = delta
            .removed
            .iter()
            .map(|&c| self.geometry.normalize(c))
            .collect::<Result<Vec<_>>>()?;
        let added = delta
            .added
            .iter()
            .map(|cell| Ok((self.check_cell(cell.coord, cell.state, true)?, cell.state)))
            .collect::<Result<Vec<_>>>()?;

        for coord in removed {
            self.cells.remove(&coord);
        }
        for (coord, state) in added {
            if state.is_dead() {
                self.cells.remove(&coord);
            } else {
                self.cells.insert(coord, state);
            }
        }
        self.generation = delta.to;
        self.last_delta = Some(delta.clone());
        Ok(())
    }
}
