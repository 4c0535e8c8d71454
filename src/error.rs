use crate::{Adjacency, Coord, TileShape};
use thiserror::Error;

/// The grid configuration a snapshot was taken under, used to report mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub shape: TileShape,
    pub width: u32,
    pub height: u32,
    pub adjacency: Adjacency,
}
impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x{} {}",
            self.shape, self.width, self.height, self.adjacency
        )
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("snapshot layout {found} does not match store layout {expected}")]
    ShapeMismatch { expected: Layout, found: Layout },

    #[error("delta starts at generation {found} but the store is at generation {expected}")]
    StaleDelta { expected: u64, found: u64 },

    #[error("delta from generation {from} to {to} does not describe a single step")]
    MalformedDelta { from: u64, to: u64 },

    #[error("rule references {count} neighbors but {shape}/{adjacency} cells have at most {max}")]
    InvalidRuleTable {
        count: u8,
        max: u8,
        shape: TileShape,
        adjacency: Adjacency,
    },

    #[error("rule {rule} gives birth on 0 neighbors, which would fill an unbounded grid")]
    UnboundedBirth { rule: String },

    #[error("coordinate {coord} lies outside the {width}x{height} grid")]
    OutOfBoundsCoordinate { coord: Coord, width: u32, height: u32 },

    #[error("cell {coord} has state {state}, expected 1..{states}")]
    InvalidCellState { coord: Coord, state: u8, states: u8 },

    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("no delta recorded for generation {from} -> {to}")]
    DeltaUnavailable { from: u64, to: u64 },

    #[error("invalid rule string: {0}")]
    RuleParse(String),

    #[error("invalid pattern: {0}")]
    PatternParse(String),

    #[error("serde error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
