//! Core library for Life-like cellular automata on square, hexagonal, and
//! triangular grids.

pub mod config;
pub mod enc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod patterns;
pub mod pos;
pub mod rules;
pub mod snapshot;

pub use config::Config;
pub use enc::{PositionEncoder, RunLengthEncoded};
pub use engine::{GridWindow, TransitionIndex};
pub use error::{Error, Result};
pub use geometry::{Adjacency, BoundsPolicy, Geometry, TileShape};
pub use grid::GridStore;
pub use pos::Coord;
pub use rules::{CellState, RuleTable, next_state};
pub use snapshot::{Cell, Delta, Generation};
