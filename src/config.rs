use crate::{Adjacency, BoundsPolicy, Geometry, Result, RuleTable, TileShape};
use serde::{Deserialize, Serialize};

/// Everything needed to build a [`GridStore`](crate::GridStore).
///
/// Each store owns its own copy; there is no process-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shape: TileShape,
    pub width: u32,
    pub height: u32,
    pub adjacency: Adjacency,
    pub rules: RuleTable,
    pub bounds: BoundsPolicy,
}

impl Config {
    pub fn new(shape: TileShape, width: u32, height: u32) -> Self {
        Self {
            shape,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_adjacency(mut self, adjacency: Adjacency) -> Self {
        self.adjacency = adjacency;
        self
    }
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }
    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    /// Builds the geometry, checking the dimensions against the bounds policy
    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::new(
            self.shape,
            self.adjacency,
            self.bounds,
            self.width,
            self.height,
        )
    }

    /// True if `other` describes the same cells, i.e. only the rules differ
    pub fn same_layout(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.width == other.width
            && self.height == other.height
            && self.adjacency == other.adjacency
            && self.bounds == other.bounds
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shape: TileShape::Square,
            width: 64,
            height: 64,
            adjacency: Adjacency::Moore,
            rules: RuleTable::conway(),
            bounds: BoundsPolicy::Unbounded,
        }
    }
}
