//! Neighbor enumeration for the three supported tessellations.
//!
//! Every neighborhood is a constant offset table selected by the cell's
//! parity class, so enumerating neighbors never builds a table at runtime.
//!
//! ## Square
//! Moore is the 8 surrounding cells, Von Neumann the 4 orthogonal ones.
//! Both have a single parity class.
//!
//! ## Hexagon
//! Flat-topped hexagons in "odd-q" layout: odd columns sit half a cell lower
//! than even columns. The parity class is `col mod 2`.
//!
//! ```text
//!  Moore (6)                    Von Neumann (3, the N/SE/SW tripod)
//!  even col     odd col         even col     odd col
//!  N  ( 0,-1)   N  ( 0,-1)      N  ( 0,-1)   N  ( 0,-1)
//!  NE (+1,-1)   NE (+1, 0)      SE (+1, 0)   SE (+1,+1)
//!  SE (+1, 0)   SE (+1,+1)      SW (-1, 0)   SW (-1,+1)
//!  S  ( 0,+1)   S  ( 0,+1)
//!  SW (-1, 0)   SW (-1,+1)
//!  NW (-1,-1)   NW (-1, 0)
//! ```
//!
//! ## Triangle
//! Triangles alternate orientation along each row. A cell points up when
//! `col + row` is even and down when it is odd; that joint parity is the
//! parity class and the two tables are vertical mirrors of each other.
//!
//! ```text
//!  Von Neumann (3, shared edges)   Moore (12, shared vertices)
//!  up:   (-1,0) (+1,0) (0,+1)      up:   3 cells above, 4 beside, 5 below
//!  down: (-1,0) (+1,0) (0,-1)      down: 5 cells above, 4 beside, 3 below
//! ```

use crate::{Coord, Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::RangeInclusive};

type Offsets = &'static [(i32, i32)];

/// Largest coordinate step in any neighbor table
const REACH: i32 = 2;

/// The coordinates a grid can hold on either axis. Adding any neighbor
/// offset to a coordinate in this range cannot overflow.
pub const PLANE: RangeInclusive<i32> = (i32::MIN + REACH)..=(i32::MAX - REACH);

static SQUARE_MOORE: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
static SQUARE_VON_NEUMANN: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

// indexed by `col mod 2`
static HEX_MOORE: [[(i32, i32); 6]; 2] = [
    [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1)],
    [(0, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)],
];
static HEX_VON_NEUMANN: [[(i32, i32); 3]; 2] = [
    [(0, -1), (1, 0), (-1, 0)],
    [(0, -1), (1, 1), (-1, 1)],
];

// indexed by `(col + row) mod 2`: 0 = pointing up, 1 = pointing down
static TRIANGLE_MOORE: [[(i32, i32); 12]; 2] = [
    [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-2, 0),
        (-1, 0),
        (1, 0),
        (2, 0),
        (-2, 1),
        (-1, 1),
        (0, 1),
        (1, 1),
        (2, 1),
    ],
    [
        (-2, -1),
        (-1, -1),
        (0, -1),
        (1, -1),
        (2, -1),
        (-2, 0),
        (-1, 0),
        (1, 0),
        (2, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ],
];
static TRIANGLE_VON_NEUMANN: [[(i32, i32); 3]; 2] = [
    [(-1, 0), (1, 0), (0, 1)],
    [(0, -1), (-1, 0), (1, 0)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileShape {
    Square,
    Hexagon,
    Triangle,
}
impl TileShape {
    pub fn from_name<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "square" => Some(Self::Square),
            "hex" | "hexagon" => Some(Self::Hexagon),
            "tri" | "triangle" => Some(Self::Triangle),
            _ => None,
        }
    }

    /// Which offset table applies to `coord`
    #[inline]
    pub fn parity_class(self, coord: Coord) -> usize {
        match self {
            Self::Square => 0,
            Self::Hexagon => usize::from(coord.col_is_odd()),
            Self::Triangle => usize::from(coord.sum_is_odd()),
        }
    }
}
impl fmt::Display for TileShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Square => "square",
            Self::Hexagon => "hexagon",
            Self::Triangle => "triangle",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    Moore,
    VonNeumann,
}
impl Adjacency {
    pub fn from_name<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "moore" => Some(Self::Moore),
            "von_neumann" | "vonneumann" | "von-neumann" => Some(Self::VonNeumann),
            _ => None,
        }
    }
}
impl fmt::Display for Adjacency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Moore => "moore",
            Self::VonNeumann => "von_neumann",
        })
    }
}

/// What happens to coordinates outside `[0, width) x [0, height)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// The grid grows without limit; width/height only describe the view.
    #[default]
    Unbounded,
    /// Toroidal: coordinates wrap around both axes.
    Wrap,
    /// Cells outside the grid do not exist; setting one is an error.
    Clip,
}
impl BoundsPolicy {
    pub fn from_name<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "unbounded" | "grow" => Some(Self::Unbounded),
            "wrap" | "torus" => Some(Self::Wrap),
            "clip" => Some(Self::Clip),
            _ => None,
        }
    }
}

/// The offset table for `coord`, selected by shape, adjacency, and parity class.
#[inline]
pub fn offsets(coord: Coord, shape: TileShape, adjacency: Adjacency) -> Offsets {
    let class = shape.parity_class(coord);
    match (shape, adjacency) {
        (TileShape::Square, Adjacency::Moore) => &SQUARE_MOORE[..],
        (TileShape::Square, Adjacency::VonNeumann) => &SQUARE_VON_NEUMANN[..],
        (TileShape::Hexagon, Adjacency::Moore) => &HEX_MOORE[class],
        (TileShape::Hexagon, Adjacency::VonNeumann) => &HEX_VON_NEUMANN[class],
        (TileShape::Triangle, Adjacency::Moore) => &TRIANGLE_MOORE[class],
        (TileShape::Triangle, Adjacency::VonNeumann) => &TRIANGLE_VON_NEUMANN[class],
    }
}

/// Enumerates the neighbors of `coord` on an unbounded plane.
///
/// The order is the order of the offset table, and never contains duplicates.
/// `coord` must lie within [`PLANE`] on both axes.
#[inline]
pub fn neighbors(
    coord: Coord,
    shape: TileShape,
    adjacency: Adjacency,
) -> impl Iterator<Item = Coord> + Clone {
    offsets(coord, shape, adjacency)
        .iter()
        .map(move |&(dc, dr)| coord + Coord::new(dc, dr))
}

/// Largest possible live-neighbor count for a shape/adjacency pair
#[inline]
pub fn max_neighbors(shape: TileShape, adjacency: Adjacency) -> u8 {
    offsets(Coord::zero(), shape, adjacency).len() as u8
}

/// A configured tessellation: shape + adjacency + grid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    shape: TileShape,
    adjacency: Adjacency,
    bounds: BoundsPolicy,
    width: i32,
    height: i32,
}

impl Geometry {
    pub fn new(
        shape: TileShape,
        adjacency: Adjacency,
        bounds: BoundsPolicy,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let to_i32 = |v: u32, axis: &str| match i32::try_from(v) {
            Ok(v) if v <= *PLANE.end() => Ok(v),
            _ => Err(Error::InvalidDimensions(format!("{axis} {v} is too large"))),
        };
        let geometry = Self {
            shape,
            adjacency,
            bounds,
            width: to_i32(width, "width")?,
            height: to_i32(height, "height")?,
        };

        if bounds != BoundsPolicy::Unbounded && (width == 0 || height == 0) {
            return Err(Error::InvalidDimensions(format!(
                "a {width}x{height} grid cannot be bounded"
            )));
        }
        // wrapping across an odd dimension would flip the parity class of the wrapped cell
        if bounds == BoundsPolicy::Wrap {
            let odd_width = width % 2 == 1;
            let odd_height = height % 2 == 1;
            let broken = match shape {
                TileShape::Square => false,
                TileShape::Hexagon => odd_width,
                TileShape::Triangle => odd_width || odd_height,
            };
            if broken {
                return Err(Error::InvalidDimensions(format!(
                    "a wrapped {shape} grid needs even dimensions, got {width}x{height}"
                )));
            }
        }
        Ok(geometry)
    }

    #[inline]
    pub fn shape(&self) -> TileShape {
        self.shape
    }
    #[inline]
    pub fn adjacency(&self) -> Adjacency {
        self.adjacency
    }
    #[inline]
    pub fn bounds(&self) -> BoundsPolicy {
        self.bounds
    }
    #[inline]
    pub fn width(&self) -> u32 {
        self.width as u32
    }
    #[inline]
    pub fn height(&self) -> u32 {
        self.height as u32
    }

    #[inline]
    pub fn max_neighbors(&self) -> u8 {
        max_neighbors(self.shape, self.adjacency)
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        (0..self.width).contains(&coord.col) && (0..self.height).contains(&coord.row)
    }

    /// Maps a coordinate onto the grid according to the bounds policy.
    ///
    /// Returns [`None`] for coordinates that do not exist on a clipped grid,
    /// and for coordinates outside [`PLANE`] on an unbounded one.
    #[inline]
    pub fn resolve(&self, coord: Coord) -> Option<Coord> {
        match self.bounds {
            BoundsPolicy::Unbounded => {
                (PLANE.contains(&coord.col) && PLANE.contains(&coord.row)).then_some(coord)
            }
            BoundsPolicy::Wrap => Some(Coord {
                col: coord.col.rem_euclid(self.width),
                row: coord.row.rem_euclid(self.height),
            }),
            BoundsPolicy::Clip => self.in_bounds(coord).then_some(coord),
        }
    }

    /// Like [`Geometry::resolve`], but a rejected coordinate is an error
    pub fn normalize(&self, coord: Coord) -> Result<Coord> {
        self.resolve(coord).ok_or(Error::OutOfBoundsCoordinate {
            coord,
            width: self.width(),
            height: self.height(),
        })
    }

    /// Neighbors of `coord` with the bounds policy applied.
    ///
    /// On a clipped grid, neighbors outside the bounds are omitted. On a
    /// wrapped grid they are folded back onto the torus; a grid narrower than
    /// the neighborhood may then yield the same cell more than once, and each
    /// occurrence counts.
    #[inline]
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + Clone + '_ {
        neighbors(coord, self.shape, self.adjacency).filter_map(move |c| self.resolve(c))
    }
}
