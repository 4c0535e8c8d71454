use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Neg, Sub},
};

/// A cell coordinate. How `col`/`row` map onto the plane depends on the
/// active [`TileShape`](crate::TileShape).
///
/// On the wire a coordinate is a two element array `[col, row]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Coord {
    pub col: i32,
    pub row: i32,
}
impl Coord {
    #[inline]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
    #[inline]
    pub const fn zero() -> Self {
        Self { col: 0, row: 0 }
    }
    #[inline]
    pub const fn one() -> Self {
        Self { col: 1, row: 1 }
    }

    #[inline]
    pub fn col_is_odd(self) -> bool {
        self.col.rem_euclid(2) == 1
    }
    /// Joint parity of `(col, row)`, used by triangular tiles.
    #[inline]
    pub fn sum_is_odd(self) -> bool {
        (self.col + self.row).rem_euclid(2) == 1
    }
}
impl Default for Coord {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}
impl PartialOrd for Coord {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Coord {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // row-major: compare rows first, then columns within a row
        Ord::cmp(&self.row, &other.row).then(Ord::cmp(&self.col, &other.col))
    }
}
impl From<(i32, i32)> for Coord {
    #[inline]
    fn from((col, row): (i32, i32)) -> Self {
        Self { col, row }
    }
}
impl From<Coord> for (i32, i32) {
    #[inline]
    fn from(c: Coord) -> Self {
        (c.col, c.row)
    }
}
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}
impl Neg for Coord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            col: -self.col,
            row: -self.row,
        }
    }
}
impl Add for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            col: self.col + rhs.col,
            row: self.row + rhs.row,
        }
    }
}
impl Sub for Coord {
    type Output = Coord;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            col: self.col - rhs.col,
            row: self.row - rhs.row,
        }
    }
}
