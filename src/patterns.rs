use crate::Coord;

/// A well-known square-grid pattern, anchored at the origin
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(i32, i32)],
}
impl Pattern {
    /// The pattern's cells shifted by `offset`
    pub fn cells_at(&self, offset: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().map(move |&c| Coord::from(c) + offset)
    }
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "block",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "r-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
];

pub fn find<S: AsRef<str>>(name: S) -> Option<&'static Pattern> {
    let name = name.as_ref();
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
