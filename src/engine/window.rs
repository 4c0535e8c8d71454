use crate::{CellState, Coord, GridStore, TileShape};

/// The cells of a [`GridStore`] inside the rectangle `[tl, br)`
pub struct GridWindow<'a> {
    tl: Coord,
    br: Coord,
    store: &'a GridStore,
}
impl<'a> GridWindow<'a> {
    pub fn new(store: &'a GridStore, top_left: Coord, bottom_right: Coord) -> Self {
        Self {
            tl: top_left,
            br: bottom_right,
            store,
        }
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Coord, CellState)> + '_ {
        let rc = self.tl.col..self.br.col;
        let rr = self.tl.row..self.br.row;
        self.store
            .cells()
            .filter(move |(pos, _)| rc.contains(&pos.col) && rr.contains(&pos.row))
    }

    /// Cells in row-major order, as needed for line-by-line output
    pub fn sorted(&self) -> Vec<(Coord, CellState)> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_unstable();
        cells
    }

    #[inline]
    pub fn top_left(&self) -> Coord {
        self.tl
    }
}

/// The character drawn for a non-dead cell
pub fn glyph(shape: TileShape, coord: Coord, state: CellState) -> char {
    if !state.is_alive() {
        return '░';
    }
    match shape {
        TileShape::Square => '█',
        TileShape::Hexagon => '⬢',
        TileShape::Triangle if coord.sum_is_odd() => '▼',
        TileShape::Triangle => '▲',
    }
}

impl<'a> std::fmt::Display for GridWindow<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shape = self.store.config().shape;
        let mut last = self.tl - Coord { col: 1, row: 0 };
        for (cell, state) in self.sorted() {
            // determine the number of lines to print
            let lines = cell.row - last.row;
            // determine the number of padding spaces to print
            let padding = match lines {
                0 => cell.col - last.col - 1,
                _ => cell.col - self.tl.col,
            };
            write!(
                f,
                "{0:\n<1$}{0: <2$}{3}",
                "",
                lines as usize,
                padding as usize,
                glyph(shape, cell, state)
            )?;
            last = cell;
        }
        Ok(())
    }
}
