// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// Row-major grid of cells, rebuilt from scratch every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, Cell::BLANK);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Index of `(x, y)`, or `None` when the coordinate is off the grid.
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).and_then(|i| self.cells.get(i))
    }

    /// Writes `cell` at `(x, y)`; off-grid writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Non-blank cells in row-major order with their coordinates.
    pub fn visible(&self) -> impl Iterator<Item = (u16, u16, &Cell)> + '_ {
        let w = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_blank())
            .map(move |(i, c)| ((i % w) as u16, (i / w) as u16, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Glyph, Intensity, Tier};

    fn x_cell() -> Cell {
        Cell::new(Glyph::Char('x'), Tier::Bright, Intensity::Full)
    }

    #[test]
    fn off_grid_writes_are_dropped() {
        let mut f = Frame::new(3, 2);
        f.set(-1, 0, x_cell());
        f.set(0, -1, x_cell());
        f.set(3, 0, x_cell());
        f.set(0, 2, x_cell());
        assert!(f.cells.iter().all(Cell::is_blank));
        f.set(2, 1, x_cell());
        assert_eq!(f.get(2, 1), Some(&x_cell()));
    }

    #[test]
    fn clear_blanks_every_cell() {
        let mut f = Frame::new(2, 2);
        f.set(0, 0, x_cell());
        f.clear();
        assert_eq!(f.get(0, 0).unwrap().glyph, Glyph::Blank);
    }

    #[test]
    fn visible_walks_row_major() {
        let mut f = Frame::new(4, 3);
        f.set(3, 0, x_cell());
        f.set(0, 2, x_cell());
        f.set(1, 1, x_cell());
        let at: Vec<(u16, u16)> = f.visible().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(at, vec![(3, 0), (1, 1), (0, 2)]);
    }

    #[test]
    fn resize_discards_content() {
        let mut f = Frame::new(2, 2);
        f.set(1, 1, x_cell());
        f.resize(5, 1);
        assert_eq!(f.cells.len(), 5);
        assert!(f.cells.iter().all(Cell::is_blank));
    }
}
