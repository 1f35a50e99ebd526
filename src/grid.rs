/// A (row, column) coordinate on the board. Rows grow downwards.
///
/// Coordinates are signed so a candidate head that steps off the board can
/// still be represented and rejected by [`Grid::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    pub fn offset(&self, (d_row, d_col): (i32, i32)) -> Self {
        Cell { row: self.row + d_row, col: self.col + d_col }
    }

    /// True if `other` is one orthogonal step away.
    pub fn is_adjacent(&self, other: Cell) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }
}

/// A square board of `size` x `size` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: u16,
}

impl Grid {
    pub fn new(size: u16) -> Self {
        Grid { size }
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        let n = self.size as i32;
        cell.row >= 0 && cell.row < n && cell.col >= 0 && cell.col < n
    }

    /// Every cell on the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let n = self.size as i32;
        (0..n).flat_map(move |row| (0..n).map(move |col| Cell::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let grid = Grid::new(20);

        assert!(grid.in_bounds(Cell::new(0, 0)));
        assert!(grid.in_bounds(Cell::new(19, 19)));
        assert!(!grid.in_bounds(Cell::new(-1, 0)));
        assert!(!grid.in_bounds(Cell::new(0, -1)));
        assert!(!grid.in_bounds(Cell::new(20, 0)));
        assert!(!grid.in_bounds(Cell::new(0, 20)));
    }

    #[test]
    fn test_cells_cover_board() {
        let grid = Grid::new(4);
        let cells: Vec<Cell> = grid.cells().collect();

        assert_eq!(cells.len(), grid.cell_count());
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[5], Cell::new(1, 1));
        assert!(cells.iter().all(|c| grid.in_bounds(*c)));
    }

    #[test]
    fn test_adjacency() {
        let c = Cell::new(5, 5);
        assert!(c.is_adjacent(Cell::new(4, 5)));
        assert!(c.is_adjacent(Cell::new(5, 6)));
        assert!(!c.is_adjacent(Cell::new(6, 6)));
        assert!(!c.is_adjacent(c));
    }
}
