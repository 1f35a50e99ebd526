use std::collections::HashSet;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Grid};

/// Picks a free cell for the next piece of food.
pub struct FoodPlacer<R: Rng> {
    rng: R,
    max_trials: usize,
}

impl<R: Rng> FoodPlacer<R> {
    pub fn new(rng: R, max_trials: usize) -> Self {
        FoodPlacer { rng, max_trials }
    }

    /// Samples cells uniformly, skipping `occupied` ones, for at most
    /// `max_trials` attempts. If every sample is taken, it chooses among the
    /// remaining free cells directly, so `None` means the board is full.
    pub fn place(&mut self, occupied: &HashSet<Cell>, grid: &Grid) -> Option<Cell> {
        if occupied.len() < grid.cell_count() {
            let n = grid.size() as i32;

            for _ in 0..self.max_trials {
                let cell = Cell::new(self.rng.gen_range(0..n), self.rng.gen_range(0..n));
                if !occupied.contains(&cell) {
                    return Some(cell);
                }
            }
        }

        let free: Vec<Cell> = grid.cells().filter(|c| !occupied.contains(c)).collect();
        debug!("scanning for food, {} free cells left", free.len());

        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn placer(trials: usize) -> FoodPlacer<StdRng> {
        FoodPlacer::new(StdRng::seed_from_u64(7), trials)
    }

    #[test]
    fn test_never_lands_on_snake() {
        let grid = Grid::new(20);
        let occupied: HashSet<Cell> = (0..20).map(|col| Cell::new(10, col)).collect();
        let mut placer = placer(400);

        for _ in 0..200 {
            let food = placer.place(&occupied, &grid).unwrap();
            assert!(grid.in_bounds(food));
            assert!(!occupied.contains(&food));
        }
    }

    #[test]
    fn test_full_board_gives_none() {
        let grid = Grid::new(20);
        let occupied: HashSet<Cell> = grid.cells().collect();
        assert_eq!(occupied.len(), 400);

        assert_eq!(placer(400).place(&occupied, &grid), None);
    }

    #[test]
    fn test_last_free_cell_is_found() {
        let grid = Grid::new(20);
        let last = Cell::new(13, 4);
        let occupied: HashSet<Cell> = grid.cells().filter(|c| *c != last).collect();

        // Even with no sampling budget at all
        assert_eq!(placer(0).place(&occupied, &grid), Some(last));
        assert_eq!(placer(400).place(&occupied, &grid), Some(last));
    }
}
