use rand::Rng;

use crate::grid::{Board, Cell, GRID_SIZE};
use crate::snake::Snake;

/// Rejection-sampling budget before falling back to scanning free cells.
const MAX_SAMPLE_ATTEMPTS: u32 = 128;

/// Picks a random unoccupied grid cell for the next food item.
///
/// Samples uniformly and rejects cells under the snake; on a crowded board the
/// attempt budget runs out and the spawner scans every free cell instead, so
/// placement always terminates. Returns `None` only when the board is full.
pub fn spawn(board: Board, snake: &Snake, rng: &mut impl Rng) -> Option<Cell> {
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let cell = Cell::new(
            rng.gen_range(0..board.cells_across()) * GRID_SIZE,
            rng.gen_range(0..board.cells_down()) * GRID_SIZE,
        );
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = (0..board.cells_down())
        .flat_map(|row| {
            (0..board.cells_across()).map(move |col| Cell::new(col * GRID_SIZE, row * GRID_SIZE))
        })
        .filter(|&cell| !snake.occupies(cell))
        .collect();

    if free.is_empty() {
        None
    } else {
        Some(free[rng.gen_range(0..free.len())])
    }
}
