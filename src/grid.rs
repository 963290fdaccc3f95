//! Discrete board geometry shared by both players' games.
//!
//! Positions are in logical units (the board is 600x400 units on a 20-unit
//! grid), so every cell coordinate is a multiple of [`GRID_SIZE`].

/// Side length of one grid cell in logical units.
pub const GRID_SIZE: i32 = 20;
/// Board width in logical units (30 cells).
pub const BOARD_WIDTH: i32 = 600;
/// Board height in logical units (20 cells).
pub const BOARD_HEIGHT: i32 = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Position one grid cell away in `direction`. May leave the board.
    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: self.x + dx * GRID_SIZE,
            y: self.y + dy * GRID_SIZE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: i32,
    pub height: i32,
}

impl Default for Board {
    fn default() -> Self {
        Board {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

impl Board {
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Grid-aligned cell closest to the board center.
    pub fn center(&self) -> Cell {
        Cell {
            x: self.width / (2 * GRID_SIZE) * GRID_SIZE,
            y: self.height / (2 * GRID_SIZE) * GRID_SIZE,
        }
    }

    pub fn cells_across(&self) -> i32 {
        self.width / GRID_SIZE
    }

    pub fn cells_down(&self) -> i32 {
        self.height / GRID_SIZE
    }
}
