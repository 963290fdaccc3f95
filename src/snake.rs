use std::collections::VecDeque;

use crate::grid::{Board, Cell, Direction, GRID_SIZE};

/// One player's snake: ordered body segments (head at the front), the
/// direction applied this tick, and the buffered direction for the next one.
///
/// Input handlers only ever write `next_direction`; the body mutates at tick
/// boundaries in [`Snake::advance`], so input and simulation never tear.
#[derive(Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
    next_direction: Direction,
}

impl Snake {
    pub fn new(board: Board) -> Self {
        let mut snake = Snake {
            body: VecDeque::new(),
            direction: Direction::Right,
            next_direction: Direction::Right,
        };
        snake.reset(board);
        snake
    }

    /// Three contiguous segments centered on the board, facing right.
    pub fn reset(&mut self, board: Board) {
        let center = board.center();
        self.body.clear();
        for i in 0..3 {
            self.body.push_back(Cell::new(center.x - i * GRID_SIZE, center.y));
        }
        self.direction = Direction::Right;
        self.next_direction = Direction::Right;
    }

    /// Buffers `new_direction` unless it would reverse the snake into itself.
    /// The check is against the direction currently applied, not any earlier
    /// buffered input, so two quick key presses cannot smuggle in a reversal.
    pub fn change_direction(&mut self, new_direction: Direction) {
        if new_direction.opposite() != self.direction {
            self.next_direction = new_direction;
        }
    }

    /// Commits the buffered direction, prepends the new head, and pops the
    /// tail. The tail is dropped unconditionally and returned; growth re-adds
    /// a duplicate tail separately via [`Snake::grow`].
    pub fn advance(&mut self) -> Cell {
        self.direction = self.next_direction;
        let new_head = self.head().step(self.direction);
        self.body.push_front(new_head);
        self.body.pop_back().unwrap_or(new_head)
    }

    /// Duplicates the tail segment, lengthening the body by one.
    pub fn grow(&mut self) {
        if let Some(&tail) = self.body.back() {
            self.body.push_back(tail);
        }
    }

    pub fn head(&self) -> Cell {
        *self.body.front().expect("snake body is never empty")
    }

    /// Wall check first, then head against every non-head segment.
    pub fn hit_wall_or_self(&self, board: Board) -> bool {
        let head = self.head();
        if !board.contains(head) {
            return true;
        }
        self.body.iter().skip(1).any(|&segment| segment == head)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.iter().any(|&segment| segment == cell)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    #[cfg(test)]
    pub(crate) fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Snake {
            body: cells.into_iter().collect(),
            direction: Direction::Right,
            next_direction: Direction::Right,
        }
    }
}
