use std::collections::{HashSet, VecDeque};

use crate::grid::Cell;
use Heading::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn opposite(&self) -> Heading {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// (row, col) step for one cell of movement.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }
}

/// The snake body, head first, plus the heading buffer fed by input.
///
/// Input only ever touches `pending`; the body changes in [`Snake::advance`].
/// One heading change is accepted per tick, so two quick turns can't fold the
/// head back into the neck before the body has moved.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    current: Heading,
    pending: Heading,
    turn_accepted: bool,
}

impl Snake {
    /// Lays out `length` segments in a straight line behind `head`.
    pub fn new(head: Cell, length: usize, heading: Heading) -> Self {
        let (d_row, d_col) = heading.delta();
        let length = i32::try_from(length.max(1)).unwrap_or(i32::MAX);
        let body = (0..length)
            .map(|i| head.offset((-d_row * i, -d_col * i)))
            .collect();

        Snake { body, current: heading, pending: heading, turn_accepted: false }
    }

    /// Builds a snake from explicit segments, head first.
    ///
    /// Returns `None` for an empty body, one whose consecutive segments are
    /// not grid neighbours, or one that covers a cell twice.
    pub fn from_segments(segments: Vec<Cell>, heading: Heading) -> Option<Self> {
        if segments.is_empty() || segments.windows(2).any(|w| !w[0].is_adjacent(w[1])) {
            return None;
        }
        if segments.iter().collect::<HashSet<_>>().len() != segments.len() {
            return None;
        }

        Some(Snake { body: segments.into(), current: heading, pending: heading, turn_accepted: false })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn heading(&self) -> Heading {
        self.current
    }

    pub fn pending_heading(&self) -> Heading {
        self.pending
    }

    /// Buffers a heading for the next tick. Reversals and a second change in
    /// the same tick are ignored; the return value says whether it was taken.
    pub fn request_heading(&mut self, heading: Heading) -> bool {
        if self.turn_accepted || heading == self.current.opposite() {
            return false;
        }

        self.pending = heading;
        self.turn_accepted = true;
        true
    }

    /// Where the head would land if the snake advanced now.
    pub fn next_head(&self) -> Cell {
        self.head().offset(self.pending.delta())
    }

    /// Commits one step. The tail is kept when `ate_food`, so the snake grows.
    pub fn advance(&mut self, ate_food: bool) -> Cell {
        self.current = self.pending;
        self.turn_accepted = false;

        let new_head = self.head().offset(self.current.delta());
        self.body.push_front(new_head);

        if !ate_food {
            self.body.pop_back();
        }

        new_head
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Like [`Snake::occupies`] but ignoring the tail, which moves out of the
    /// way on a step that doesn't grow.
    pub fn occupies_excluding_tail(&self, cell: Cell) -> bool {
        self.body.iter().take(self.body.len() - 1).any(|c| *c == cell)
    }

    pub fn occupied_cells(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }
}
