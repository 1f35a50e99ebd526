use std::cmp::max;
use std::time::Duration;

use thiserror::Error;

use crate::grid::{Cell, Grid};
use crate::snake::{Heading, Snake};

pub const DEFAULT_BOARD_SIZE: u16 = 20;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;
pub const DEFAULT_INITIAL_LENGTH: usize = 3;
pub const DEFAULT_FOOD_REWARD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board size must be at least 1")]
    EmptyBoard,
    #[error("initial snake length must be at least 1")]
    EmptySnake,
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("initial snake length {length} is longer than the {size}-cell board side")]
    SnakeTooLong { length: usize, size: u16 },
    #[error("initial snake at row {row}, col {col} with length {length} does not fit on a {size}x{size} board")]
    SnakeOffBoard { row: i32, col: i32, length: usize, size: u16 },
}

/// Tunable constants of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Side length of the square board
    pub board_size: u16,
    /// Time between two ticks
    pub tick_interval: Duration,
    pub initial_length: usize,
    /// Head position of a fresh snake
    pub initial_head: Cell,
    pub initial_heading: Heading,
    /// Points added per food eaten
    pub food_reward: u32,
    /// Rejection-sampling budget for food placement
    pub max_food_trials: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: DEFAULT_BOARD_SIZE,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            initial_length: DEFAULT_INITIAL_LENGTH,
            initial_head: Cell::new(10, 7),
            initial_heading: Heading::Right,
            food_reward: DEFAULT_FOOD_REWARD,
            max_food_trials: DEFAULT_BOARD_SIZE as usize * DEFAULT_BOARD_SIZE as usize,
        }
    }
}

impl GameConfig {
    /// Default configuration on an `n`x`n` board. The trial cap becomes n² and
    /// the snake starts mid-board, a few cells left of centre.
    pub fn with_board_size(n: u16) -> Self {
        let defaults = Self::default();
        let half = n as i32 / 2;

        GameConfig {
            board_size: n,
            initial_head: Cell::new(half, max(half - 3, defaults.initial_length as i32 - 1)),
            max_food_trials: n as usize * n as usize,
            ..defaults
        }
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.board_size)
    }

    pub fn initial_snake(&self) -> Snake {
        Snake::new(self.initial_head, self.initial_length, self.initial_heading)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.initial_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }

        // A straight snake never fits in more cells than one board side
        if self.initial_length > self.board_size as usize {
            return Err(ConfigError::SnakeTooLong { length: self.initial_length, size: self.board_size });
        }

        let grid = self.grid();
        if !self.initial_snake().body().all(|c| grid.in_bounds(*c)) {
            return Err(ConfigError::SnakeOffBoard {
                row: self.initial_head.row,
                col: self.initial_head.col,
                length: self.initial_length,
                size: self.board_size,
            });
        }

        Ok(())
    }
}
