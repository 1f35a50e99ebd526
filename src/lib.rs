//! Grid snake: a fixed square board, a snake that grows by eating food, and a
//! tick-driven session that ends on a wall, on the snake's own body, or when
//! the board is full.

pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod schedule;
pub mod snake;

pub use config::{ConfigError, GameConfig};
pub use game::{EndReason, Frame, Game, GameEvent, Phase};
pub use grid::{Cell, Grid};
pub use snake::{Heading, Snake};
