//! Session state machine: Idle -> Running -> Ended.
//!
//! Everything here is synchronous and renderer-free. The caller owns the clock
//! and feeds it to [`Game::poll`]; every state change comes back as a
//! [`GameEvent`] for the renderer to draw.

use std::fmt;
use std::time::Instant;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, GameConfig};
use crate::food::FoodPlacer;
use crate::grid::{Cell, Grid};
use crate::schedule::Schedule;
use crate::snake::{Heading, Snake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    OutOfBounds,
    SelfCollision,
    /// No free cell left for food. The player filled the board.
    BoardFull,
    /// Ended by [`Game::stop`]
    Stopped,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EndReason::OutOfBounds => "out of bounds",
            EndReason::SelfCollision => "ran into itself",
            EndReason::BoardFull => "board full",
            EndReason::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Ended(EndReason),
}

/// Everything a renderer needs to draw one state of the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Head first
    pub body: Vec<Cell>,
    pub heading: Heading,
    pub food: Option<Cell>,
    pub score: u32,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A session started or a tick was committed.
    Updated(Frame),
    /// The session is over. Emitted exactly once per session.
    Ended { reason: EndReason, score: u32, frame: Frame },
}

struct Session {
    snake: Snake,
    food: Option<Cell>,
    score: u32,
}

pub struct Game<R: Rng> {
    config: GameConfig,
    grid: Grid,
    placer: FoodPlacer<R>,
    schedule: Schedule,
    phase: Phase,
    session: Session,
}

impl Game<StdRng> {
    /// A game with a reproducible food sequence.
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Game::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let session = Session { snake: config.initial_snake(), food: None, score: 0 };

        Ok(Game {
            grid: config.grid(),
            placer: FoodPlacer::new(rng, config.max_food_trials),
            schedule: Schedule::new(config.tick_interval),
            phase: Phase::Idle,
            session,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn snake(&self) -> &Snake {
        &self.session.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.session.food
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn frame(&self) -> Frame {
        Frame {
            body: self.session.snake.body().copied().collect(),
            heading: self.session.snake.heading(),
            food: self.session.food,
            score: self.session.score,
            phase: self.phase,
        }
    }

    /// Throws away any previous session and starts a fresh one from the
    /// configured position.
    pub fn start(&mut self, now: Instant) -> GameEvent {
        let snake = self.config.initial_snake();
        self.start_with(now, snake, None)
    }

    /// Starts a session from an explicit snake. A snake that doesn't fit on
    /// the board is replaced by the configured one. `food` is used if it is a
    /// free cell on the board, otherwise food is placed at random.
    pub fn start_with(&mut self, now: Instant, snake: Snake, food: Option<Cell>) -> GameEvent {
        self.schedule.cancel();

        let grid = self.grid;
        let snake = if snake.body().all(|c| grid.in_bounds(*c)) {
            snake
        } else {
            warn!("snake at {:?} is off the board, using the starting position", snake.head());
            self.config.initial_snake()
        };
        let food = food
            .filter(|f| grid.in_bounds(*f) && !snake.occupies(*f))
            .or_else(|| self.placer.place(&snake.occupied_cells(), &grid));

        self.session = Session { snake, food, score: 0 };
        self.phase = Phase::Running;
        info!("session started on a {}x{} board", grid.size(), grid.size());

        if food.is_none() {
            warn!("no free cell for food at session start");
            return self.end(EndReason::BoardFull);
        }

        self.schedule.arm(now);
        GameEvent::Updated(self.frame())
    }

    /// Forwards a turn to the running snake. Returns whether it was buffered.
    pub fn request_heading(&mut self, heading: Heading) -> bool {
        self.phase == Phase::Running && self.session.snake.request_heading(heading)
    }

    /// Runs a tick if one is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<GameEvent> {
        if self.phase == Phase::Running && self.schedule.take_due(now) {
            self.tick()
        } else {
            None
        }
    }

    /// Advances the running session by one cell. Does nothing outside Running.
    ///
    /// The candidate head is checked against the board as it is before the
    /// move; a collision ends the session without touching the snake.
    pub fn tick(&mut self) -> Option<GameEvent> {
        if self.phase != Phase::Running {
            return None;
        }

        let session = &mut self.session;
        let candidate = session.snake.next_head();
        let eats = session.food == Some(candidate);

        // The tail only moves away on a step that doesn't grow
        let blocked = if eats {
            session.snake.occupies(candidate)
        } else {
            session.snake.occupies_excluding_tail(candidate)
        };

        if !self.grid.in_bounds(candidate) {
            return Some(self.end(EndReason::OutOfBounds));
        }
        if blocked {
            return Some(self.end(EndReason::SelfCollision));
        }

        session.snake.advance(eats);

        if eats {
            session.score = session.score.saturating_add(self.config.food_reward);
            session.food = self.placer.place(&session.snake.occupied_cells(), &self.grid);

            if session.food.is_none() {
                warn!("no free cell left for food");
                return Some(self.end(EndReason::BoardFull));
            }
        }

        Some(GameEvent::Updated(self.frame()))
    }

    /// Ends a running session. Calling it again, or after the session already
    /// ended, has no effect.
    pub fn stop(&mut self) -> Option<GameEvent> {
        self.schedule.cancel();

        if self.phase == Phase::Running {
            Some(self.end(EndReason::Stopped))
        } else {
            None
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn end(&mut self, reason: EndReason) -> GameEvent {
        self.schedule.cancel();
        self.phase = Phase::Ended(reason);

        let score = self.session.score;
        info!("game over: {}, score {}", reason, score);

        GameEvent::Ended { reason, score, frame: self.frame() }
    }
}
