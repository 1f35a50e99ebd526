use std::cmp::min;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info};
use rand::Rng;

use crate::input::{command_for, Command};
use crate::term::TermManager;
use serpent::{EndReason, Frame, Game, GameEvent, Heading};

/// Longest stretch the loop waits on the keyboard before checking the clock.
const INPUT_POLL_MS: u64 = 10;

const SNAKE_BODY_GLYPH: [char; 2] = ['█', '█'];
const FOOD_GLYPH: [char; 2] = ['O', ' '];
const DEAD_SNAKE_GLYPH: [char; 2] = ['X', 'X'];

enum Flow {
    Again,
    Quit,
}

/// The terminal front-end: feeds keys and the clock into a [`Game`] and draws
/// whatever it emits.
pub struct SnakeApp<R: Rng> {
    term: TermManager,
    game: Game<R>,
    paused: bool,
}

impl<R: Rng> SnakeApp<R> {
    pub fn new(game: Game<R>) -> Result<Self> {
        let term = TermManager::new(game.config().board_size)?;
        Ok(SnakeApp { term, game, paused: false })
    }

    /// Takes over the terminal until the player quits, then hands it back
    /// even if something failed along the way.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup()?;
        let res = self.run_sessions();
        let restored = self.term.restore();
        keep_first_error(res, restored)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn run_sessions(&mut self) -> Result<()> {
        if let Flow::Quit = self.show_intro()? {
            return Ok(());
        }

        while let Flow::Again = self.play()? {}

        info!("quitting");
        Ok(())
    }

    fn show_intro(&mut self) -> Result<Flow> {
        self.term.clear()?;
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "q or CTRL+C to quit",
            "",
            "Press Enter to begin",
        ])?;

        self.wait_for_start()
    }

    fn play(&mut self) -> Result<Flow> {
        self.term.clear()?;
        self.term.draw_borders()?;
        self.paused = false;

        let event = self.game.start(Instant::now());
        if self.handle_event(&event)? {
            return self.wait_for_start();
        }

        loop {
            let wait = input_wait(self.paused, self.game.schedule().time_until(Instant::now()));

            for key_ev in self.term.read_key_events(wait)? {
                match command_for(&key_ev) {
                    Some(Command::Quit) => {
                        self.game.stop();
                        return Ok(Flow::Quit);
                    }
                    Some(Command::Start) if !self.paused => {
                        debug!("restart requested");
                        return Ok(Flow::Again);
                    }
                    Some(Command::Pause) => self.toggle_pause()?,
                    Some(Command::Turn(heading)) if !self.paused => {
                        self.game.request_heading(heading);
                    }
                    _ => {}
                }
            }

            if self.paused {
                continue;
            }

            if let Some(event) = self.game.poll(Instant::now()) {
                if self.handle_event(&event)? {
                    return self.wait_for_start();
                }
            }
        }
    }

    /// Draws an event. Returns true once the session is over.
    fn handle_event(&mut self, event: &GameEvent) -> Result<bool> {
        match event {
            GameEvent::Updated(frame) => {
                self.draw_frame(frame)?;
                Ok(false)
            }
            GameEvent::Ended { reason, score, frame } => {
                self.draw_frame(frame)?;
                self.game_over(*reason, *score, frame)?;
                Ok(true)
            }
        }
    }

    fn wait_for_start(&mut self) -> Result<Flow> {
        loop {
            match command_for(&self.term.read_key_blocking()?) {
                Some(Command::Start) => return Ok(Flow::Again),
                Some(Command::Quit) => return Ok(Flow::Quit),
                _ => {}
            }
        }
    }

    fn game_over(&mut self, reason: EndReason, score: u32, frame: &Frame) -> Result<()> {
        let title = if reason == EndReason::BoardFull { "You won!" } else { "Game over!" };

        if reason != EndReason::BoardFull {
            for cell in &frame.body {
                self.term.print_cell(*cell, DEAD_SNAKE_GLYPH)?;
            }
        }

        self.term.show_message(&[
            title,
            &*format!("Reason: {}", reason),
            &*format!("Score: {}", score),
            "",
            "Press Enter to play again,",
            "or q to quit.",
        ])
    }

    fn draw_frame(&mut self, frame: &Frame) -> Result<()> {
        self.term.clear_board()?;

        if let Some(food) = frame.food {
            self.term.print_cell(food, FOOD_GLYPH)?;
        }

        for (i, cell) in frame.body.iter().enumerate() {
            let glyph = if i == 0 { head_glyph(frame.heading) } else { SNAKE_BODY_GLYPH };
            self.term.print_cell(*cell, glyph)?;
        }

        self.term.print_status(&format!("Score: {}", frame.score))?;
        self.term.flush()
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or q to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

/// How long to block on the keyboard. While paused an overdue tick must not
/// turn this into a busy loop.
fn input_wait(paused: bool, until_tick: Option<Duration>) -> Duration {
    let max_wait = Duration::from_millis(INPUT_POLL_MS);
    match until_tick {
        Some(d) if !paused => min(d, max_wait),
        _ => max_wait,
    }
}

/// The session's error wins; a failed restore is attached to it.
fn keep_first_error(res: Result<()>, restored: Result<()>) -> Result<()> {
    match (res, restored) {
        (Err(e), Err(restore_err)) => Err(e.context(format!("also failed to restore the terminal: {:#}", restore_err))),
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restored) => restored,
    }
}

fn head_glyph(heading: Heading) -> [char; 2] {
    match heading {
        Heading::Up => ['^', '^'],
        Heading::Down => ['v', 'v'],
        Heading::Left => ['<', '█'],
        Heading::Right => ['█', '>'],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_head_glyph_points_forward() {
        assert_eq!(head_glyph(Heading::Right)[1], '>');
        assert_eq!(head_glyph(Heading::Left)[0], '<');
        assert_eq!(head_glyph(Heading::Up), ['^', '^']);
        assert_eq!(head_glyph(Heading::Down), ['v', 'v']);
    }

    #[test]
    fn test_food_is_drawn_as_o() {
        assert_eq!(FOOD_GLYPH[0], 'O');
    }

    #[test]
    fn test_paused_loop_still_waits_for_input() {
        let max_wait = Duration::from_millis(INPUT_POLL_MS);

        assert_eq!(input_wait(true, Some(Duration::ZERO)), max_wait);
        assert_eq!(input_wait(true, None), max_wait);
        assert_eq!(input_wait(false, Some(Duration::ZERO)), Duration::ZERO);
        assert_eq!(input_wait(false, Some(Duration::from_millis(3))), Duration::from_millis(3));
        assert_eq!(input_wait(false, Some(Duration::from_secs(1))), max_wait);
    }

    #[test]
    fn test_session_error_survives_failed_restore() {
        let res = keep_first_error(Err(anyhow!("lost the terminal")), Err(anyhow!("raw mode stuck")));
        let msg = format!("{:#}", res.unwrap_err());
        assert!(msg.contains("lost the terminal"));
        assert!(msg.contains("raw mode stuck"));

        let res = keep_first_error(Ok(()), Err(anyhow!("raw mode stuck")));
        assert!(format!("{:#}", res.unwrap_err()).contains("raw mode stuck"));

        assert!(keep_first_error(Ok(()), Ok(())).is_ok());
    }
}
