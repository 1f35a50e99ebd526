use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::event::{poll, read, Event, KeyEvent};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};

use serpent::Cell;

pub type Coords = (u16, u16);

/// Terminal columns per board cell, so the board looks roughly square.
const CELL_WIDTH: u16 = 2;

/// Owns the terminal while the game runs. Everything printed on the board
/// is mirrored in `screen`, so a message box can be taken down again.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    board_size: u16,
    board_origin: Coords,
}

struct Message {
    top_left: Coords,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new(board_size: u16) -> Result<Self> {
        let (width, height) = terminal::size().context("Error reading terminal size")?;

        let board_origin = board_origin((width, height), board_size)?;
        let screen = vec![' '; width as usize * height as usize];

        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None, board_size, board_origin })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Error entering alt screen")?;
        terminal::enable_raw_mode().context("Error enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Error hiding cursor")?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Error disabling raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Error leaving alt screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Drains pending key presses, waiting at most `timeout` for the first.
    pub fn read_key_events(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Error clearing")?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn draw_borders(&mut self) -> Result<()> {
        let (left, top) = self.board_origin;
        let right = left + self.board_size * CELL_WIDTH + 1;
        let bottom = top + self.board_size + 1;

        for x in left..=right {
            let ch = if x == left || x == right { '+' } else { '-' };
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in top + 1..bottom {
            self.print_at((left, y), '|')?;
            self.print_at((right, y), '|')?;
        }

        self.flush()
    }

    /// Blanks the board interior.
    pub fn clear_board(&mut self) -> Result<()> {
        let (left, top) = self.board_origin;
        for y in 0..self.board_size {
            for x in 0..self.board_size * CELL_WIDTH {
                self.print_at((left + 1 + x, top + 1 + y), ' ')?;
            }
        }
        Ok(())
    }

    /// Prints a cell's two glyph columns. Off-board cells are skipped.
    pub fn print_cell(&mut self, cell: Cell, glyph: [char; 2]) -> Result<()> {
        let n = self.board_size as i32;
        if cell.row < 0 || cell.col < 0 || cell.row >= n || cell.col >= n {
            return Ok(());
        }

        let (left, top) = self.board_origin;
        let x = left + 1 + cell.col as u16 * CELL_WIDTH;
        let y = top + 1 + cell.row as u16;
        self.print_at((x, y), glyph[0])?;
        self.print_at((x + 1, y), glyph[1])
    }

    /// Writes a line of text just above the board, padded to the board width.
    pub fn print_status(&mut self, text: &str) -> Result<()> {
        let (left, top) = self.board_origin;
        let width = (self.board_size * CELL_WIDTH + 2) as usize;
        let line = format!("{text: <width$}", text = text, width = width);

        for (i, ch) in line.chars().take(width).enumerate() {
            self.print_at((left + i as u16, top - 1), ch)?;
        }
        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Top and bottom padding lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back whatever the box was covering
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(&ch) = self.screen.get(self.width as usize * y as usize + x as usize) {
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Error flushing")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        self.print_at_no_save(pos, ch)?;
        if let Some(slot) = self.screen.get_mut(self.width as usize * pos.1 as usize + pos.0 as usize) {
            *slot = ch;
        }
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // Message boxes go through here so the saved screen stays intact
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }
}

/// Top-left corner of the bordered board, centred in a terminal of `size`.
fn board_origin(size: Coords, board_size: u16) -> Result<Coords> {
    let (width, height) = (size.0 as u32, size.1 as u32);

    // Board interior plus the border, and one line on top for the score
    let box_width = board_size as u32 * CELL_WIDTH as u32 + 2;
    let box_height = board_size as u32 + 2;
    if width < box_width || height < box_height + 1 {
        bail!(
            "terminal is {}x{}, a {}x{} board needs at least {}x{}",
            width, height, board_size, board_size, box_width, box_height + 1
        );
    }

    Ok((((width - box_width) / 2) as u16, ((height - box_height + 1) / 2) as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_is_centred() {
        // 42x22 box plus a status line in an 80x24 terminal
        assert_eq!(board_origin((80, 24), 20).unwrap(), (19, 1));
        assert_eq!(board_origin((42, 23), 20).unwrap(), (0, 1));
    }

    #[test]
    fn test_too_small_terminal_is_an_error() {
        assert!(board_origin((41, 23), 20).is_err());
        assert!(board_origin((42, 22), 20).is_err());
    }

    #[test]
    fn test_huge_board_does_not_overflow() {
        assert!(board_origin((u16::MAX, u16::MAX), 40_000).is_err());
        assert!(board_origin((u16::MAX, u16::MAX), u16::MAX).is_err());
    }
}
