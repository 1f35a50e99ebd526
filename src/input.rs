use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use serpent::Heading::{self, *};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Turn(Heading),
    Start,
    Pause,
    Quit,
}

pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Turn(Right)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Start),
        KeyCode::Esc => Some(Command::Pause),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers } if modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn test_arrows_and_wasd_turn() {
        assert_eq!(command_for(&key(KeyCode::Up)), Some(Command::Turn(Up)));
        assert_eq!(command_for(&key(KeyCode::Down)), Some(Command::Turn(Down)));
        assert_eq!(command_for(&key(KeyCode::Left)), Some(Command::Turn(Left)));
        assert_eq!(command_for(&key(KeyCode::Right)), Some(Command::Turn(Right)));

        assert_eq!(command_for(&key(KeyCode::Char('w'))), Some(Command::Turn(Up)));
        assert_eq!(command_for(&key(KeyCode::Char('A'))), Some(Command::Turn(Left)));
        assert_eq!(command_for(&key(KeyCode::Char('s'))), Some(Command::Turn(Down)));
        assert_eq!(command_for(&key(KeyCode::Char('d'))), Some(Command::Turn(Right)));
    }

    #[test]
    fn test_controls() {
        assert_eq!(command_for(&key(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(command_for(&key(KeyCode::Char(' '))), Some(Command::Start));
        assert_eq!(command_for(&key(KeyCode::Esc)), Some(Command::Pause));
        assert_eq!(command_for(&key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ev = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(command_for(&ev), Some(Command::Quit));
        assert_eq!(command_for(&key(KeyCode::Char('c'))), None);
    }
}
