//! Keyboard mapping: cursor movement over the 5x5 grid and action keys.

use crossterm::event::KeyCode;
use strictly_codenames::{CardId, ClientCommand, Difficulty, PlayerAction};

/// Cards per row.
pub const GRID_WIDTH: usize = 5;

/// Moves cursor based on arrow keys, stopping at the edges.
pub fn move_cursor(cursor: CardId, key: KeyCode) -> CardId {
    let (row, col) = (cursor.index() / GRID_WIDTH, cursor.index() % GRID_WIDTH);
    let (row, col) = match key {
        KeyCode::Left if col > 0 => (row, col - 1),
        KeyCode::Right if col + 1 < GRID_WIDTH => (row, col + 1),
        KeyCode::Up if row > 0 => (row - 1, col),
        KeyCode::Down if row + 1 < GRID_WIDTH => (row + 1, col),
        _ => (row, col),
    };
    CardId::from_index(row * GRID_WIDTH + col).unwrap_or(cursor)
}

/// Command for an action key, if it is one.
pub fn command_for_key(key: KeyCode, cursor: CardId, difficulty: Difficulty) -> Option<ClientCommand> {
    let action = match key {
        KeyCode::Enter | KeyCode::Char(' ') => PlayerAction::RevealCard(cursor),
        KeyCode::Char(c @ '1'..='3') => {
            PlayerAction::ChooseClueSize(c.to_digit(10).and_then(|d| u8::try_from(d).ok())?)
        }
        KeyCode::Char('e') => PlayerAction::EndTurn,
        KeyCode::Char('d') => PlayerAction::SetDifficulty(difficulty.next()),
        KeyCode::Char('r') => return Some(ClientCommand::Retry),
        _ => return None,
    };
    Some(ClientCommand::Act(action))
}
