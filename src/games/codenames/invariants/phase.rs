//! Phase invariants: metadata that only makes sense in certain phases.

use super::super::board::BoardSnapshot;
use super::super::phases::TurnPhase;
use super::Invariant;

/// Invariant: the opponent queue is empty outside the opponent turn.
pub struct QueueOnlyDuringOpponentTurn;

impl Invariant<BoardSnapshot> for QueueOnlyDuringOpponentTurn {
    fn holds(board: &BoardSnapshot) -> bool {
        board.opponent_queue().is_empty() || board.phase() == TurnPhase::OpponentTurn
    }

    fn description() -> &'static str {
        "Opponent moves are queued only during the opponent turn"
    }
}

/// Invariant: a guess budget exists only while the human is guessing.
pub struct GuessesOnlyWhileGuessing;

impl Invariant<BoardSnapshot> for GuessesOnlyWhileGuessing {
    fn holds(board: &BoardSnapshot) -> bool {
        board.remaining_guesses() == 0 || board.phase() == TurnPhase::Guessing
    }

    fn description() -> &'static str {
        "Remaining guesses are zero outside the guessing phase"
    }
}

/// Invariant: a finished board has every card face up.
pub struct TerminalBoardExposed;

impl Invariant<BoardSnapshot> for TerminalBoardExposed {
    fn holds(board: &BoardSnapshot) -> bool {
        !board.phase().is_terminal() || board.cards().iter().all(|c| c.is_revealed())
    }

    fn description() -> &'static str {
        "Every card is revealed once the game is over"
    }
}
