//! Turn phases, outcomes and the control signals each phase enables.

use serde::{Deserialize, Serialize};

/// Largest clue size the human may ask for.
pub const MAX_CLUE_SIZE: u8 = 3;

/// One of the two sides at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Side {
    /// The local player.
    Human,
    /// The remote clue-giver and opponent.
    Opponent,
}

/// Why the human side lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossCause {
    /// The assassin was revealed.
    Assassin,
    /// Every opponent card was revealed first.
    OpponentCleared,
}

/// Outcome of a finished game, from the human side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// All human cards found.
    Win,
    /// Game lost.
    Loss(LossCause),
}

impl Outcome {
    /// Side that won.
    pub fn winner(&self) -> Side {
        match self {
            Outcome::Win => Side::Human,
            Outcome::Loss(_) => Side::Opponent,
        }
    }

    /// Returns true for a human win.
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "You found every card. You win!"),
            Outcome::Loss(LossCause::Assassin) => write!(f, "The assassin was revealed. You lose."),
            Outcome::Loss(LossCause::OpponentCleared) => {
                write!(f, "The opponent found all its cards. You lose.")
            }
        }
    }
}

/// Current legal-action mode of the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the human to pick how many cards the next clue should cover.
    #[default]
    ChoosingClueSize,
    /// Human is revealing cards.
    Guessing,
    /// Opponent sequence is being fetched or replayed.
    OpponentTurn,
    /// Terminal.
    GameOver(Outcome),
}

impl TurnPhase {
    /// Returns true once the game is decided.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::GameOver(_))
    }

    /// Outcome, for terminal phases.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            TurnPhase::GameOver(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::ChoosingClueSize => write!(f, "choosing clue size"),
            TurnPhase::Guessing => write!(f, "guessing"),
            TurnPhase::OpponentTurn => write!(f, "opponent turn"),
            TurnPhase::GameOver(Outcome::Win) => write!(f, "game over (win)"),
            TurnPhase::GameOver(Outcome::Loss(_)) => write!(f, "game over (loss)"),
        }
    }
}

/// Enable signals for each class of interactive control.
///
/// The presentation layer greys out whatever is false here; the
/// controller rejects any action whose control is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// Card grid.
    pub cards: bool,
    /// Clue-size buttons, indexed by size - 1.
    pub clue_sizes: [bool; MAX_CLUE_SIZE as usize],
    /// End-turn button.
    pub end_turn: bool,
    /// Difficulty toggle.
    pub difficulty: bool,
}

impl Controls {
    /// Everything disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether the button for `size` is enabled.
    pub fn clue_size(&self, size: u8) -> bool {
        size >= 1
            && self
                .clue_sizes
                .get(usize::from(size) - 1)
                .copied()
                .unwrap_or(false)
    }

    /// Returns true if any control accepts input.
    pub fn any(&self) -> bool {
        self.cards || self.end_turn || self.difficulty || self.clue_sizes.iter().any(|&b| b)
    }
}
