//! Player actions and the reasons an action may be ignored.

use super::phases::TurnPhase;
use super::types::{CardId, Difficulty};
use serde::{Deserialize, Serialize};

/// Something the human asked for through the presentation layer.
///
/// Actions are intents; the turn controller decides whether the
/// matching control is enabled before applying one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Click on a card.
    RevealCard(CardId),
    /// Click on a clue-size button.
    ChooseClueSize(u8),
    /// Click on end-turn.
    EndTurn,
    /// Change the difficulty toggle.
    SetDifficulty(Difficulty),
}

impl PlayerAction {
    /// Control class that triggers this action.
    pub fn control(&self) -> &'static str {
        match self {
            PlayerAction::RevealCard(_) => "card",
            PlayerAction::ChooseClueSize(_) => "clue size",
            PlayerAction::EndTurn => "end turn",
            PlayerAction::SetDifficulty(_) => "difficulty",
        }
    }
}

impl std::fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerAction::RevealCard(card) => write!(f, "reveal {}", card),
            PlayerAction::ChooseClueSize(size) => write!(f, "choose clue size {}", size),
            PlayerAction::EndTurn => write!(f, "end turn"),
            PlayerAction::SetDifficulty(difficulty) => write!(f, "set difficulty {}", difficulty),
        }
    }
}

/// Why an action was dropped without touching the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum IgnoreReason {
    /// The action's control is disabled in this phase.
    #[display("{} control is disabled during {}", control, phase)]
    ControlDisabled {
        /// Control class of the rejected action.
        control: &'static str,
        /// Phase at the time.
        phase: TurnPhase,
    },

    /// A remote request is outstanding; all input is disabled.
    #[display("waiting for the remote collaborator")]
    AwaitingRemote,

    /// The card is already face up.
    #[display("card {} is already revealed", _0)]
    AlreadyRevealed(CardId),
}
