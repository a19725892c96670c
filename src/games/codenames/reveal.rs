//! Reveal engine.
//!
//! Every card flip, whether from a human guess or an opponent replay,
//! goes through [`apply_reveal`], which evaluates termination exactly
//! once per flip.

use super::board::BoardSnapshot;
use super::phases::{Outcome, Side};
use super::rules::check_termination;
use super::types::{CardId, RevealCause, Team};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// What a single reveal did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealOutcome {
    card: CardId,
    team: Team,
    changed: bool,
    game_over: Option<Outcome>,
}

impl RevealOutcome {
    /// The card addressed.
    pub fn card(&self) -> CardId {
        self.card
    }

    /// Team of the card addressed.
    pub fn team(&self) -> Team {
        self.team
    }

    /// False when the card was already face up and nothing happened.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Outcome, if this reveal ended the game.
    pub fn game_over(&self) -> Option<Outcome> {
        self.game_over
    }

    /// Returns true if this reveal ended the game.
    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// Winning side, if this reveal ended the game.
    pub fn winner(&self) -> Option<Side> {
        self.game_over.map(|outcome| outcome.winner())
    }
}

/// Reveals one card and evaluates termination.
///
/// Already-revealed cards are left alone and reported as unchanged. When
/// the reveal ends the game every remaining card is exposed; locking the
/// board is the caller's job.
#[instrument(skip(board), fields(card = %card, ?cause))]
pub fn apply_reveal(board: &mut BoardSnapshot, card: CardId, cause: RevealCause) -> RevealOutcome {
    let team = board.card(card).team();
    if !board.reveal(card, cause) {
        debug!("Card already revealed");
        return RevealOutcome {
            card,
            team,
            changed: false,
            game_over: None,
        };
    }

    let game_over = check_termination(&board.remaining());
    if let Some(outcome) = game_over {
        info!(%team, ?outcome, "Reveal ended the game");
        expose_remaining(board);
    }

    RevealOutcome {
        card,
        team,
        changed: true,
        game_over,
    }
}

/// Flips every face-down card without evaluating termination.
#[instrument(skip(board))]
pub(super) fn expose_remaining(board: &mut BoardSnapshot) {
    let hidden = board.hidden_ids();
    debug!(count = hidden.len(), "Exposing remaining cards");
    for id in hidden {
        board.reveal(id, RevealCause::Endgame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::codenames::board::tests::standard_layout;
    use crate::games::codenames::phases::LossCause;

    fn id(raw: u8) -> CardId {
        CardId::new(raw).expect("valid id")
    }

    #[test]
    fn test_reveal_reports_team() {
        let mut board = BoardSnapshot::new(standard_layout()).expect("valid board");
        let outcome = apply_reveal(&mut board, id(12), RevealCause::Guess);
        assert!(outcome.changed());
        assert_eq!(outcome.team(), Team::Red);
        assert!(!outcome.is_game_over());
        assert_eq!(board.remaining().get(Team::Red), 7);
    }

    #[test]
    fn test_second_reveal_is_noop() {
        let mut board = BoardSnapshot::new(standard_layout()).expect("valid board");
        apply_reveal(&mut board, id(1), RevealCause::Guess);
        let again = apply_reveal(&mut board, id(1), RevealCause::Opponent);
        assert!(!again.changed());
        assert_eq!(board.remaining().get(Team::Blue), 8);
    }

    #[test]
    fn test_assassin_exposes_whole_board() {
        let mut board = BoardSnapshot::new(standard_layout()).expect("valid board");
        let outcome = apply_reveal(&mut board, id(25), RevealCause::Guess);
        assert_eq!(outcome.game_over(), Some(Outcome::Loss(LossCause::Assassin)));
        assert_eq!(outcome.winner(), Some(Side::Opponent));
        assert!(board.cards().iter().all(|c| c.is_revealed()));
        assert_eq!(board.card(id(25)).revealed_by(), Some(RevealCause::Guess));
        assert_eq!(board.card(id(1)).revealed_by(), Some(RevealCause::Endgame));
        assert_eq!(board.remaining().total(), 0);
    }

    #[test]
    fn test_last_human_card_wins() {
        let mut board = BoardSnapshot::new(standard_layout()).expect("valid board");
        for raw in 1..9 {
            assert!(!apply_reveal(&mut board, id(raw), RevealCause::Guess).is_game_over());
        }
        let outcome = apply_reveal(&mut board, id(9), RevealCause::Guess);
        assert_eq!(outcome.game_over(), Some(Outcome::Win));
        assert_eq!(board.unpicked().get(Team::Red), 8);
    }
}
