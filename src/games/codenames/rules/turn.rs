//! Turn-transfer rules.

use super::super::phases::MAX_CLUE_SIZE;
use super::super::types::Team;
use tracing::instrument;

/// Guesses granted for a clue of the given size: one bonus guess.
#[instrument]
pub fn guess_budget(clue_size: u8) -> u8 {
    clue_size.saturating_add(1)
}

/// A clue size is selectable if it is in 1..=3 and does not exceed the
/// human team's face-down cards.
#[instrument]
pub fn clue_size_allowed(size: u8, human_remaining: u8) -> bool {
    (1..=MAX_CLUE_SIZE).contains(&size) && size <= human_remaining
}

/// Whether a human reveal of `team` hands the turn to the opponent.
///
/// Any non-human card ends the turn immediately, whatever budget is left.
#[instrument]
pub fn ends_turn(team: Team, guesses_left: u8) -> bool {
    !team.is_human() || guesses_left == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_budget_adds_bonus() {
        assert_eq!(guess_budget(2), 3);
        assert_eq!(guess_budget(u8::MAX), u8::MAX);
    }

    #[test]
    fn test_clue_size_bounds() {
        assert!(!clue_size_allowed(0, 9));
        assert!(clue_size_allowed(3, 9));
        assert!(!clue_size_allowed(4, 9));
    }

    #[test]
    fn test_clue_size_capped_by_remaining_cards() {
        assert!(clue_size_allowed(1, 1));
        assert!(!clue_size_allowed(2, 1));
        assert!(clue_size_allowed(2, 2));
    }

    #[test]
    fn test_wrong_guess_ends_turn_regardless_of_budget() {
        assert!(ends_turn(Team::Red, 5));
        assert!(ends_turn(Team::Neutral, 5));
        assert!(!ends_turn(Team::Blue, 1));
        assert!(ends_turn(Team::Blue, 0));
    }
}
