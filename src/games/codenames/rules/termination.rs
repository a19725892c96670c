//! Termination predicate.

use super::super::board::TeamCounts;
use super::super::phases::{LossCause, Outcome};
use super::super::types::Team;
use tracing::instrument;

/// Decides whether the game is over given the face-down counters.
///
/// Loss conditions are checked before the win condition, so a board
/// where both the assassin and the last human card are gone reads as a
/// loss.
#[instrument]
pub fn check_termination(remaining: &TeamCounts) -> Option<Outcome> {
    if remaining.get(Team::Assassin) == 0 {
        return Some(Outcome::Loss(LossCause::Assassin));
    }
    if remaining.get(Team::OPPONENT) == 0 {
        return Some(Outcome::Loss(LossCause::OpponentCleared));
    }
    if remaining.get(Team::HUMAN) == 0 {
        return Some(Outcome::Win);
    }
    None
}
