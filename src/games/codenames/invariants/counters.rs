//! Counter invariants: team counters always agree with the cards.

use super::super::board::{BoardSnapshot, TeamCounts};
use super::Invariant;
use strum::IntoEnumIterator;
use super::super::types::Team;

/// Invariant: each team counter equals that team's face-down cards.
pub struct CountersMatchCards;

impl Invariant<BoardSnapshot> for CountersMatchCards {
    fn holds(board: &BoardSnapshot) -> bool {
        let face_down = TeamCounts::tally(board.cards().iter().filter(|c| !c.is_revealed()));
        face_down == board.remaining()
    }

    fn description() -> &'static str {
        "Team counters equal the face-down cards of each team"
    }
}

/// Invariant: face-down plus face-up cards equal the team's initial count.
pub struct RevealsAccountedFor;

impl Invariant<BoardSnapshot> for RevealsAccountedFor {
    fn holds(board: &BoardSnapshot) -> bool {
        let face_up = TeamCounts::tally(board.cards().iter().filter(|c| c.is_revealed()));
        Team::iter().all(|team| {
            u16::from(board.remaining().get(team)) + u16::from(face_up.get(team))
                == u16::from(board.initial().get(team))
        })
    }

    fn description() -> &'static str {
        "Revealed plus unrevealed cards equal each team's initial count"
    }
}
