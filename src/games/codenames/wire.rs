//! JSON board record exchanged with the remote collaborator.
//!
//! The record is an array: a metadata object followed by 25 card
//! objects in identity order.
//!
//! ```json
//! [{"clue": "", "target": -1, "red_remaining": 8, "blue_remaining": 9,
//!   "neutral_remaining": 7, "assassin_remaining": 1, "difficulty": "easy",
//!   "state": "choose_clue", "remaining_guesses": -1, "sequence": [],
//!   "invalid_guesses": []},
//!  {"name": "apple", "type": "blue", "colour": "#0080FF", "active": false},
//!  ...]
//! ```

use super::board::{BoardError, BoardSnapshot, TeamCounts};
use super::phases::{LossCause, Outcome, TurnPhase};
use super::types::{BOARD_SIZE, Card, CardId, Clue, Difficulty, RevealCause, Team};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Sentinel for unset integer fields.
pub const UNSET: i32 = -1;

fn unset() -> i32 {
    UNSET
}

/// Phase names used on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireState {
    /// Choosing clue size.
    #[default]
    ChooseClue,
    /// Guessing.
    MakeGuess,
    /// Opponent turn.
    ComputerTurn,
    /// Human won.
    Win,
    /// Human lost.
    Lose,
}

impl From<TurnPhase> for WireState {
    fn from(phase: TurnPhase) -> Self {
        match phase {
            TurnPhase::ChoosingClueSize => WireState::ChooseClue,
            TurnPhase::Guessing => WireState::MakeGuess,
            TurnPhase::OpponentTurn => WireState::ComputerTurn,
            TurnPhase::GameOver(Outcome::Win) => WireState::Win,
            TurnPhase::GameOver(Outcome::Loss(_)) => WireState::Lose,
        }
    }
}

/// Metadata record, first element of the array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMeta {
    /// Current clue word, empty when none.
    #[serde(default)]
    pub clue: String,
    /// Chosen clue size, or -1.
    #[serde(default = "unset")]
    pub target: i32,
    /// Red cards not yet picked.
    #[serde(default)]
    pub red_remaining: i32,
    /// Blue cards not yet picked.
    #[serde(default)]
    pub blue_remaining: i32,
    /// Neutral cards not yet picked.
    #[serde(default)]
    pub neutral_remaining: i32,
    /// Assassin cards not yet picked.
    #[serde(default)]
    pub assassin_remaining: i32,
    /// Opponent strength.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Phase.
    #[serde(default)]
    pub state: WireState,
    /// Guesses left, or -1 outside the guessing phase.
    #[serde(default = "unset")]
    pub remaining_guesses: i32,
    /// Queued opponent moves, by word.
    #[serde(default)]
    pub sequence: Vec<String>,
    /// Every clue issued so far.
    #[serde(default)]
    pub invalid_guesses: Vec<String>,
}

/// One card record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCard {
    /// Word on the card.
    pub name: String,
    /// Team affiliation.
    #[serde(rename = "type")]
    pub team: Team,
    /// Display colour.
    pub colour: String,
    /// Face up.
    #[serde(default)]
    pub active: bool,
}

/// A whole board as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireBoard {
    /// Metadata record.
    pub meta: WireMeta,
    /// Cards in identity order.
    pub cards: Vec<WireCard>,
}

impl WireBoard {
    /// Parses a wire board from JSON text.
    #[instrument(skip(json), fields(len = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes to JSON text.
    pub fn to_json(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for WireBoard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.cards.len() + 1))?;
        seq.serialize_element(&self.meta)?;
        for card in &self.cards {
            seq.serialize_element(card)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for WireBoard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WireBoardVisitor;

        impl<'de> Visitor<'de> for WireBoardVisitor {
            type Value = WireBoard;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an array of a metadata record followed by card records")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<WireBoard, A::Error> {
                let meta = seq
                    .next_element::<WireMeta>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let mut cards = Vec::with_capacity(BOARD_SIZE);
                while let Some(card) = seq.next_element::<WireCard>()? {
                    cards.push(card);
                }
                Ok(WireBoard { meta, cards })
            }
        }

        deserializer.deserialize_seq(WireBoardVisitor)
    }
}

fn count(counts: &TeamCounts, team: Team) -> i32 {
    i32::from(counts.get(team))
}

impl WireMeta {
    fn claimed_counters(&self) -> [(Team, i32); 4] {
        [
            (Team::Blue, self.blue_remaining),
            (Team::Red, self.red_remaining),
            (Team::Neutral, self.neutral_remaining),
            (Team::Assassin, self.assassin_remaining),
        ]
    }
}

/// Face-up cards per team that were picked rather than exposed at the end.
///
/// Only a finished board distinguishes the two: its counters still count
/// cards exposed by the end-of-game reveal.
fn picked_per_team(meta: &WireMeta, cards: &[WireCard]) -> HashMap<Team, usize> {
    let finished = matches!(meta.state, WireState::Win | WireState::Lose);
    meta.claimed_counters()
        .into_iter()
        .map(|(team, claimed)| {
            let dealt = cards.iter().filter(|c| c.team == team).count();
            let face_up = cards.iter().filter(|c| c.team == team && c.active).count();
            let picked = if finished {
                let unpicked = usize::try_from(claimed.max(0)).unwrap_or(usize::MAX);
                dealt.saturating_sub(unpicked).min(face_up)
            } else {
                face_up
            };
            (team, picked)
        })
        .collect()
}

impl From<&BoardSnapshot> for WireBoard {
    fn from(board: &BoardSnapshot) -> Self {
        let unpicked = board.unpicked();
        let meta = WireMeta {
            clue: board.clue().map(|c| c.word.clone()).unwrap_or_default(),
            target: board.clue_size().map(i32::from).unwrap_or(UNSET),
            red_remaining: count(&unpicked, Team::Red),
            blue_remaining: count(&unpicked, Team::Blue),
            neutral_remaining: count(&unpicked, Team::Neutral),
            assassin_remaining: count(&unpicked, Team::Assassin),
            difficulty: board.difficulty(),
            state: board.phase().into(),
            remaining_guesses: if board.phase() == TurnPhase::Guessing {
                i32::from(board.remaining_guesses())
            } else {
                UNSET
            },
            sequence: board
                .opponent_queue()
                .iter()
                .map(|id| board.card(*id).word().to_string())
                .collect(),
            invalid_guesses: board.issued_clues().to_vec(),
        };
        let cards = board
            .cards()
            .iter()
            .map(|card| WireCard {
                name: card.word().to_string(),
                team: card.team(),
                colour: card.colour().to_string(),
                active: card.is_revealed(),
            })
            .collect();
        WireBoard { meta, cards }
    }
}

impl TryFrom<WireBoard> for BoardSnapshot {
    type Error = BoardError;

    /// Imports a wire board.
    ///
    /// Face-up cards are recorded as picked. On a finished board the wire
    /// counters tell how many of each team were picked; the remaining
    /// face-up cards of that team count as exposed at the end, so the
    /// board exports the same counters again. Which of a team's face-up
    /// cards were picked is not on the wire; lower ids are taken first.
    ///
    /// Counters are otherwise derived from the cards; disagreeing wire
    /// counters are logged and ignored, except that a lost game reads its
    /// cause from the assassin counter.
    #[instrument(skip(wire), fields(state = ?wire.meta.state, cards = wire.cards.len()))]
    fn try_from(wire: WireBoard) -> Result<Self, Self::Error> {
        let WireBoard { meta, cards } = wire;
        let mut picks_left = picked_per_team(&meta, &cards);
        let cards = cards
            .into_iter()
            .enumerate()
            .map(|(index, wire_card)| {
                let id = CardId::from_index(index)
                    .ok_or_else(|| BoardError::new(format!("More than {} cards", BOARD_SIZE)))?;
                let mut card = Card::new(id, wire_card.name, wire_card.team).with_colour(wire_card.colour);
                if wire_card.active {
                    let cause = match picks_left.get_mut(&wire_card.team) {
                        Some(left) if *left > 0 => {
                            *left -= 1;
                            RevealCause::Guess
                        }
                        _ => RevealCause::Endgame,
                    };
                    card.mark_revealed(cause);
                }
                Ok(card)
            })
            .collect::<Result<Vec<_>, BoardError>>()?;

        let mut board = BoardSnapshot::from_cards(cards)?.with_difficulty(meta.difficulty);

        let unpicked = board.unpicked();
        for (team, claimed) in meta.claimed_counters() {
            let actual = count(&unpicked, team);
            if claimed != actual {
                warn!(%team, claimed, actual, "Wire counter disagrees with cards");
            }
        }

        let phase = match meta.state {
            WireState::ChooseClue => TurnPhase::ChoosingClueSize,
            WireState::MakeGuess => TurnPhase::Guessing,
            WireState::ComputerTurn => TurnPhase::OpponentTurn,
            WireState::Win => TurnPhase::GameOver(Outcome::Win),
            WireState::Lose if meta.assassin_remaining == 0 => {
                TurnPhase::GameOver(Outcome::Loss(LossCause::Assassin))
            }
            WireState::Lose => TurnPhase::GameOver(Outcome::Loss(LossCause::OpponentCleared)),
        };
        board.set_phase(phase);

        if phase == TurnPhase::Guessing {
            let guesses = u8::try_from(meta.remaining_guesses.max(0)).unwrap_or(u8::MAX);
            board.set_remaining_guesses(guesses);
        }

        let clue_size = u8::try_from(meta.target).ok().filter(|size| *size > 0);
        board.set_clue_size(clue_size);
        let clue = (!meta.clue.is_empty())
            .then(|| Clue::new(meta.clue, clue_size.unwrap_or_default(), Vec::new()));
        board.restore_clue(clue, meta.invalid_guesses);

        let queue = meta
            .sequence
            .iter()
            .map(|word| {
                board
                    .find_by_word(word)
                    .ok_or_else(|| BoardError::new(format!("Sequence names unknown card '{}'", word)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        board.load_queue(queue);

        debug!(phase = %board.phase(), "Wire board imported");
        Ok(board)
    }
}
