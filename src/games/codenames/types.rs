//! Core domain types for the codenames board.

use super::board::BoardError;
use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cards on a board.
pub const BOARD_SIZE: usize = 25;

/// Team affiliation of a card.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Team {
    /// The human side.
    Blue,
    /// The remote opponent.
    Red,
    /// Bystanders; revealing one ends the human turn.
    Neutral,
    /// Revealing it loses the game.
    Assassin,
}

impl Team {
    /// Team the local player guesses for.
    pub const HUMAN: Team = Team::Blue;

    /// Team the remote opponent plays.
    pub const OPPONENT: Team = Team::Red;

    /// Default display colour for cards of this team.
    #[instrument]
    pub fn colour(self) -> &'static str {
        match self {
            Team::Blue => "#0080FF",
            Team::Red => "#FF0000",
            Team::Neutral => "#D0D0D0",
            Team::Assassin => "#202020",
        }
    }

    /// Returns true for the human team.
    pub fn is_human(self) -> bool {
        self == Team::HUMAN
    }
}

/// Identity of a card on the board (1..=25).
///
/// The board stores cards in identity order, so a `CardId` always
/// addresses exactly one card.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(try_from = "u8", into = "u8")]
#[display("#{}", _0)]
pub struct CardId(u8);

impl CardId {
    /// Smallest valid identity.
    pub const FIRST: CardId = CardId(1);

    /// Largest valid identity.
    pub const LAST: CardId = CardId(BOARD_SIZE as u8);

    /// Creates an identity, or `None` if outside 1..=25.
    pub fn new(raw: u8) -> Option<Self> {
        (1..=BOARD_SIZE as u8).contains(&raw).then_some(Self(raw))
    }

    /// Creates an identity from a zero-based board index.
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index + 1).ok().and_then(Self::new)
    }

    /// Zero-based board index.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Raw identity value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// All identities in board order.
    pub fn all() -> impl Iterator<Item = CardId> {
        (1..=BOARD_SIZE as u8).map(CardId)
    }
}

impl TryFrom<u8> for CardId {
    type Error = BoardError;

    #[track_caller]
    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
            .ok_or_else(|| BoardError::new(format!("Card id {} outside 1..={}", raw, BOARD_SIZE)))
    }
}

impl From<CardId> for u8 {
    fn from(id: CardId) -> Self {
        id.0
    }
}

/// How a card came to be revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevealCause {
    /// The human picked it.
    Guess,
    /// Replayed from the opponent's move sequence.
    Opponent,
    /// Exposed when the game ended.
    Endgame,
}

/// A single card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    word: String,
    team: Team,
    colour: String,
    revealed: Option<RevealCause>,
}

impl Card {
    /// Creates a hidden card with the team's default colour.
    pub fn new(id: CardId, word: impl Into<String>, team: Team) -> Self {
        Self {
            id,
            word: word.into(),
            team,
            colour: team.colour().to_string(),
            revealed: None,
        }
    }

    /// Overrides the display colour.
    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = colour.into();
        self
    }

    /// Card identity.
    pub fn id(&self) -> CardId {
        self.id
    }

    /// The word printed on the card.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Team affiliation.
    pub fn team(&self) -> Team {
        self.team
    }

    /// Display colour.
    pub fn colour(&self) -> &str {
        &self.colour
    }

    /// Whether the card is face up.
    pub fn is_revealed(&self) -> bool {
        self.revealed.is_some()
    }

    /// How the card was revealed, if it was.
    pub fn revealed_by(&self) -> Option<RevealCause> {
        self.revealed
    }

    /// Flips the card face up. Returns false if it already was.
    pub(super) fn mark_revealed(&mut self, cause: RevealCause) -> bool {
        if self.revealed.is_some() {
            return false;
        }
        self.revealed = Some(cause);
        true
    }
}

/// A clue issued by the remote clue-giver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Clue {
    /// The clue word.
    pub word: String,
    /// How many cards the clue points at.
    pub target_count: u8,
    /// Cards the clue-giver had in mind, when it says.
    pub targets: Vec<CardId>,
}

/// Opponent strength. Stored on the snapshot and forwarded to the remote
/// collaborator; the turn engine never interprets it.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Opponent rarely finds its own cards.
    #[default]
    Easy,
    /// Middle ground.
    Medium,
    /// Opponent never helps the human side.
    Hard,
}

impl Difficulty {
    /// Cycles to the next setting.
    #[instrument]
    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }
}
