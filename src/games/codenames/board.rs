//! The authoritative board snapshot: 25 cards plus turn metadata.

use super::invariants::{BoardInvariants, InvariantSet};
use super::phases::TurnPhase;
use super::types::{BOARD_SIZE, Card, CardId, Clue, Difficulty, RevealCause, Team};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, instrument, trace};

/// Board error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", message, file, line)]
pub struct BoardError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for BoardError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

/// Per-team card counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamCounts {
    blue: u8,
    red: u8,
    neutral: u8,
    assassin: u8,
}

impl TeamCounts {
    /// Counts the given cards by team.
    pub fn tally<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut counts = Self::default();
        for card in cards {
            *counts.slot_mut(card.team()) += 1;
        }
        counts
    }

    /// Counter for one team.
    pub fn get(&self, team: Team) -> u8 {
        match team {
            Team::Blue => self.blue,
            Team::Red => self.red,
            Team::Neutral => self.neutral,
            Team::Assassin => self.assassin,
        }
    }

    /// Sum over all teams.
    pub fn total(&self) -> u8 {
        self.blue + self.red + self.neutral + self.assassin
    }

    fn slot_mut(&mut self, team: Team) -> &mut u8 {
        match team {
            Team::Blue => &mut self.blue,
            Team::Red => &mut self.red,
            Team::Neutral => &mut self.neutral,
            Team::Assassin => &mut self.assassin,
        }
    }

    fn decrement(&mut self, team: Team) {
        let slot = self.slot_mut(team);
        *slot = slot.saturating_sub(1);
    }
}

/// Canonical in-memory state of one game.
///
/// Cards are stored in identity order. Only the reveal engine and the
/// turn controller mutate a snapshot; everything else reads it.
/// Deserialized snapshots go through the same checks as a fresh deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRecord")]
pub struct BoardSnapshot {
    cards: Vec<Card>,
    initial: TeamCounts,
    remaining: TeamCounts,
    phase: TurnPhase,
    remaining_guesses: u8,
    clue_size: Option<u8>,
    clue: Option<Clue>,
    issued_clues: Vec<String>,
    opponent_queue: VecDeque<CardId>,
    difficulty: Difficulty,
}

/// Serialized snapshot fields, checked before they become a board.
#[derive(Deserialize)]
struct SnapshotRecord {
    cards: Vec<Card>,
    initial: TeamCounts,
    remaining: TeamCounts,
    phase: TurnPhase,
    remaining_guesses: u8,
    clue_size: Option<u8>,
    clue: Option<Clue>,
    issued_clues: Vec<String>,
    opponent_queue: VecDeque<CardId>,
    difficulty: Difficulty,
}

impl TryFrom<SnapshotRecord> for BoardSnapshot {
    type Error = BoardError;

    #[instrument(skip(record), fields(cards = record.cards.len(), phase = %record.phase))]
    fn try_from(record: SnapshotRecord) -> Result<Self, Self::Error> {
        let mut board = Self::from_cards(record.cards)?;
        if board.initial != record.initial || board.remaining != record.remaining {
            return Err(BoardError::new("Stored counters disagree with the cards"));
        }

        board.phase = record.phase;
        board.remaining_guesses = record.remaining_guesses;
        board.clue_size = record.clue_size;
        board.clue = record.clue;
        board.issued_clues = record.issued_clues;
        board.opponent_queue = record.opponent_queue;
        board.difficulty = record.difficulty;

        BoardInvariants::check_all(&board).map_err(|violations| {
            let described: Vec<String> = violations.into_iter().map(|v| v.description).collect();
            BoardError::new(format!("Board invariants violated: {}", described.join("; ")))
        })?;
        Ok(board)
    }
}

impl BoardSnapshot {
    /// Builds a fresh board from 25 (word, team) pairs in identity order.
    ///
    /// # Errors
    ///
    /// Returns `BoardError` unless there are exactly 25 non-empty words
    /// and exactly one assassin.
    #[instrument(skip(layout), fields(cards = layout.len()))]
    pub fn new(layout: Vec<(String, Team)>) -> Result<Self, BoardError> {
        let cards = layout
            .into_iter()
            .enumerate()
            .map(|(index, (word, team))| {
                CardId::from_index(index)
                    .map(|id| Card::new(id, word, team))
                    .ok_or_else(|| BoardError::new(format!("More than {} cards", BOARD_SIZE)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cards(cards)
    }

    /// Builds a snapshot around existing cards. Counters are derived from
    /// the cards; metadata starts at its defaults.
    #[instrument(skip(cards), fields(cards = cards.len()))]
    pub(super) fn from_cards(cards: Vec<Card>) -> Result<Self, BoardError> {
        if cards.len() != BOARD_SIZE {
            return Err(BoardError::new(format!(
                "Board needs {} cards, got {}",
                BOARD_SIZE,
                cards.len()
            )));
        }
        for (index, card) in cards.iter().enumerate() {
            if card.id().index() != index {
                return Err(BoardError::new(format!(
                    "Card {} stored at position {}",
                    card.id(),
                    index + 1
                )));
            }
            if card.word().trim().is_empty() {
                return Err(BoardError::new(format!("Card {} has no word", card.id())));
            }
        }

        let initial = TeamCounts::tally(&cards);
        if initial.get(Team::Assassin) != 1 {
            return Err(BoardError::new(format!(
                "Board needs exactly one assassin, got {}",
                initial.get(Team::Assassin)
            )));
        }
        let remaining = TeamCounts::tally(cards.iter().filter(|c| !c.is_revealed()));
        debug!(?initial, ?remaining, "Board snapshot created");

        Ok(Self {
            cards,
            initial,
            remaining,
            phase: TurnPhase::default(),
            remaining_guesses: 0,
            clue_size: None,
            clue: None,
            issued_clues: Vec::new(),
            opponent_queue: VecDeque::new(),
            difficulty: Difficulty::default(),
        })
    }

    /// Sets the starting difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// The card with the given identity.
    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }

    /// All cards in identity order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Team sizes at deal time.
    pub fn initial(&self) -> TeamCounts {
        self.initial
    }

    /// Face-down cards per team.
    pub fn remaining(&self) -> TeamCounts {
        self.remaining
    }

    /// Cards per team not yet picked by either side. Cards exposed by the
    /// end-of-game reveal still count here.
    pub fn unpicked(&self) -> TeamCounts {
        TeamCounts::tally(
            self.cards
                .iter()
                .filter(|c| matches!(c.revealed_by(), None | Some(RevealCause::Endgame))),
        )
    }

    /// Current turn phase.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Guesses left in the current human turn.
    pub fn remaining_guesses(&self) -> u8 {
        self.remaining_guesses
    }

    /// Clue size chosen for the current round.
    pub fn clue_size(&self) -> Option<u8> {
        self.clue_size
    }

    /// Clue for the current round.
    pub fn clue(&self) -> Option<&Clue> {
        self.clue.as_ref()
    }

    /// Every clue issued so far, oldest first.
    pub fn issued_clues(&self) -> &[String] {
        &self.issued_clues
    }

    /// Opponent moves not yet replayed.
    pub fn opponent_queue(&self) -> &VecDeque<CardId> {
        &self.opponent_queue
    }

    /// Difficulty passthrough.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Identities of face-down cards.
    pub fn hidden_ids(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|c| !c.is_revealed())
            .map(Card::id)
            .collect()
    }

    /// Finds a card by word, ignoring case and whitespace.
    #[instrument(skip(self))]
    pub fn find_by_word(&self, word: &str) -> Option<CardId> {
        let wanted = normalize(word);
        self.cards
            .iter()
            .find(|c| normalize(c.word()) == wanted)
            .map(Card::id)
    }

    /// Formats the board as a 5x5 grid for logs and the CLI.
    pub fn display(&self) -> String {
        let width = self.cards.iter().map(|c| c.word().len()).max().unwrap_or(0) + 2;
        let mut result = String::new();
        for row in self.cards.chunks(5) {
            let line = row
                .iter()
                .map(|card| {
                    let label = if card.is_revealed() {
                        format!("[{}]", card.team().to_string().to_uppercase())
                    } else {
                        card.word().to_string()
                    };
                    format!("{:<width$}", label, width = width.max(12))
                })
                .collect::<Vec<_>>()
                .join(" ");
            result.push_str(line.trim_end());
            result.push('\n');
        }
        result
    }

    /// Flips a card face up and decrements its team's counter.
    ///
    /// No-op returning false when the card is already face up. This is
    /// the only way revealed state changes.
    pub(super) fn reveal(&mut self, id: CardId, cause: RevealCause) -> bool {
        let card = &mut self.cards[id.index()];
        if !card.mark_revealed(cause) {
            trace!(card = %id, "Reveal skipped, card already face up");
            return false;
        }
        let team = card.team();
        self.remaining.decrement(team);
        trace!(card = %id, %team, ?cause, "Card revealed");
        true
    }

    pub(super) fn set_phase(&mut self, phase: TurnPhase) {
        self.phase = phase;
    }

    pub(super) fn set_remaining_guesses(&mut self, guesses: u8) {
        self.remaining_guesses = guesses;
    }

    /// Uses one guess and returns how many are left.
    pub(super) fn spend_guess(&mut self) -> u8 {
        self.remaining_guesses = self.remaining_guesses.saturating_sub(1);
        self.remaining_guesses
    }

    pub(super) fn set_clue_size(&mut self, size: Option<u8>) {
        self.clue_size = size;
    }

    /// Stores the clue for this round and adds it to the issued list.
    pub(super) fn record_clue(&mut self, clue: Clue) {
        self.issued_clues.push(clue.word.clone());
        self.clue = Some(clue);
    }

    pub(super) fn restore_clue(&mut self, clue: Option<Clue>, issued: Vec<String>) {
        self.clue = clue;
        self.issued_clues = issued;
    }

    pub(super) fn clear_round(&mut self) {
        self.clue = None;
        self.clue_size = None;
        self.remaining_guesses = 0;
    }

    pub(super) fn load_queue(&mut self, moves: Vec<CardId>) {
        self.opponent_queue = moves.into();
    }

    pub(super) fn pop_queue(&mut self) -> Option<CardId> {
        self.opponent_queue.pop_front()
    }

    pub(super) fn clear_queue(&mut self) {
        self.opponent_queue.clear();
    }

    pub(super) fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }
}

fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Nine blue, eight red, seven neutral, one assassin, in id order.
    pub(crate) fn standard_layout() -> Vec<(String, Team)> {
        (0..BOARD_SIZE)
            .map(|i| {
                let team = match i {
                    0..9 => Team::Blue,
                    9..17 => Team::Red,
                    17..24 => Team::Neutral,
                    _ => Team::Assassin,
                };
                (format!("word{}", i + 1), team)
            })
            .collect()
    }

    fn id(raw: u8) -> CardId {
        CardId::new(raw).expect("valid id")
    }

    #[test]
    fn test_new_board_counts() {
        let board = BoardSnapshot::new(standard_layout()).expect("valid board");
        assert_eq!(board.remaining().get(Team::Blue), 9);
        assert_eq!(board.remaining().get(Team::Red), 8);
        assert_eq!(board.remaining().get(Team::Neutral), 7);
        assert_eq!(board.remaining().get(Team::Assassin), 1);
        assert_eq!(board.remaining(), board.initial());
        assert_eq!(board.phase(), TurnPhase::ChoosingClueSize);
    }

    #[test]
    fn test_rejects_wrong_card_count() {
        let mut layout = standard_layout();
        layout.pop();
        assert!(BoardSnapshot::new(layout).is_err());
    }

    #[test]
    fn test_rejects_second_assassin() {
        let mut layout = standard_layout();
        layout[0].1 = Team::Assassin;
        assert!(BoardSnapshot::new(layout).is_err());
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut board = BoardSnapshot::new(standard_layout()).expect("valid board");
        assert!(board.reveal(id(10), RevealCause::Guess));
        assert!(!board.reveal(id(10), RevealCause::Opponent));
        assert_eq!(board.remaining().get(Team::Red), 7);
        assert_eq!(board.card(id(10)).revealed_by(), Some(RevealCause::Guess));
    }

    #[test]
    fn test_unpicked_ignores_endgame_exposure() {
        let mut board = BoardSnapshot::new(standard_layout()).expect("valid board");
        board.reveal(id(1), RevealCause::Guess);
        board.reveal(id(2), RevealCause::Endgame);
        assert_eq!(board.remaining().get(Team::Blue), 7);
        assert_eq!(board.unpicked().get(Team::Blue), 8);
    }

    #[test]
    fn test_find_by_word_ignores_case_and_spaces() {
        let mut layout = standard_layout();
        layout[3].0 = "ice cream".to_string();
        let board = BoardSnapshot::new(layout).expect("valid board");
        assert_eq!(board.find_by_word("IceCream"), Some(id(4)));
        assert_eq!(board.find_by_word("word1"), Some(id(1)));
        assert_eq!(board.find_by_word("missing"), None);
    }

    #[test]
    fn test_spend_guess_never_underflows() {
        let mut board = BoardSnapshot::new(standard_layout()).expect("valid board");
        board.set_remaining_guesses(1);
        assert_eq!(board.spend_guess(), 0);
        assert_eq!(board.spend_guess(), 0);
    }

    #[test]
    fn test_serialized_board_loads_back() {
        let mut board = BoardSnapshot::new(standard_layout()).expect("valid board");
        board.reveal(id(3), RevealCause::Guess);
        board.set_phase(TurnPhase::Guessing);
        board.set_remaining_guesses(2);

        let value = serde_json::to_value(&board).expect("serializes");
        let loaded: BoardSnapshot = serde_json::from_value(value).expect("loads");
        assert_eq!(loaded, board);
    }

    #[test]
    fn test_deserialize_rejects_missing_cards() {
        let board = BoardSnapshot::new(standard_layout()).expect("valid board");
        let mut value = serde_json::to_value(&board).expect("serializes");
        value["cards"] = serde_json::json!([]);
        value["phase"] = serde_json::json!("Guessing");
        value["remaining_guesses"] = serde_json::json!(2);

        assert!(serde_json::from_value::<BoardSnapshot>(value).is_err());
    }

    #[test]
    fn test_deserialize_rejects_tampered_counters() {
        let board = BoardSnapshot::new(standard_layout()).expect("valid board");
        let mut value = serde_json::to_value(&board).expect("serializes");
        value["remaining"]["blue"] = serde_json::json!(3);

        assert!(serde_json::from_value::<BoardSnapshot>(value).is_err());
    }

    #[test]
    fn test_deserialize_rejects_queue_outside_opponent_turn() {
        let board = BoardSnapshot::new(standard_layout()).expect("valid board");
        let mut value = serde_json::to_value(&board).expect("serializes");
        value["opponent_queue"] = serde_json::json!([12]);

        let error = serde_json::from_value::<BoardSnapshot>(value).expect_err("rejected");
        assert!(error.to_string().contains("Board invariants violated"));
    }
}
