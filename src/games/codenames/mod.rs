//! Client-side turn engine for a codenames-style word game.
//!
//! The human side guesses blue cards from clues supplied by a remote
//! clue-giver; the same remote plays the red side. Everything here is
//! synchronous and owns no I/O: remote work surfaces as
//! [`RequestTicket`]s the caller answers.

mod action;
mod board;
mod controller;
pub mod invariants;
mod phases;
mod reveal;
pub mod rules;
mod types;
mod wire;

pub use action::{IgnoreReason, PlayerAction};
pub use board::{BoardError, BoardSnapshot, TeamCounts};
pub use controller::{Delivery, Dispatch, RequestKind, RequestTicket, TurnController, TurnView};
pub use phases::{Controls, LossCause, MAX_CLUE_SIZE, Outcome, Side, TurnPhase};
pub use reveal::{RevealOutcome, apply_reveal};
pub use types::{BOARD_SIZE, Card, CardId, Clue, Difficulty, RevealCause, Team};
pub use wire::{UNSET, WireBoard, WireCard, WireMeta, WireState};
