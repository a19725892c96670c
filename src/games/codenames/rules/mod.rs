//! Game rules for codenames.
//!
//! Pure functions over counters and phase data. The reveal engine and
//! the turn controller call into these; nothing here mutates state.

pub mod termination;
pub mod turn;

pub use termination::check_termination;
pub use turn::{clue_size_allowed, ends_turn, guess_budget};
