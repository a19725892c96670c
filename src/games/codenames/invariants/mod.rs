//! First-class invariants for the codenames board.
//!
//! Invariants are logical properties that must hold after every
//! transition. The turn controller checks them in debug builds; tests
//! check them directly.

pub mod counters;
pub mod phase;

pub use counters::{CountersMatchCards, RevealsAccountedFor};
pub use phase::{GuessesOnlyWhileGuessing, QueueOnlyDuringOpponentTurn, TerminalBoardExposed};

use super::board::BoardSnapshot;
use tracing::{instrument, warn};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($name:ident),+) => {
        impl<S, $($name),+> InvariantSet<S> for ($($name,)+)
        where
            $($name: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$name::holds(state) {
                        violations.push(InvariantViolation::new($name::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4, I5);

/// All board invariants as a composable set.
pub type BoardInvariants = (
    CountersMatchCards,
    RevealsAccountedFor,
    QueueOnlyDuringOpponentTurn,
    GuessesOnlyWhileGuessing,
    TerminalBoardExposed,
);

/// Checks every board invariant, logging violations and panicking on
/// them in debug builds.
#[instrument(skip(board), fields(phase = %board.phase()))]
pub fn assert_invariants(board: &BoardSnapshot) {
    let violations = BoardInvariants::check_all(board).err().unwrap_or_default();
    for violation in &violations {
        warn!(invariant = %violation.description, "Board invariant violated");
    }
    debug_assert!(
        violations.is_empty(),
        "Board invariants violated: {:?}",
        violations
    );
}
