//! Turn Phase Controller.
//!
//! Owns the board snapshot and is the only place phases change. Remote
//! work is modelled as tickets: the controller issues a [`RequestTicket`]
//! whenever it needs data from the remote collaborator, disables every
//! control until that ticket is answered, and discards answers whose
//! ticket no longer matches.

use super::action::{IgnoreReason, PlayerAction};
use super::board::BoardSnapshot;
use super::invariants::assert_invariants;
use super::phases::{Controls, MAX_CLUE_SIZE, Outcome, TurnPhase};
use super::reveal::{RevealOutcome, apply_reveal, expose_remaining};
use super::rules::{check_termination, clue_size_allowed, ends_turn, guess_budget};
use super::types::{CardId, Clue, Difficulty, RevealCause, Team};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Which remote operation a ticket waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum RequestKind {
    /// Clue for the chosen size.
    #[strum(to_string = "clue")]
    Clue,
    /// Opponent move sequence.
    #[strum(to_string = "opponent moves")]
    OpponentMoves,
}

impl RequestKind {
    /// Phase the controller must still be in for an answer to apply.
    pub fn expected_phase(self) -> TurnPhase {
        match self {
            RequestKind::Clue => TurnPhase::ChoosingClueSize,
            RequestKind::OpponentMoves => TurnPhase::OpponentTurn,
        }
    }
}

/// Version stamp captured when a remote request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestTicket {
    epoch: u64,
    kind: RequestKind,
}

impl RequestTicket {
    /// Controller epoch at issue time.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Operation requested.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

/// Whether a remote answer was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The answer matched the outstanding ticket and was applied.
    Applied,
    /// The answer was for a request the game has moved past; dropped.
    Stale,
}

/// Result of dispatching a player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Dropped without touching the board.
    Ignored(IgnoreReason),
    /// A card was guessed. Any follow-up request is available through
    /// [`TurnController::pending_request`].
    Revealed(RevealOutcome),
    /// Clue size accepted; a clue request is outstanding.
    ClueRequested(RequestTicket),
    /// Turn handed to the opponent; its moves are outstanding.
    TurnEnded(RequestTicket),
    /// Difficulty updated.
    DifficultyChanged(Difficulty),
}

/// Read-only view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnView {
    /// Board snapshot.
    pub board: BoardSnapshot,
    /// Enable signals per control class.
    pub controls: Controls,
    /// Remote operation being waited on, if any.
    pub awaiting: Option<RequestKind>,
    /// Remote operation that failed and awaits a manual retry.
    pub stalled: Option<RequestKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRequest {
    ticket: RequestTicket,
    stalled: bool,
}

/// State machine driving one game.
#[derive(Debug, Clone)]
pub struct TurnController {
    board: BoardSnapshot,
    epoch: u64,
    pending: Option<PendingRequest>,
}

impl TurnController {
    /// Takes ownership of a board and settles it.
    ///
    /// Fresh boards start in choosing-clue-size. Imported boards resume
    /// where they left off: a decided board is exposed and locked, a
    /// guessing turn without guesses passes to the opponent, and an
    /// opponent turn without queued moves issues the opponent request.
    #[instrument(skip(board), fields(phase = %board.phase()))]
    pub fn new(board: BoardSnapshot) -> Self {
        let mut controller = Self {
            board,
            epoch: 0,
            pending: None,
        };
        controller.settle_imported();
        assert_invariants(&controller.board);
        controller
    }

    fn settle_imported(&mut self) {
        let phase = self.board.phase();
        if let TurnPhase::GameOver(outcome) = phase {
            debug!(?outcome, "Resuming a finished board");
            self.board.clear_queue();
            self.board.set_remaining_guesses(0);
            expose_remaining(&mut self.board);
            return;
        }

        if let Some(outcome) = check_termination(&self.board.remaining()) {
            info!(?outcome, "Imported board is already decided");
            expose_remaining(&mut self.board);
            self.finish(outcome);
            return;
        }

        match phase {
            TurnPhase::ChoosingClueSize => {
                self.board.clear_queue();
                self.board.clear_round();
            }
            TurnPhase::Guessing => {
                self.board.clear_queue();
                if self.board.remaining_guesses() == 0 {
                    info!("Imported guessing turn has no guesses left");
                    self.enter_opponent_turn();
                }
            }
            TurnPhase::OpponentTurn => {
                self.board.set_remaining_guesses(0);
                if self.board.opponent_queue().is_empty() {
                    self.issue(RequestKind::OpponentMoves);
                } else {
                    info!(
                        queued = self.board.opponent_queue().len(),
                        "Resuming opponent replay"
                    );
                }
            }
            TurnPhase::GameOver(_) => {}
        }
    }

    /// Current board.
    pub fn board(&self) -> &BoardSnapshot {
        &self.board
    }

    /// Current phase.
    pub fn phase(&self) -> TurnPhase {
        self.board.phase()
    }

    /// Version counter, bumped on every phase change and request.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Outstanding request that is still in flight.
    pub fn awaiting(&self) -> Option<RequestKind> {
        self.pending
            .filter(|p| !p.stalled)
            .map(|p| p.ticket.kind)
    }

    /// Ticket of the outstanding request, stalled or not.
    pub fn pending_request(&self) -> Option<RequestTicket> {
        self.pending.map(|p| p.ticket)
    }

    /// Returns true if the outstanding request failed and awaits a retry.
    pub fn is_stalled(&self) -> bool {
        self.pending.is_some_and(|p| p.stalled)
    }

    /// Returns true if the opponent sequence has moves left to replay.
    pub fn replay_pending(&self) -> bool {
        self.pending.is_none()
            && self.board.phase() == TurnPhase::OpponentTurn
            && !self.board.opponent_queue().is_empty()
    }

    /// Enable signals for the current state.
    pub fn controls(&self) -> Controls {
        if self.pending.is_some() {
            return Controls::disabled();
        }
        match self.board.phase() {
            TurnPhase::ChoosingClueSize => {
                let human_remaining = self.board.remaining().get(Team::HUMAN);
                let mut clue_sizes = [false; MAX_CLUE_SIZE as usize];
                for (size, enabled) in (1..=MAX_CLUE_SIZE).zip(clue_sizes.iter_mut()) {
                    *enabled = clue_size_allowed(size, human_remaining);
                }
                Controls {
                    clue_sizes,
                    difficulty: true,
                    ..Controls::disabled()
                }
            }
            TurnPhase::Guessing => Controls {
                cards: true,
                end_turn: true,
                difficulty: true,
                ..Controls::disabled()
            },
            TurnPhase::OpponentTurn | TurnPhase::GameOver(_) => Controls::disabled(),
        }
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> TurnView {
        TurnView {
            board: self.board.clone(),
            controls: self.controls(),
            awaiting: self.awaiting(),
            stalled: self
                .pending
                .filter(|p| p.stalled)
                .map(|p| p.ticket.kind),
        }
    }

    /// Gives the board back.
    pub fn into_board(self) -> BoardSnapshot {
        self.board
    }

    /// Applies a player action if its control is enabled.
    #[instrument(skip(self), fields(phase = %self.board.phase(), action = %action))]
    pub fn dispatch(&mut self, action: PlayerAction) -> Dispatch {
        let result = if self.pending.is_some() {
            Dispatch::Ignored(IgnoreReason::AwaitingRemote)
        } else {
            let controls = self.controls();
            match action {
                PlayerAction::RevealCard(card) if controls.cards => self.guess(card),
                PlayerAction::ChooseClueSize(size) if controls.clue_size(size) => {
                    info!(size, "Clue size chosen");
                    self.board.set_clue_size(Some(size));
                    Dispatch::ClueRequested(self.issue(RequestKind::Clue))
                }
                PlayerAction::EndTurn if controls.end_turn => {
                    info!("Human ended the turn");
                    Dispatch::TurnEnded(self.enter_opponent_turn())
                }
                PlayerAction::SetDifficulty(difficulty) if controls.difficulty => {
                    info!(%difficulty, "Difficulty changed");
                    self.board.set_difficulty(difficulty);
                    Dispatch::DifficultyChanged(difficulty)
                }
                _ => Dispatch::Ignored(IgnoreReason::ControlDisabled {
                    control: action.control(),
                    phase: self.board.phase(),
                }),
            }
        };

        match &result {
            Dispatch::Ignored(reason) => debug!(%reason, "Action ignored"),
            _ => assert_invariants(&self.board),
        }
        result
    }

    fn guess(&mut self, card: CardId) -> Dispatch {
        if self.board.card(card).is_revealed() {
            return Dispatch::Ignored(IgnoreReason::AlreadyRevealed(card));
        }

        let guesses_left = self.board.spend_guess();
        let outcome = apply_reveal(&mut self.board, card, RevealCause::Guess);
        info!(
            card = %card,
            team = %outcome.team(),
            guesses_left,
            "Human revealed a card"
        );

        if let Some(result) = outcome.game_over() {
            self.finish(result);
        } else if ends_turn(outcome.team(), guesses_left) {
            self.enter_opponent_turn();
        }
        Dispatch::Revealed(outcome)
    }

    /// Applies a clue answering `ticket`.
    ///
    /// The guess budget comes from the size the human chose, not from the
    /// count the remote echoes back.
    #[instrument(skip(self, clue), fields(clue = %clue.word, target_count = clue.target_count))]
    pub fn accept_clue(&mut self, ticket: RequestTicket, clue: Clue) -> Delivery {
        if !self.accepts(ticket, RequestKind::Clue) {
            debug!(?ticket, "Dropping stale clue");
            return Delivery::Stale;
        }
        self.pending = None;

        let size = self.board.clue_size().unwrap_or(clue.target_count);
        if clue.target_count != size {
            warn!(size, target_count = clue.target_count, "Clue covers a different number of cards");
        }
        self.board.record_clue(clue);
        self.board.set_remaining_guesses(guess_budget(size));
        self.transition(TurnPhase::Guessing);

        assert_invariants(&self.board);
        Delivery::Applied
    }

    /// Queues an opponent move sequence answering `ticket`.
    ///
    /// An empty sequence is a pass and hands the turn straight back.
    #[instrument(skip(self, moves), fields(moves = moves.len()))]
    pub fn accept_opponent_moves(&mut self, ticket: RequestTicket, moves: Vec<CardId>) -> Delivery {
        if !self.accepts(ticket, RequestKind::OpponentMoves) {
            debug!(?ticket, "Dropping stale opponent moves");
            return Delivery::Stale;
        }
        self.pending = None;

        if moves.is_empty() {
            info!("Opponent passed");
            self.end_opponent_turn();
        } else {
            if let Some(assassin) = moves
                .iter()
                .find(|id| self.board.card(**id).team() == Team::Assassin)
            {
                warn!(card = %assassin, "Opponent sequence includes the assassin");
            }
            self.board.load_queue(moves);
        }

        assert_invariants(&self.board);
        Delivery::Applied
    }

    /// Replays the next queued opponent move.
    ///
    /// Returns `None` when there is nothing to replay. The turn returns
    /// to the human once the queue drains; a game-ending reveal drops the
    /// rest of the queue.
    #[instrument(skip(self), fields(queued = self.board.opponent_queue().len()))]
    pub fn replay_next(&mut self) -> Option<RevealOutcome> {
        if !self.replay_pending() {
            return None;
        }
        let card = self.board.pop_queue()?;
        let outcome = apply_reveal(&mut self.board, card, RevealCause::Opponent);
        info!(card = %card, team = %outcome.team(), "Opponent revealed a card");

        if let Some(result) = outcome.game_over() {
            self.finish(result);
        } else if self.board.opponent_queue().is_empty() {
            self.end_opponent_turn();
        }

        assert_invariants(&self.board);
        Some(outcome)
    }

    /// Marks the request behind `ticket` as failed.
    ///
    /// The board is left untouched and controls stay disabled until
    /// [`resume_stalled`](Self::resume_stalled) re-issues the request.
    #[instrument(skip(self))]
    pub fn report_failure(&mut self, ticket: RequestTicket) -> Delivery {
        match self.pending.as_mut() {
            Some(pending) if pending.ticket == ticket && !pending.stalled => {
                warn!(kind = %ticket.kind, "Remote request failed, game stalled");
                pending.stalled = true;
                Delivery::Applied
            }
            _ => {
                debug!(?ticket, "Dropping stale failure");
                Delivery::Stale
            }
        }
    }

    /// Re-issues a stalled request under a fresh ticket.
    #[instrument(skip(self))]
    pub fn resume_stalled(&mut self) -> Option<RequestTicket> {
        let kind = self.pending.filter(|p| p.stalled)?.ticket.kind;
        info!(%kind, "Retrying stalled request");
        Some(self.issue(kind))
    }

    fn accepts(&self, ticket: RequestTicket, kind: RequestKind) -> bool {
        ticket.kind == kind
            && self.board.phase() == kind.expected_phase()
            && self
                .pending
                .is_some_and(|p| p.ticket == ticket && !p.stalled)
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        self.epoch += 1;
        let ticket = RequestTicket {
            epoch: self.epoch,
            kind,
        };
        debug!(epoch = self.epoch, %kind, "Remote request issued");
        self.pending = Some(PendingRequest {
            ticket,
            stalled: false,
        });
        ticket
    }

    fn transition(&mut self, to: TurnPhase) {
        self.epoch += 1;
        info!(from = %self.board.phase(), %to, epoch = self.epoch, "Phase transition");
        self.board.set_phase(to);
    }

    fn enter_opponent_turn(&mut self) -> RequestTicket {
        self.board.set_remaining_guesses(0);
        self.transition(TurnPhase::OpponentTurn);
        self.issue(RequestKind::OpponentMoves)
    }

    fn end_opponent_turn(&mut self) {
        self.board.clear_queue();
        self.board.clear_round();
        self.transition(TurnPhase::ChoosingClueSize);
    }

    fn finish(&mut self, outcome: Outcome) {
        self.pending = None;
        self.board.clear_queue();
        self.board.set_remaining_guesses(0);
        self.transition(TurnPhase::GameOver(outcome));
        info!(%outcome, "Game over");
    }
}
