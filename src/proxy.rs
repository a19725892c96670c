//! Remote Move Proxy.
//!
//! Turns remote answers into typed domain values and replays opponent
//! sequences through the turn controller at a visible pace.

use crate::games::codenames::{
    BoardSnapshot, CardId, Clue, RevealOutcome, TurnController, WireBoard,
};
use crate::remote::{RemoteCollaborator, RemoteError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default delay between replayed opponent reveals.
pub const DEFAULT_PACING: Duration = Duration::from_millis(1000);

/// Boundary between the turn controller and the remote collaborator.
#[derive(Debug, Clone)]
pub struct RemoteMoveProxy<R> {
    remote: R,
    pacing: Duration,
    publish_updates: bool,
}

impl<R: RemoteCollaborator> RemoteMoveProxy<R> {
    /// Creates a proxy with the given replay pacing.
    pub fn new(remote: R, pacing: Duration) -> Self {
        Self {
            remote,
            pacing,
            publish_updates: false,
        }
    }

    /// Enables sending settled boards to the remote's update endpoint.
    pub fn with_publish_updates(mut self, enabled: bool) -> Self {
        self.publish_updates = enabled;
        self
    }

    /// The wrapped collaborator.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Delay between replayed reveals.
    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Fetches a freshly dealt board.
    #[instrument(skip(self))]
    pub async fn new_board(&self) -> Result<BoardSnapshot, RemoteError> {
        let wire = self.remote.request_new_board().await?;
        let board = BoardSnapshot::try_from(wire)
            .map_err(|e| RemoteError::protocol(format!("dealt board rejected: {}", e.message)))?;
        info!("New board received");
        Ok(board)
    }

    /// Requests a clue for the board's chosen clue size.
    ///
    /// The request carries every clue issued so far so the remote can
    /// avoid repeats.
    #[instrument(skip(self, board), fields(issued = board.issued_clues().len()))]
    pub async fn request_clue(&self, board: &BoardSnapshot) -> Result<Clue, RemoteError> {
        let response = self.remote.request_clue(&WireBoard::from(board)).await?;

        let word = response.clue.trim();
        if word.is_empty() {
            return Err(RemoteError::protocol("clue is empty"));
        }
        let target_count = u8::try_from(response.target_count)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                RemoteError::protocol(format!("clue target count {}", response.target_count))
            })?;
        let targets = response
            .target_cards
            .iter()
            .map(|card| card.resolve(board))
            .collect::<Result<Vec<_>, _>>()?;

        info!(clue = %word, target_count, "Clue received");
        Ok(Clue::new(word.to_string(), target_count, targets))
    }

    /// Requests the opponent's moves, resolved against `board`.
    ///
    /// Nothing is applied if any move fails to resolve.
    #[instrument(skip(self, board))]
    pub async fn request_opponent_moves(
        &self,
        board: &BoardSnapshot,
    ) -> Result<Vec<CardId>, RemoteError> {
        let response = self
            .remote
            .request_opponent_moves(&WireBoard::from(board))
            .await?;
        let moves = response
            .moves
            .iter()
            .map(|card| card.resolve(board))
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = moves.len(), "Opponent moves received");
        Ok(moves)
    }

    /// Replays queued opponent moves one at a time.
    ///
    /// `observe` sees each reveal as soon as it is applied. The pacing
    /// delay separates consecutive reveals; replay stops as soon as the
    /// controller has nothing left to replay, which includes a reveal
    /// that ends the game.
    #[instrument(skip(self, controller, observe), fields(queued = controller.board().opponent_queue().len()))]
    pub async fn replay<F>(&self, controller: &mut TurnController, mut observe: F) -> usize
    where
        F: FnMut(&RevealOutcome, &TurnController),
    {
        let mut replayed = 0;
        while let Some(outcome) = controller.replay_next() {
            replayed += 1;
            observe(&outcome, controller);
            if controller.replay_pending() && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }
        debug!(replayed, "Replay finished");
        replayed
    }

    /// Sends the board to the update endpoint when publishing is enabled.
    /// Failures are logged and otherwise ignored.
    #[instrument(skip(self, board), fields(enabled = self.publish_updates))]
    pub async fn publish(&self, board: &BoardSnapshot) {
        if !self.publish_updates {
            return;
        }
        if let Err(e) = self.remote.publish_update(&WireBoard::from(board)).await {
            warn!(error = %e, "Publishing board update failed");
        }
    }
}
