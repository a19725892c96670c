//! Game orchestration between the player and the remote collaborator.

use crate::games::codenames::{
    Clue, Delivery, Dispatch, Outcome, PlayerAction, RequestKind, RequestTicket, RevealOutcome,
    TurnController, TurnView,
};
use crate::proxy::RemoteMoveProxy;
use crate::remote::{RemoteCollaborator, RemoteError};
use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Messages sent from orchestrator to UI.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Board, controls or waiting state changed.
    StateChanged(Box<TurnView>),
    /// A remote request went out; controls are disabled.
    AwaitingRemote(RequestKind),
    /// New clue for the human.
    ClueReceived(Clue),
    /// A card was flipped by either side.
    CardRevealed(RevealOutcome),
    /// A remote request failed; the game is stalled until a retry.
    RemoteFailed {
        /// Request that failed.
        kind: RequestKind,
        /// Error text for display.
        message: String,
    },
    /// Game ended.
    GameOver(Outcome),
}

/// Input from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    /// A player action.
    Act(PlayerAction),
    /// Retry the stalled remote request.
    Retry,
}

/// Drives a [`TurnController`] against a remote collaborator.
///
/// All board mutation happens on the task running the orchestrator; the
/// UI only sends commands and receives events.
pub struct GameOrchestrator<R> {
    controller: TurnController,
    proxy: RemoteMoveProxy<R>,
    event_tx: mpsc::UnboundedSender<GameEvent>,
    announced: bool,
}

impl<R: RemoteCollaborator> GameOrchestrator<R> {
    /// Creates a new orchestrator.
    pub fn new(
        controller: TurnController,
        proxy: RemoteMoveProxy<R>,
        event_tx: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self {
            controller,
            proxy,
            event_tx,
            announced: false,
        }
    }

    /// Current controller state.
    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// Runs the game loop until the command channel closes.
    ///
    /// Commands that pile up while controls were disabled (waiting on the
    /// remote or replaying opponent moves) are discarded.
    #[instrument(skip(self, commands))]
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<ClientCommand>,
    ) -> Result<TurnController> {
        info!("Starting game orchestration");
        self.settle().await?;

        while let Some(command) = commands.recv().await {
            let suspended = match command {
                ClientCommand::Act(action) => self.dispatch(action).await?,
                ClientCommand::Retry => self.retry().await?,
            };
            if suspended {
                let mut dropped = 0;
                while commands.try_recv().is_ok() {
                    dropped += 1;
                }
                if dropped > 0 {
                    debug!(dropped, "Discarded input received while controls were disabled");
                }
            }
        }

        info!(phase = %self.controller.phase(), "Command channel closed");
        Ok(self.controller)
    }

    /// Applies one player action and settles the result.
    ///
    /// Returns true if the game suspended for remote work or a replay.
    #[instrument(skip(self), fields(action = %action))]
    pub async fn dispatch(&mut self, action: PlayerAction) -> Result<bool> {
        match self.controller.dispatch(action) {
            Dispatch::Ignored(_) => return Ok(false),
            Dispatch::Revealed(outcome) => self.emit(GameEvent::CardRevealed(outcome))?,
            Dispatch::ClueRequested(_)
            | Dispatch::TurnEnded(_)
            | Dispatch::DifficultyChanged(_) => {}
        }
        self.settle().await
    }

    /// Re-issues a stalled request.
    #[instrument(skip(self))]
    pub async fn retry(&mut self) -> Result<bool> {
        if self.controller.resume_stalled().is_none() {
            debug!("Nothing to retry");
            return Ok(false);
        }
        self.settle().await
    }

    /// Services outstanding requests and replays until the game needs
    /// the player again, stalls, or ends.
    ///
    /// Returns true if it had to wait on the remote or replay moves.
    #[instrument(skip(self), fields(phase = %self.controller.phase()))]
    pub async fn settle(&mut self) -> Result<bool> {
        let mut suspended = false;
        loop {
            if let Some(ticket) = self.controller.pending_request()
                && !self.controller.is_stalled()
            {
                suspended = true;
                self.service(ticket).await?;
                continue;
            }

            if self.controller.replay_pending() {
                suspended = true;
                self.emit_state()?;
                let tx = self.event_tx.clone();
                self.proxy
                    .replay(&mut self.controller, |outcome, controller| {
                        let sent = tx
                            .send(GameEvent::CardRevealed(*outcome))
                            .and_then(|_| tx.send(GameEvent::StateChanged(Box::new(controller.view()))));
                        if sent.is_err() {
                            debug!("Event receiver dropped during replay");
                        }
                    })
                    .await;
                continue;
            }

            break;
        }

        self.emit_state()?;
        if let Some(outcome) = self.controller.phase().outcome()
            && !self.announced
        {
            self.announced = true;
            self.emit(GameEvent::GameOver(outcome))?;
        }
        self.proxy.publish(self.controller.board()).await;
        Ok(suspended)
    }

    async fn service(&mut self, ticket: RequestTicket) -> Result<()> {
        self.emit(GameEvent::AwaitingRemote(ticket.kind()))?;
        self.emit_state()?;

        match ticket.kind() {
            RequestKind::Clue => match self.proxy.request_clue(self.controller.board()).await {
                Ok(clue) => {
                    let announced = clue.clone();
                    if self.controller.accept_clue(ticket, clue) == Delivery::Applied {
                        self.emit(GameEvent::ClueReceived(announced))?;
                    }
                }
                Err(e) => self.stall(ticket, e)?,
            },
            RequestKind::OpponentMoves => {
                match self.proxy.request_opponent_moves(self.controller.board()).await {
                    Ok(moves) => {
                        self.controller.accept_opponent_moves(ticket, moves);
                    }
                    Err(e) => self.stall(ticket, e)?,
                }
            }
        }
        Ok(())
    }

    fn stall(&mut self, ticket: RequestTicket, error: RemoteError) -> Result<()> {
        warn!(kind = %ticket.kind(), error = %error, "Remote request failed");
        if self.controller.report_failure(ticket) == Delivery::Applied {
            self.emit(GameEvent::RemoteFailed {
                kind: ticket.kind(),
                message: error.kind.to_string(),
            })?;
        }
        Ok(())
    }

    fn emit_state(&self) -> Result<()> {
        self.emit(GameEvent::StateChanged(Box::new(self.controller.view())))
    }

    fn emit(&self, event: GameEvent) -> Result<()> {
        self.event_tx.send(event)?;
        Ok(())
    }
}
