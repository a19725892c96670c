//! Strictly Codenames library - type-safe turn engine for a codenames-style game
//!
//! A human guesses the blue cards on a 25-card board from clues supplied by
//! a remote collaborator, which also plays the red side.
//!
//! # Architecture
//!
//! - **Games**: board snapshot, reveal engine and turn controller (no I/O)
//! - **Remote**: the remote collaborator trait and its HTTP client
//! - **Proxy**: turns remote answers into typed moves and paces replays
//! - **Orchestrator**: command loop driving the controller for a UI
//!
//! # Example
//!
//! ```no_run
//! use strictly_codenames::{
//!     ClientConfig, GameOrchestrator, HttpRemote, RemoteMoveProxy, TurnController,
//! };
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let remote = HttpRemote::new(config.server_url(), config.request_timeout())?;
//! let proxy = RemoteMoveProxy::new(remote, config.pacing());
//! let controller = TurnController::new(proxy.new_board().await?);
//!
//! let (event_tx, _event_rx) = mpsc::unbounded_channel();
//! let (_command_tx, command_rx) = mpsc::unbounded_channel();
//! GameOrchestrator::new(controller, proxy, event_tx)
//!     .run(command_rx)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod orchestrator;
mod proxy;
mod remote;

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, DEFAULT_CONFIG_FILE, SERVER_URL_ENV};

// Crate-level exports - Game types (codenames)
pub use games::codenames::{
    BOARD_SIZE, BoardError, BoardSnapshot, Card, CardId, Clue, Controls, Delivery, Difficulty,
    Dispatch, IgnoreReason, LossCause, MAX_CLUE_SIZE, Outcome, PlayerAction, RequestKind,
    RequestTicket, RevealCause, RevealOutcome, Side, Team, TeamCounts, TurnController, TurnPhase,
    TurnView, UNSET, WireBoard, WireCard, WireMeta, WireState, apply_reveal,
};

// Crate-level exports - Invariants and rules
pub use games::codenames::{invariants, rules};

// Crate-level exports - Remote collaborator
pub use remote::{
    CardRef, ClueResponse, HttpRemote, OpponentMovesResponse, RemoteCollaborator, RemoteError,
    RemoteErrorKind,
};

// Crate-level exports - Orchestration
pub use orchestrator::{ClientCommand, GameEvent, GameOrchestrator};
pub use proxy::{DEFAULT_PACING, RemoteMoveProxy};
