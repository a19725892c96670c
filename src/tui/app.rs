//! Application state and logic.

use super::input;
use crossterm::event::KeyCode;
use std::collections::VecDeque;
use strictly_codenames::{
    CardId, ClientCommand, Difficulty, GameEvent, RequestKind, TurnPhase, TurnView,
};
use tracing::debug;

/// Recent events kept for the side panel.
const HISTORY_LEN: usize = 8;

/// Main application state.
pub struct App {
    view: Option<TurnView>,
    cursor: CardId,
    last_error: Option<String>,
    history: VecDeque<String>,
}

impl App {
    /// Creates a new application.
    pub fn new() -> Self {
        Self {
            view: None,
            cursor: CardId::FIRST,
            last_error: None,
            history: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    /// Latest view from the orchestrator.
    pub fn view(&self) -> Option<&TurnView> {
        self.view.as_ref()
    }

    /// Card under the cursor.
    pub fn cursor(&self) -> CardId {
        self.cursor
    }

    /// Recent events, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Current difficulty, or the default before the first view.
    pub fn difficulty(&self) -> Difficulty {
        self.view
            .as_ref()
            .map(|v| v.board.difficulty())
            .unwrap_or_default()
    }

    /// Handles a key press; returns the command to send, if any.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<ClientCommand> {
        match key {
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                self.cursor = input::move_cursor(self.cursor, key);
                None
            }
            _ => input::command_for_key(key, self.cursor, self.difficulty()),
        }
    }

    /// One-line status for the current state.
    pub fn status_message(&self) -> String {
        let Some(view) = &self.view else {
            return "Dealing board...".to_string();
        };
        if view.stalled.is_some() {
            let error = self.last_error.as_deref().unwrap_or("remote request failed");
            return format!("{}. Press r to retry.", error);
        }
        match view.awaiting {
            Some(RequestKind::Clue) => return "Waiting for a clue...".to_string(),
            Some(RequestKind::OpponentMoves) => return "Opponent is thinking...".to_string(),
            None => {}
        }
        match view.board.phase() {
            TurnPhase::ChoosingClueSize => "Pick a clue size with 1-3.".to_string(),
            TurnPhase::Guessing => format!(
                "{} guesses left. Enter reveals, e ends the turn.",
                view.board.remaining_guesses()
            ),
            TurnPhase::OpponentTurn => "Opponent is playing...".to_string(),
            TurnPhase::GameOver(outcome) => format!("{} Press q to quit.", outcome),
        }
    }

    /// Handles a game event from the orchestrator.
    pub fn handle_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::StateChanged(view) => {
                if view.stalled.is_none() {
                    self.last_error = None;
                }
                self.view = Some(*view);
            }
            GameEvent::AwaitingRemote(kind) => {
                self.push_history(format!("Requested {}", kind));
            }
            GameEvent::ClueReceived(clue) => {
                self.push_history(format!("Clue: {} for {}", clue.word, clue.target_count));
            }
            GameEvent::CardRevealed(outcome) => {
                let word = self
                    .view
                    .as_ref()
                    .map(|v| v.board.card(outcome.card()).word().to_string())
                    .unwrap_or_else(|| outcome.card().to_string());
                self.push_history(format!("{} was {}", word, outcome.team()));
            }
            GameEvent::RemoteFailed { kind, message } => {
                self.push_history(format!("{} request failed", kind));
                self.last_error = Some(message);
            }
            GameEvent::GameOver(outcome) => {
                self.push_history(outcome.to_string());
            }
        }
    }

    fn push_history(&mut self, entry: String) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }
}
