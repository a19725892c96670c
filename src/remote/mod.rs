//! Remote collaborator boundary.
//!
//! The remote side deals boards, gives clues and plays the opponent.
//! Every request carries the full wire board.

mod error;
mod http;

pub use error::{RemoteError, RemoteErrorKind};
pub use http::HttpRemote;

use crate::games::codenames::{BoardSnapshot, CardId, WireBoard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A card named by the remote, either by identity or by word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(untagged)]
pub enum CardRef {
    /// Identity 1..=25.
    #[display("#{}", _0)]
    Id(u8),
    /// Word printed on the card.
    #[display("'{}'", _0)]
    Word(String),
}

impl CardRef {
    /// Resolves to a card on `board`.
    pub fn resolve(&self, board: &BoardSnapshot) -> Result<CardId, RemoteError> {
        match self {
            CardRef::Id(raw) => CardId::new(*raw)
                .ok_or_else(|| RemoteError::protocol(format!("card id {} out of range", raw))),
            CardRef::Word(word) => board
                .find_by_word(word)
                .ok_or_else(|| RemoteError::protocol(format!("no card named '{}'", word))),
        }
    }
}

/// Answer to a clue request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueResponse {
    /// Clue word.
    pub clue: String,
    /// Number of cards the clue covers.
    #[serde(alias = "target")]
    pub target_count: i32,
    /// Cards the clue-giver had in mind.
    #[serde(default, alias = "targets")]
    pub target_cards: Vec<CardRef>,
}

/// Answer to an opponent-move request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentMovesResponse {
    /// Cards to reveal, in order. Empty means the opponent passes.
    #[serde(default, alias = "sequence")]
    pub moves: Vec<CardRef>,
}

/// Remote procedures consumed by the game.
#[async_trait::async_trait]
pub trait RemoteCollaborator: Send + Sync {
    /// Asks for a clue covering the board's chosen clue size.
    async fn request_clue(&self, board: &WireBoard) -> Result<ClueResponse, RemoteError>;

    /// Asks for the opponent's moves.
    async fn request_opponent_moves(
        &self,
        board: &WireBoard,
    ) -> Result<OpponentMovesResponse, RemoteError>;

    /// Publishes a settled board. The rendered reply is not used.
    async fn publish_update(&self, board: &WireBoard) -> Result<(), RemoteError> {
        let _ = board;
        Ok(())
    }

    /// Asks for a freshly dealt board.
    async fn request_new_board(&self) -> Result<WireBoard, RemoteError>;
}

#[async_trait::async_trait]
impl<R: RemoteCollaborator + ?Sized> RemoteCollaborator for Arc<R> {
    async fn request_clue(&self, board: &WireBoard) -> Result<ClueResponse, RemoteError> {
        (**self).request_clue(board).await
    }

    async fn request_opponent_moves(
        &self,
        board: &WireBoard,
    ) -> Result<OpponentMovesResponse, RemoteError> {
        (**self).request_opponent_moves(board).await
    }

    async fn publish_update(&self, board: &WireBoard) -> Result<(), RemoteError> {
        (**self).publish_update(board).await
    }

    async fn request_new_board(&self) -> Result<WireBoard, RemoteError> {
        (**self).request_new_board().await
    }
}
