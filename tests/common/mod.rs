//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use strictly_codenames::{
    BOARD_SIZE, BoardSnapshot, CardId, CardRef, ClueResponse, OpponentMovesResponse,
    RemoteCollaborator, RemoteError, Team, WireBoard,
};

/// Nine blue (1-9), eight red (10-17), seven neutral (18-24), assassin 25.
pub fn standard_layout() -> Vec<(String, Team)> {
    (1..=BOARD_SIZE)
        .map(|n| {
            let team = match n {
                1..=9 => Team::Blue,
                10..=17 => Team::Red,
                18..=24 => Team::Neutral,
                _ => Team::Assassin,
            };
            (format!("word{}", n), team)
        })
        .collect()
}

pub fn standard_board() -> BoardSnapshot {
    BoardSnapshot::new(standard_layout()).expect("valid board")
}

pub fn id(raw: u8) -> CardId {
    CardId::new(raw).expect("valid id")
}

/// Remote collaborator answering from a script and recording requests.
#[derive(Default)]
pub struct ScriptedRemote {
    clues: Mutex<VecDeque<Result<ClueResponse, RemoteError>>>,
    moves: Mutex<VecDeque<Result<OpponentMovesResponse, RemoteError>>>,
    clue_requests: Mutex<Vec<WireBoard>>,
    move_requests: Mutex<Vec<WireBoard>>,
    updates: Mutex<Vec<WireBoard>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clue(self, word: &str, target_count: i32) -> Self {
        self.clues.lock().expect("lock").push_back(Ok(ClueResponse {
            clue: word.to_string(),
            target_count,
            target_cards: Vec::new(),
        }));
        self
    }

    pub fn with_clue_failure(self) -> Self {
        self.clues
            .lock()
            .expect("lock")
            .push_back(Err(RemoteError::status("clue", 500)));
        self
    }

    pub fn with_moves(self, words: &[&str]) -> Self {
        self.moves.lock().expect("lock").push_back(Ok(OpponentMovesResponse {
            moves: words.iter().map(|w| CardRef::Word(w.to_string())).collect(),
        }));
        self
    }

    pub fn with_moves_failure(self) -> Self {
        self.moves
            .lock()
            .expect("lock")
            .push_back(Err(RemoteError::transport("connection refused")));
        self
    }

    pub fn clue_requests(&self) -> Vec<WireBoard> {
        self.clue_requests.lock().expect("lock").clone()
    }

    pub fn move_requests(&self) -> Vec<WireBoard> {
        self.move_requests.lock().expect("lock").clone()
    }

    pub fn updates(&self) -> Vec<WireBoard> {
        self.updates.lock().expect("lock").clone()
    }
}

#[async_trait::async_trait]
impl RemoteCollaborator for ScriptedRemote {
    async fn request_clue(&self, board: &WireBoard) -> Result<ClueResponse, RemoteError> {
        self.clue_requests.lock().expect("lock").push(board.clone());
        self.clues
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::transport("clue script exhausted")))
    }

    async fn request_opponent_moves(
        &self,
        board: &WireBoard,
    ) -> Result<OpponentMovesResponse, RemoteError> {
        self.move_requests.lock().expect("lock").push(board.clone());
        self.moves
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::transport("move script exhausted")))
    }

    async fn publish_update(&self, board: &WireBoard) -> Result<(), RemoteError> {
        self.updates.lock().expect("lock").push(board.clone());
        Ok(())
    }

    async fn request_new_board(&self) -> Result<WireBoard, RemoteError> {
        Ok(WireBoard::from(&standard_board()))
    }
}
