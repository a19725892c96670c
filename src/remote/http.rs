//! HTTP implementation of the remote collaborator.

use super::{ClueResponse, OpponentMovesResponse, RemoteCollaborator, RemoteError};
use crate::games::codenames::WireBoard;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Remote collaborator reached over HTTP.
///
/// Every operation is a `POST` of the JSON wire board to
/// `{base_url}/{endpoint}`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Creates a client for `base_url` with a per-request timeout.
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!("Creating HTTP remote");
        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL requests go to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        endpoint: &str,
        board: Option<&WireBoard>,
    ) -> Result<reqwest::Response, RemoteError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "Sending request");

        let mut request = self.client.post(&url);
        if let Some(board) = board {
            request = request.json(board);
        }
        let response = request.send().await.map_err(|e| {
            error!(error = ?e, endpoint, "Request failed");
            RemoteError::transport(format!("{}: {}", endpoint, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, endpoint, "Remote returned an error status");
            return Err(RemoteError::status(endpoint, status.as_u16()));
        }
        Ok(response)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        board: Option<&WireBoard>,
    ) -> Result<T, RemoteError> {
        let text = self.send(endpoint, board).await?.text().await?;
        debug!(endpoint, response_length = text.len(), "Parsing response");
        serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, endpoint, "Malformed response");
            RemoteError::protocol(format!("{} response: {}", endpoint, e))
        })
    }
}

#[async_trait::async_trait]
impl RemoteCollaborator for HttpRemote {
    #[instrument(skip(self, board), fields(base_url = %self.base_url))]
    async fn request_clue(&self, board: &WireBoard) -> Result<ClueResponse, RemoteError> {
        self.call("clue", Some(board)).await
    }

    #[instrument(skip(self, board), fields(base_url = %self.base_url))]
    async fn request_opponent_moves(
        &self,
        board: &WireBoard,
    ) -> Result<OpponentMovesResponse, RemoteError> {
        self.call("computer_turn", Some(board)).await
    }

    #[instrument(skip(self, board), fields(base_url = %self.base_url))]
    async fn publish_update(&self, board: &WireBoard) -> Result<(), RemoteError> {
        self.send("update", Some(board)).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn request_new_board(&self) -> Result<WireBoard, RemoteError> {
        self.call("new_game", None).await
    }
}
