use async_trait::async_trait;
use thiserror::Error;

use crate::messages::frontend_messages::{CabinState, StateUpdate};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
}

/// Seam between the state service and its clients (the control panel and the
/// gain monitor), so tests can swap in an in-memory service.
#[async_trait]
pub trait StateTransport: Send + Sync {
    /// `GET /state`: the current authoritative record
    async fn fetch_state(&self) -> Result<CabinState, TransportError>;

    /// `POST /update`: apply a partial update, returning the post-write record
    async fn push_update(&self, update: StateUpdate) -> Result<CabinState, TransportError>;
}

/// Talks to a live state service over http
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// `base_url` without a trailing slash, e.g. `http://127.0.0.1:5005`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl StateTransport for HttpTransport {
    async fn fetch_state(&self) -> Result<CabinState, TransportError> {
        let response = self
            .client
            .get(format!("{}/state", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(TransportError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn push_update(&self, update: StateUpdate) -> Result<CabinState, TransportError> {
        let response = self
            .client
            .post(format!("{}/update", self.base_url))
            .json(&update)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(TransportError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}
