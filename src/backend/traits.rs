//! Seams between the message router and the upstream providers

use async_trait::async_trait;

use crate::backend::flights::{FlightOffer, FlightQuery};
use crate::error::Result;

/// Bearer credential for the flight offer API
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    /// Lifetime reported by the provider, in seconds
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Acquires bearer credentials for the flight offer API
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Fails with [`AppError::Auth`](crate::error::AppError::Auth)
    async fn acquire(&self) -> Result<Credential>;
}

/// Flight offer search
#[async_trait]
pub trait FlightSearch: Send + Sync {
    /// An empty list means no offers; it is not an error.
    async fn search(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>>;
}

/// Best-effort image search. Never fails; errors degrade to an empty list.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, term: &str) -> Vec<String>;
}

/// Single-shot chat completion with a system and a user turn
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String>;
}
