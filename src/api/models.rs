//! API request and response models

use serde::{Deserialize, Serialize};

pub use crate::gateway::ChatReply;

/// Chat request body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatRequest {
    /// Free-text message typed by the user
    pub message: String,
}

/// Error body returned with any non-2xx status
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
