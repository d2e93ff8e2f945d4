//! HTTP request handlers

use crate::api::models::{ChatReply, ChatRequest};
use crate::error::AppError;
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Answer a chat message
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let span = info_span!("chat", request_id = %Uuid::new_v4());

    async move {
        info!(message_len = request.message.len(), "Received chat message");
        debug!(message = %request.message, "Chat message body");

        let request_timeout = state.settings.server.request_timeout();
        let reply = tokio::time::timeout(request_timeout, state.router.handle(&request.message))
            .await
            .map_err(|_| {
                warn!(timeout_secs = request_timeout.as_secs(), "Chat request timed out");
                AppError::Internal(format!(
                    "request exceeded {}s",
                    request_timeout.as_secs()
                ))
            })??;

        info!(
            flights = reply.flights.as_ref().map_or(0, Vec::len),
            images = reply.images.as_ref().map_or(0, Vec::len),
            "Chat reply ready"
        );

        Ok::<_, AppError>(Json(reply))
    }
    .instrument(span)
    .await
}
