//! Error types for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::models::ErrorResponse;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AppError>;

/// Prefix for every error message returned to the client
const ERROR_PREFIX: &str = "Ocurrió un error al procesar tu solicitud";

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Client-credentials exchange with the flight provider failed
    #[error("flight provider authentication failed: {0}")]
    Auth(String),

    /// Flight offer search failed after authentication succeeded
    #[error("flight lookup failed: {0}")]
    FlightLookup(String),

    /// Language model completion failed
    #[error("chat completion failed: {0}")]
    Completion(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "auth_error",
            AppError::FlightLookup(_) => "flight_lookup_error",
            AppError::Completion(_) => "completion_error",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the end user. Upstream payloads stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(_) => "No se pudo autenticar con la API de Amadeus.".to_string(),
            AppError::FlightLookup(_) => "No se pudo obtener información de vuelos.".to_string(),
            AppError::Completion(_) => {
                "No se pudo obtener una respuesta del asistente.".to_string()
            }
            AppError::InvalidRequest(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => "Error interno del servidor.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::warn!(code = self.code(), error = %self, "Rejected request");
        }

        let body = Json(ErrorResponse {
            error: format!("{}: {}", ERROR_PREFIX, self.user_message()),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}
