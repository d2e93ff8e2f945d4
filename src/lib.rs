//! TravelBot Gateway
//!
//! A single `POST /chat` endpoint that routes a free-text travel message to a
//! flight offer search, an image search, or a chat model, based on the
//! shorthand the message contains.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;

pub use error::{AppError, Result};

use std::sync::Arc;

use backend::{
    CachedTokenProvider, FlightOffersClient, ImageSearchClient, OAuthTokenProvider,
    OpenAIChatBackend, TokenProvider,
};
use gateway::{MessageRouter, Personas};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub router: Arc<MessageRouter>,
}

impl AppState {
    pub fn new(settings: config::Settings, router: MessageRouter) -> Self {
        Self {
            settings: Arc::new(settings),
            router: Arc::new(router),
        }
    }

    /// Build the upstream clients described by the settings
    pub fn from_settings(settings: config::Settings) -> Result<Self> {
        let oauth: Arc<dyn TokenProvider> = Arc::new(OAuthTokenProvider::new(&settings.flights)?);
        let tokens: Arc<dyn TokenProvider> = if settings.flights.cache_token {
            Arc::new(CachedTokenProvider::new(oauth))
        } else {
            oauth
        };

        let router = MessageRouter::new(
            Arc::new(FlightOffersClient::new(&settings.flights, tokens)?),
            Arc::new(ImageSearchClient::new(&settings.images)?),
            Arc::new(OpenAIChatBackend::new(&settings.chat)?),
            Personas::from(&settings.chat),
        );

        Ok(Self::new(settings, router))
    }
}
