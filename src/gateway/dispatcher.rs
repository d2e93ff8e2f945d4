//! Message router: maps each intent to the upstream calls that answer it

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::backend::flights::{FlightOffer, FlightQuery};
use crate::backend::traits::{ChatBackend, FlightSearch, ImageSearch};
use crate::config::ChatConfig;
use crate::error::Result;
use crate::gateway::intent::{classify, Intent};

/// Lead-in sent with a non-empty offer list
pub const FLIGHTS_FOUND_REPLY: &str = "Aquí tienes la información de vuelos:";

/// Reply when the provider has no offers for the route and date
pub const NO_FLIGHTS_REPLY: &str = "No se encontraron vuelos disponibles para esa ruta y fecha.";

/// Response body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flights: Option<Vec<FlightOffer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl ChatReply {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            flights: None,
            images: None,
        }
    }
}

/// System prompts used for the two conversational branches
#[derive(Debug, Clone)]
pub struct Personas {
    pub place: String,
    pub general: String,
}

impl From<&ChatConfig> for Personas {
    fn from(config: &ChatConfig) -> Self {
        Self {
            place: config.place_persona.clone(),
            general: config.general_persona.clone(),
        }
    }
}

/// Stateless dispatcher over the three upstream providers
pub struct MessageRouter {
    flights: Arc<dyn FlightSearch>,
    images: Arc<dyn ImageSearch>,
    chat: Arc<dyn ChatBackend>,
    personas: Personas,
}

impl MessageRouter {
    pub fn new(
        flights: Arc<dyn FlightSearch>,
        images: Arc<dyn ImageSearch>,
        chat: Arc<dyn ChatBackend>,
        personas: Personas,
    ) -> Self {
        Self {
            flights,
            images,
            chat,
            personas,
        }
    }

    /// Classify and answer a message
    pub async fn handle(&self, message: &str) -> Result<ChatReply> {
        let intent = classify(message);
        info!(intent = intent.kind(), "Classified message");
        self.dispatch(intent, message).await
    }

    /// Answer an already classified message
    pub async fn dispatch(&self, intent: Intent, message: &str) -> Result<ChatReply> {
        match intent {
            Intent::FlightQuery(query) => self.answer_flights(&query).await,
            Intent::PlaceQuery { place } => self.answer_place(&place, message).await,
            Intent::Freeform => {
                let reply = self.chat.complete(&self.personas.general, message).await?;
                Ok(ChatReply::text(reply))
            }
        }
    }

    async fn answer_flights(&self, query: &FlightQuery) -> Result<ChatReply> {
        let offers = self.flights.search(query).await?;

        if offers.is_empty() {
            return Ok(ChatReply::text(NO_FLIGHTS_REPLY));
        }

        Ok(ChatReply {
            reply: FLIGHTS_FOUND_REPLY.to_string(),
            flights: Some(offers),
            images: None,
        })
    }

    async fn answer_place(&self, place: &str, message: &str) -> Result<ChatReply> {
        debug!(place = %place, "Answering place query");

        // Independent calls; merged only once both finish
        let (images, reply) = tokio::join!(
            self.images.search(place),
            self.chat.complete(&self.personas.place, message),
        );

        Ok(ChatReply {
            reply: reply?,
            flights: None,
            images: Some(images),
        })
    }
}
