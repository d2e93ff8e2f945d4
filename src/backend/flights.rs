//! Flight offer search and normalisation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::traits::{FlightSearch, TokenProvider};
use crate::config::FlightsConfig;
use crate::error::{AppError, Result};

/// Route and date extracted from a user message. Not validated beyond the pattern match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub date: String,
}

/// Departure or arrival point of the first segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightEndpoint {
    pub location: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
}

/// Normalised offer returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub airline: String,
    pub price: String,
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
}

#[derive(Debug, Deserialize)]
struct RawOffersResponse {
    data: Vec<RawOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOffer {
    #[serde(default)]
    validating_airline_codes: Vec<String>,
    price: RawPrice,
    #[serde(default)]
    itineraries: Vec<RawItinerary>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    total: String,
}

#[derive(Debug, Deserialize)]
struct RawItinerary {
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    departure: RawEndpoint,
    arrival: RawEndpoint,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpoint {
    iata_code: String,
    at: String,
    #[serde(default)]
    terminal: Option<String>,
}

impl From<RawEndpoint> for FlightEndpoint {
    fn from(raw: RawEndpoint) -> Self {
        Self {
            location: raw.iata_code,
            time: raw.at,
            terminal: raw.terminal,
        }
    }
}

impl TryFrom<RawOffer> for FlightOffer {
    type Error = String;

    /// Only the first validating carrier and the first segment of the first itinerary are kept.
    fn try_from(raw: RawOffer) -> std::result::Result<Self, Self::Error> {
        let airline = raw
            .validating_airline_codes
            .into_iter()
            .next()
            .ok_or("offer has no validating airline")?;

        let segment = raw
            .itineraries
            .into_iter()
            .next()
            .and_then(|itinerary| itinerary.segments.into_iter().next())
            .ok_or("offer has no itinerary segment")?;

        Ok(Self {
            airline,
            price: raw.price.total,
            departure: segment.departure.into(),
            arrival: segment.arrival.into(),
        })
    }
}

/// Map the provider's payload to offers, preserving its order
fn normalize_offers(raw: RawOffersResponse) -> Result<Vec<FlightOffer>> {
    raw.data
        .into_iter()
        .map(|offer| FlightOffer::try_from(offer).map_err(AppError::FlightLookup))
        .collect()
}

/// Client for the flight offer search endpoint
pub struct FlightOffersClient {
    client: Client,
    search_url: String,
    adults: u32,
    tokens: Arc<dyn TokenProvider>,
}

impl FlightOffersClient {
    pub fn new(config: &FlightsConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            search_url: config.search_url(),
            adults: config.adults,
            tokens,
        })
    }
}

#[async_trait]
impl FlightSearch for FlightOffersClient {
    async fn search(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>> {
        let credential = self.tokens.acquire().await?;

        debug!(
            origin = %query.origin,
            destination = %query.destination,
            date = %query.date,
            "Searching flight offers"
        );

        let adults = self.adults.to_string();
        let response = self
            .client
            .get(&self.search_url)
            .bearer_auth(&credential.access_token)
            .query(&[
                ("originLocationCode", query.origin.as_str()),
                ("destinationLocationCode", query.destination.as_str()),
                ("departureDate", query.date.as_str()),
                ("adults", adults.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Flight offer request failed");
                AppError::FlightLookup(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Flight offer search returned an error");
            return Err(AppError::FlightLookup(format!(
                "Search endpoint returned {}: {}",
                status, body
            )));
        }

        let raw = response.json::<RawOffersResponse>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse flight offers");
            AppError::FlightLookup(format!("Failed to parse response: {}", e))
        })?;

        let offers = normalize_offers(raw)?;
        info!(
            origin = %query.origin,
            destination = %query.destination,
            offers = offers.len(),
            "Flight offers found"
        );

        Ok(offers)
    }
}
