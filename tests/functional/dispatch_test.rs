//! Functional tests for message dispatch

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use travelbot_gateway::backend::{
    ChatBackend, FlightEndpoint, FlightOffer, FlightQuery, FlightSearch, ImageSearch,
};
use travelbot_gateway::gateway::{
    persona::{GENERAL_PERSONA, PLACE_PERSONA},
    MessageRouter, Personas, FLIGHTS_FOUND_REPLY, NO_FLIGHTS_REPLY,
};
use travelbot_gateway::{AppError, Result};

#[derive(Default)]
struct FakeFlights {
    offers: Vec<FlightOffer>,
    fail_auth: bool,
    queries: Mutex<Vec<FlightQuery>>,
}

#[async_trait]
impl FlightSearch for FakeFlights {
    async fn search(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>> {
        self.queries.lock().push(query.clone());
        if self.fail_auth {
            return Err(AppError::Auth("401 Unauthorized".to_string()));
        }
        Ok(self.offers.clone())
    }
}

#[derive(Default)]
struct FakeImages {
    urls: Vec<String>,
    terms: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageSearch for FakeImages {
    async fn search(&self, term: &str) -> Vec<String> {
        self.terms.lock().push(term.to_string());
        self.urls.clone()
    }
}

#[derive(Default)]
struct FakeChat {
    fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ChatBackend for FakeChat {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        self.calls
            .lock()
            .push((system_prompt.to_string(), user_message.to_string()));
        if self.fail {
            return Err(AppError::Completion("timeout".to_string()));
        }
        Ok(format!("respuesta a: {}", user_message))
    }
}

struct Harness {
    flights: Arc<FakeFlights>,
    images: Arc<FakeImages>,
    chat: Arc<FakeChat>,
    router: MessageRouter,
}

fn harness(flights: FakeFlights, images: FakeImages, chat: FakeChat) -> Harness {
    let flights = Arc::new(flights);
    let images = Arc::new(images);
    let chat = Arc::new(chat);

    let router = MessageRouter::new(
        flights.clone(),
        images.clone(),
        chat.clone(),
        Personas {
            place: PLACE_PERSONA.to_string(),
            general: GENERAL_PERSONA.to_string(),
        },
    );

    Harness {
        flights,
        images,
        chat,
        router,
    }
}

fn sample_offer() -> FlightOffer {
    FlightOffer {
        airline: "AV".to_string(),
        price: "389.90".to_string(),
        departure: FlightEndpoint {
            location: "SAL".to_string(),
            time: "2025-01-02T06:00:00".to_string(),
            terminal: None,
        },
        arrival: FlightEndpoint {
            location: "MAD".to_string(),
            time: "2025-01-02T23:40:00".to_string(),
            terminal: Some("4S".to_string()),
        },
    }
}

#[tokio::test]
async fn test_flight_shorthand_goes_only_to_flight_search() {
    let h = harness(
        FakeFlights {
            offers: vec![sample_offer()],
            ..Default::default()
        },
        FakeImages::default(),
        FakeChat::default(),
    );

    let reply = h
        .router
        .handle("origen: SAL, destino: MAD, fecha: 2025-01-02")
        .await
        .unwrap();

    assert_eq!(reply.reply, FLIGHTS_FOUND_REPLY);
    assert_eq!(reply.flights, Some(vec![sample_offer()]));
    assert!(reply.images.is_none());
    assert_eq!(
        *h.flights.queries.lock(),
        vec![FlightQuery {
            origin: "SAL".to_string(),
            destination: "MAD".to_string(),
            date: "2025-01-02".to_string(),
        }]
    );
    assert!(h.images.terms.lock().is_empty());
    assert!(h.chat.calls.lock().is_empty());
}

#[tokio::test]
async fn test_flight_shorthand_beats_place_shorthand() {
    let h = harness(FakeFlights::default(), FakeImages::default(), FakeChat::default());

    let reply = h
        .router
        .handle("hablame de Madrid, origen: SAL, destino: MAD, fecha: 2025-01-02")
        .await
        .unwrap();

    assert_eq!(reply.reply, NO_FLIGHTS_REPLY);
    assert_eq!(h.flights.queries.lock().len(), 1);
    assert!(h.images.terms.lock().is_empty());
    assert!(h.chat.calls.lock().is_empty());
}

#[tokio::test]
async fn test_zero_offers_is_fixed_reply_not_error() {
    let h = harness(FakeFlights::default(), FakeImages::default(), FakeChat::default());

    let reply = h
        .router
        .handle("origen: SAL, destino: MAD, fecha: 2025-01-02")
        .await
        .unwrap();

    assert_eq!(reply.reply, NO_FLIGHTS_REPLY);
    assert!(reply.flights.is_none());
}

#[tokio::test]
async fn test_auth_failure_propagates_as_auth_error() {
    let h = harness(
        FakeFlights {
            fail_auth: true,
            ..Default::default()
        },
        FakeImages::default(),
        FakeChat::default(),
    );

    let err = h
        .router
        .handle("origen: SAL, destino: MAD, fecha: 2025-01-02")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "auth_error");
    assert!(h.chat.calls.lock().is_empty());
}

#[tokio::test]
async fn test_place_shorthand_merges_images_and_reply() {
    let h = harness(
        FakeFlights::default(),
        FakeImages {
            urls: vec!["https://cdn.example/a.jpg".to_string()],
            ..Default::default()
        },
        FakeChat::default(),
    );

    let reply = h.router.handle("hablame de Francia").await.unwrap();

    assert_eq!(reply.reply, "respuesta a: hablame de Francia");
    assert_eq!(reply.images, Some(vec!["https://cdn.example/a.jpg".to_string()]));
    assert!(reply.flights.is_none());
    assert_eq!(*h.images.terms.lock(), vec!["Francia".to_string()]);

    let calls = h.chat.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, PLACE_PERSONA);
    assert_eq!(calls[0].1, "hablame de Francia");
    assert!(h.flights.queries.lock().is_empty());
}

#[tokio::test]
async fn test_place_shorthand_with_no_images_still_answers() {
    let h = harness(FakeFlights::default(), FakeImages::default(), FakeChat::default());

    let reply = h.router.handle("hablame de Islandia").await.unwrap();

    assert_eq!(reply.images, Some(vec![]));
    assert_eq!(reply.reply, "respuesta a: hablame de Islandia");
}

#[tokio::test]
async fn test_place_shorthand_chat_failure_is_fatal() {
    let h = harness(
        FakeFlights::default(),
        FakeImages {
            urls: vec!["https://cdn.example/a.jpg".to_string()],
            ..Default::default()
        },
        FakeChat {
            fail: true,
            ..Default::default()
        },
    );

    let err = h.router.handle("hablame de Francia").await.unwrap_err();

    assert!(matches!(err, AppError::Completion(_)));
}

#[tokio::test]
async fn test_freeform_goes_only_to_chat_with_general_persona() {
    let h = harness(FakeFlights::default(), FakeImages::default(), FakeChat::default());

    let reply = h.router.handle("hola").await.unwrap();

    assert_eq!(reply.reply, "respuesta a: hola");
    assert!(reply.flights.is_none());
    assert!(reply.images.is_none());

    let calls = h.chat.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, GENERAL_PERSONA);
    assert!(h.flights.queries.lock().is_empty());
    assert!(h.images.terms.lock().is_empty());
}
