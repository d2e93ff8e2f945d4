//! Classification of free-text messages into intents

use regex::Regex;
use std::sync::LazyLock;

use crate::backend::flights::FlightQuery;

static FLIGHT_SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)origen:\s*(\w+),\s*destino:\s*(\w+),\s*fecha:\s*([\d-]+)")
        .expect("flight shorthand pattern is valid")
});

static PLACE_SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)h[aá]blame de\s*(\w+)").expect("place shorthand pattern is valid")
});

/// What the user is asking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `origen: X, destino: Y, fecha: Z`
    FlightQuery(FlightQuery),
    /// `hablame de <place>`
    PlaceQuery { place: String },
    Freeform,
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::FlightQuery(_) => "flight_query",
            Intent::PlaceQuery { .. } => "place_query",
            Intent::Freeform => "freeform",
        }
    }
}

/// Classify a message. The flight shorthand always wins over the place shorthand.
pub fn classify(message: &str) -> Intent {
    if let Some(caps) = FLIGHT_SHORTHAND.captures(message) {
        return Intent::FlightQuery(FlightQuery {
            origin: caps[1].to_string(),
            destination: caps[2].to_string(),
            date: caps[3].to_string(),
        });
    }

    if let Some(caps) = PLACE_SHORTHAND.captures(message) {
        return Intent::PlaceQuery {
            place: caps[1].to_string(),
        };
    }

    Intent::Freeform
}
