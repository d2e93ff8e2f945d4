//! Backend module - upstream provider clients and the traits they implement

pub mod chat;
pub mod flights;
pub mod images;
pub mod token;
pub mod traits;

pub use chat::{ChatMessage, ChatRole, OpenAIChatBackend};
pub use flights::{FlightEndpoint, FlightOffer, FlightOffersClient, FlightQuery};
pub use images::ImageSearchClient;
pub use token::{CachedTokenProvider, OAuthTokenProvider};
pub use traits::{ChatBackend, Credential, FlightSearch, ImageSearch, TokenProvider};
