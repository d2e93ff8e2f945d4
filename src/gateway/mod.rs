//! Gateway module - intent classification and dispatch

pub mod dispatcher;
pub mod intent;
pub mod persona;

pub use dispatcher::{ChatReply, MessageRouter, Personas, FLIGHTS_FOUND_REPLY, NO_FLIGHTS_REPLY};
pub use intent::{classify, Intent};
