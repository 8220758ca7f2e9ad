//! Client module
//!
//! The editing side of the demo.
//!
//! # Overview
//!
//! - `EditController` - load → edit → save → navigate state machine for one article
//! - `HttpStore` - `ResourceStore` that reaches the server over JSON:API
//! - `Route` - views the controller can navigate to
//!
//! Navigation is delivered over an unbounded channel whose receiver belongs
//! to whatever renders the views.

mod controller;
mod routes;
mod store;

pub use controller::{EditController, EditPhase, DEFAULT_SAVE_TIMEOUT};
pub use routes::Route;
pub use store::HttpStore;

#[cfg(test)]
mod tests;
