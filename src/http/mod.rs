//! HTTP client module
//!
//! Provides the client the edit side uses to reach the server.
//!
//! # Features
//!
//! - **JSON:API Headers**: `Accept` and `Content-Type` set to `application/vnd.api+json`
//! - **Retries**: doubling delays, with a per-method policy so a `PATCH` is
//!   never repeated once the server may have applied it
//! - **Error Mapping**: 404 becomes `Error::NotFound`, other failures keep
//!   their status and body

mod client;

pub use client::{HttpClient, HttpClientConfig};
