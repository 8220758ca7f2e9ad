// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # JSON:API Articles Demo
//!
//! A small articles/authors application exposed over JSON:API, with
//! configurable collection pagination and a client-side edit workflow.
//!
//! ## Features
//!
//! - **JSON:API Server**: `/articles` and `/authors` collections, single
//!   resources and `PATCH` updates, with JSON:API error documents
//! - **Pagination**: none, offset or page-number windowing with size clamping
//!   and first/prev/next/last links
//! - **Edit Workflow**: load → edit → save → navigate, keeping the draft when
//!   a save fails
//! - **HTTP Client**: retry and backoff for talking to the server
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jsonapi_demo::client::{EditController, HttpStore};
//! use jsonapi_demo::config::AppConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> jsonapi_demo::Result<()> {
//!     let config = AppConfig::default();
//!     let store = HttpStore::from_settings(&config.client)?;
//!     let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//!
//!     let mut editor = EditController::new(Arc::new(store), tx, "1");
//!     editor.load().await?;
//!     editor.set_title("The Telling")?;
//!     editor.save().await?;
//!
//!     assert!(rx.try_recv().is_ok());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         HTTP server                           │
//! │   GET /articles   GET|PATCH /articles/:id   GET /authors      │
//! └───────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴──────────┬──────────────────────┐
//! │  Pagination  │       Resources         │        Store         │
//! ├──────────────┼─────────────────────────┼──────────────────────┤
//! │ None         │ Document                │ ResourceStore trait  │
//! │ Offset       │ ResourceObject          │ MemoryStore          │
//! │ Paged        │ Article / Author        │ HttpStore (client)   │
//! └──────────────┴─────────────────────────┴──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pagination strategies
pub mod pagination;

/// JSON:API documents and the application's resources
pub mod resource;

/// Resource storage
pub mod store;

/// Application configuration
pub mod config;

/// HTTP client with retry
pub mod http;

/// Edit workflow and server-backed store
pub mod client;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::AppConfig;
pub use pagination::{PaginationResolver, PaginationSettings, PaginationStrategy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
