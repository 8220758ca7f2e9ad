//! CLI module
//!
//! Command-line interface for the demo server and edit client.
//!
//! # Commands
//!
//! - `serve` - Seed an in-memory store and start the JSON:API server
//! - `articles` - Fetch one page of the articles listing
//! - `edit` - Load an article, apply changes and save it
//! - `validate` - Check a configuration file

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve, serve_listener, AppState};
