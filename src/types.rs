//! Common types used throughout the crate
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Media type mandated by JSON:API for requests and responses
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";
