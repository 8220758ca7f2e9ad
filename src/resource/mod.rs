//! Resource module
//!
//! JSON:API documents and the typed records carried in them.

mod document;
mod models;

pub use document::{
    Document, ErrorDocument, ErrorObject, PrimaryData, Relationship, ResourceIdentifier,
    ResourceObject,
};
pub use models::{Article, Author};

use crate::error::Result;

/// A typed record with a JSON:API representation
pub trait Resource: Sized {
    /// JSON:API `type` member
    const KIND: &'static str;

    /// Identifier of this record
    fn id(&self) -> &str;

    /// Wire form of this record
    fn to_resource(&self) -> ResourceObject;

    /// Decode a wire resource, checking its type
    fn from_resource(resource: ResourceObject) -> Result<Self>;
}
