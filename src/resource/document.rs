//! JSON:API document types
//!
//! Only the parts of the format this application exchanges are modelled:
//! primary data, pagination meta and links, relationship linkage, and error
//! objects.

use crate::error::{Error, Result};
use crate::pagination::{Page, PageMeta};
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{ "type": ..., "id": ... }` pointer to another resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// To-one relationship linkage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub data: Option<ResourceIdentifier>,
}

/// A resource object as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub attributes: JsonObject,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

impl ResourceObject {
    /// Create a resource with no attributes
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            attributes: JsonObject::new(),
            relationships: BTreeMap::new(),
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set a to-one relationship
    #[must_use]
    pub fn with_relationship(mut self, name: impl Into<String>, target: ResourceIdentifier) -> Self {
        self.relationships
            .insert(name.into(), Relationship { data: Some(target) });
        self
    }

    /// Identifier of the resource a to-one relationship points at
    pub fn related(&self, name: &str) -> Option<&ResourceIdentifier> {
        self.relationships.get(name)?.data.as_ref()
    }

    /// Overlay attributes and relationships from `patch`, leaving the rest untouched
    pub fn merge(&mut self, patch: ResourceObject) {
        self.attributes.extend(patch.attributes);
        self.relationships.extend(patch.relationships);
    }
}

/// Primary data: a single resource or a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Collection(Vec<ResourceObject>),
    Single(Box<ResourceObject>),
}

/// Top-level JSON:API document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub data: PrimaryData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, String>,
}

impl Document {
    /// Document wrapping one resource
    pub fn single(resource: ResourceObject) -> Self {
        Self {
            data: PrimaryData::Single(Box::new(resource)),
            meta: None,
            links: BTreeMap::new(),
        }
    }

    /// Document wrapping a page of resources, links rendered against `base`
    pub fn collection(page: Page<ResourceObject>, base: &str) -> Self {
        Self {
            links: page.links.render(base),
            meta: page.meta,
            data: PrimaryData::Collection(page.window),
        }
    }

    /// Take the single resource out of the document
    pub fn into_single(self) -> Result<ResourceObject> {
        match self.data {
            PrimaryData::Single(resource) => Ok(*resource),
            PrimaryData::Collection(_) => Err(Error::invalid_document(
                "expected a single resource, got a collection",
            )),
        }
    }

    /// Take the resource collection out of the document
    pub fn into_collection(self) -> Result<Vec<ResourceObject>> {
        match self.data {
            PrimaryData::Collection(resources) => Ok(resources),
            PrimaryData::Single(_) => Err(Error::invalid_document(
                "expected a collection, got a single resource",
            )),
        }
    }
}

/// One entry of an error document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub status: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&Error> for ErrorObject {
    fn from(err: &Error) -> Self {
        let status = err.status_code();
        let title = match status {
            400 => "Bad Request",
            404 => "Not Found",
            409 => "Conflict",
            _ => "Internal Server Error",
        };
        Self {
            status: status.to_string(),
            title: title.to_string(),
            detail: Some(err.to_string()),
        }
    }
}

/// `{ "errors": [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

impl From<&Error> for ErrorDocument {
    fn from(err: &Error) -> Self {
        Self {
            errors: vec![ErrorObject::from(err)],
        }
    }
}
