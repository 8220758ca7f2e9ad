//! Typed records exchanged through the stores
//!
//! `Author` owns zero or more `Article`s; the owning side of the link is the
//! article's `author` relationship.

use super::document::{ResourceIdentifier, ResourceObject};
use super::Resource;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decode a resource's attributes into a typed struct
fn attributes<T: for<'de> Deserialize<'de>>(resource: &ResourceObject) -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(resource.attributes.clone())).map_err(|e| {
        Error::invalid_document(format!(
            "invalid attributes for {} '{}': {e}",
            resource.kind, resource.id
        ))
    })
}

/// Encode a typed struct as a resource's attributes
fn encode_attributes<T: Serialize>(value: &T) -> crate::types::JsonObject {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => crate::types::JsonObject::new(),
    }
}

fn check_kind(resource: &ResourceObject, expected: &str) -> Result<()> {
    if resource.kind == expected {
        Ok(())
    } else {
        Err(Error::invalid_document(format!(
            "expected resource type '{expected}', got '{}'",
            resource.kind
        )))
    }
}

// ============================================================================
// Author
// ============================================================================

/// Someone who writes articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize)]
struct AuthorAttributes {
    name: String,
}

impl Resource for Author {
    const KIND: &'static str = "authors";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_resource(&self) -> ResourceObject {
        let mut resource = ResourceObject::new(Self::KIND, &self.id);
        resource.attributes = encode_attributes(&AuthorAttributes {
            name: self.name.clone(),
        });
        resource
    }

    fn from_resource(resource: ResourceObject) -> Result<Self> {
        check_kind(&resource, Self::KIND)?;
        let attrs: AuthorAttributes = attributes(&resource)?;
        Ok(Self {
            id: resource.id,
            name: attrs.name,
        })
    }
}

// ============================================================================
// Article
// ============================================================================

/// An article; the working copy of the edit flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize)]
struct ArticleAttributes {
    title: String,
    body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Resource carrying only the writable attributes, as sent on save
    pub fn to_patch(&self) -> ResourceObject {
        ResourceObject::new(Self::KIND, &self.id)
            .with_attribute("title", self.title.clone())
            .with_attribute("body", self.body.clone())
    }
}

impl Resource for Article {
    const KIND: &'static str = "articles";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_resource(&self) -> ResourceObject {
        let mut resource = ResourceObject::new(Self::KIND, &self.id).with_relationship(
            "author",
            ResourceIdentifier::new(Author::KIND, &self.author_id),
        );
        resource.attributes = encode_attributes(&ArticleAttributes {
            title: self.title.clone(),
            body: self.body.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        });
        resource
    }

    fn from_resource(resource: ResourceObject) -> Result<Self> {
        check_kind(&resource, Self::KIND)?;
        let attrs: ArticleAttributes = attributes(&resource)?;
        let author_id = resource
            .related("author")
            .map(|author| author.id.clone())
            .ok_or_else(|| {
                Error::invalid_document(format!("article '{}' has no author", resource.id))
            })?;

        Ok(Self {
            id: resource.id,
            title: attrs.title,
            body: attrs.body,
            author_id,
            created_at: attrs.created_at,
            updated_at: attrs.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn article() -> Article {
        Article {
            id: "1".to_string(),
            title: "The Left Hand of Darkness".to_string(),
            body: "Winter.".to_string(),
            author_id: "1".to_string(),
            created_at: Some("2024-01-01T00:00:00Z".parse().unwrap()),
            updated_at: None,
        }
    }

    #[test]
    fn test_article_resource_round_trip() {
        let original = article();
        let resource = original.to_resource();

        assert_eq!(resource.kind, "articles");
        assert_eq!(resource.related("author").unwrap().id, "1");
        assert_eq!(resource.attributes["created_at"], "2024-01-01T00:00:00Z");
        assert!(!resource.attributes.contains_key("updated_at"));

        assert_eq!(Article::from_resource(resource).unwrap(), original);
    }

    #[test]
    fn test_article_patch_has_only_writable_attributes() {
        let patch = article().to_patch();
        let mut keys: Vec<&str> = patch.attributes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["body", "title"]);
        assert!(patch.relationships.is_empty());
    }

    #[test]
    fn test_article_without_author_is_rejected() {
        let resource = ResourceObject::new("articles", "1")
            .with_attribute("title", "t")
            .with_attribute("body", "b");
        assert!(matches!(
            Article::from_resource(resource),
            Err(Error::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let resource = ResourceObject::new("authors", "1").with_attribute("name", "Ursula");
        assert!(Article::from_resource(resource.clone()).is_err());
        assert_eq!(
            Author::from_resource(resource).unwrap(),
            Author {
                id: "1".to_string(),
                name: "Ursula".to_string()
            }
        );
    }

    #[test]
    fn test_missing_attribute_is_rejected() {
        let mut resource = article().to_resource();
        resource.attributes.remove("title");
        let err = Article::from_resource(resource).unwrap_err();
        assert!(err.to_string().contains("title"));

        let author = ResourceObject::new("authors", "2").with_attribute("name", json!(null));
        assert!(Author::from_resource(author).is_err());
    }
}
