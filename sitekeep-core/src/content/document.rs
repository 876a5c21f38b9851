use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Errors produced when converting documents to and from their textual form.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Text handed to `import` is not a valid content document.
    #[error("Invalid JSON format: {0}")]
    InvalidFormat(#[source] serde_json::Error),

    #[error("Failed to serialize content: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// A named section of the site.
///
/// Only `id`, `title`, `type` and `order` are interpreted. Every other field
/// is kept as-is so documents survive a load/save cycle unchanged.
///
/// `title` and `type` may be missing or null, and `order` may be any JSON
/// number; a null value is written back as an absent field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            title: None,
            kind: Some(kind.into()),
            order: Some(order.into()),
            extra: Map::new(),
        }
    }

    /// Order as an integer, if it is one.
    pub fn order_i64(&self) -> Option<i64> {
        self.order.as_ref().and_then(Number::as_i64)
    }

    pub fn set_order(&mut self, order: i64) {
        self.order = Some(order.into());
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// The whole site content document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteContent {
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteContent {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            extra: Map::new(),
        }
    }

    /// Returns the first block with the given id.
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ContentError> {
        serde_json::from_str(text).map_err(ContentError::InvalidFormat)
    }

    /// Serializes to the canonical textual form: two-space indented JSON with
    /// object keys sorted at every level.
    pub fn to_canonical_json(&self) -> Result<String, ContentError> {
        // serde_json::Map is ordered by key, so going through Value sorts the
        // struct fields together with the flattened ones.
        let value = serde_json::to_value(self).map_err(ContentError::Serialize)?;
        serde_json::to_string_pretty(&value).map_err(ContentError::Serialize)
    }
}
