//! Source record and attribute types.
//!
//! A [`Record`] is the unit handed to the build and query pipelines: an
//! opaque unique id, raw content per modality, and optional structured
//! attributes. Attributes are used only by filter predicates and never
//! participate in distance computation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A data type producing its own embedding space.
///
/// The ordering of variants fixes the iteration order used by fusion,
/// which keeps fused vectors deterministic across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Text,
    Image,
    Video,
}

/// The value type for record attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Categorical value, matched by equality.
    Text(String),
    /// Integer value, matched by equality or range containment.
    Int64(i64),
    /// Float value, matched by range containment.
    Float64(f64),
}

impl AttrValue {
    /// Returns the text value if this is a Text variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a float for numeric comparison.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Int64(i) => Some(*i as f64),
            AttrValue::Float64(f) => Some(*f),
            AttrValue::Text(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int64(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float64(v)
    }
}

/// Structured attributes attached to an index entry.
pub type Attributes = HashMap<String, AttrValue>;

/// A source record: one entity with raw content per modality.
///
/// Records are ephemeral; once embedded and fused they become an
/// [`crate::index::IndexEntry`] owned by the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// Unique entity identifier within an index.
    pub id: String,

    /// Raw text content, if any.
    pub text: Option<String>,

    /// Raw binary content per non-text modality (image, video), with an
    /// optional MIME type. Embedding these is a declared extension
    /// point; see [`crate::embedding::Embedder::embed_bytes`].
    #[serde(skip)]
    pub bytes: HashMap<Modality, (Vec<u8>, Option<String>)>,

    /// Filter attributes. Never used in distance computation.
    #[serde(default)]
    pub attributes: Attributes,
}

impl Record {
    /// Create a new record with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set the text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attach raw bytes for a non-text modality.
    pub fn bytes(mut self, modality: Modality, data: Vec<u8>, mime: Option<String>) -> Self {
        self.bytes.insert(modality, (data, mime));
        self
    }

    /// Add a filter attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}
