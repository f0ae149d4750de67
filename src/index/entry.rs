//! Index entry types.

use serde::{Deserialize, Serialize};

use crate::data::{AttrValue, Attributes};
use crate::vector::Vector;
use crate::vector::sparse::SparseVector;

/// The fused representation of one entity: a dense vector plus an
/// optional sparse vector for hybrid ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedEmbedding {
    pub record_id: String,
    pub vector: Vector,
    #[serde(default)]
    pub sparse: Option<SparseVector>,
}

impl FusedEmbedding {
    pub fn new(record_id: impl Into<String>, vector: Vector) -> Self {
        Self {
            record_id: record_id.into(),
            vector,
            sparse: None,
        }
    }

    /// Attach a sparse vector.
    pub fn sparse(mut self, sparse: SparseVector) -> Self {
        self.sparse = Some(sparse);
        self
    }
}

/// A fused embedding plus filter attributes, owned exclusively by the
/// index once inserted. Immutable after insertion; an update is an
/// explicit delete followed by a fresh insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub embedding: FusedEmbedding,
    #[serde(default)]
    pub attributes: Attributes,
}

impl IndexEntry {
    pub fn new(embedding: FusedEmbedding) -> Self {
        Self {
            embedding,
            attributes: Attributes::new(),
        }
    }

    /// Build an entry straight from an id and dense vector.
    pub fn from_vector(record_id: impl Into<String>, vector: Vector) -> Self {
        Self::new(FusedEmbedding::new(record_id, vector))
    }

    /// Attach a sparse vector.
    pub fn sparse(mut self, sparse: SparseVector) -> Self {
        self.embedding.sparse = Some(sparse);
        self
    }

    /// Add a filter attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Record id of this entry.
    pub fn record_id(&self) -> &str {
        &self.embedding.record_id
    }
}
