//! Search request types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CallaError, Result};
use crate::index::filter::AttributeFilter;
use crate::vector::Vector;
use crate::vector::sparse::SparseVector;

fn default_query_limit() -> usize {
    10
}

/// One search request: dense and/or sparse query plus ranking options.
///
/// A request carrying both a dense and a sparse component is a hybrid
/// query; its rankings are fused with Reciprocal Rank Fusion using
/// `alpha` as the dense weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Dense query vector, if any.
    #[serde(default)]
    pub dense: Option<Vector>,
    /// Sparse query vector, if any.
    #[serde(default)]
    pub sparse: Option<SparseVector>,
    /// Number of neighbors requested. Must be >= 1.
    #[serde(default = "default_query_limit")]
    pub k: usize,
    /// Attribute filter applied before ranking.
    #[serde(default)]
    pub filter: Option<AttributeFilter>,
    /// Hybrid fusion weight in `[0, 1]` for the dense ranking.
    /// `None` means the engine default (0.5).
    #[serde(default)]
    pub alpha: Option<f64>,
    /// Caller-supplied deadline for this request.
    #[serde(skip)]
    pub deadline: Option<Duration>,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            dense: None,
            sparse: None,
            k: default_query_limit(),
            filter: None,
            alpha: None,
            deadline: None,
        }
    }
}

impl QueryRequest {
    /// A pure-dense request.
    pub fn dense(vector: Vector, k: usize) -> Self {
        Self {
            dense: Some(vector),
            k,
            ..Default::default()
        }
    }

    /// A pure-sparse request.
    pub fn sparse(sparse: SparseVector, k: usize) -> Self {
        Self {
            sparse: Some(sparse),
            k,
            ..Default::default()
        }
    }

    /// Start building a request.
    pub fn builder() -> QueryRequestBuilder {
        QueryRequestBuilder::new()
    }
}

/// Builder for [`QueryRequest`].
#[derive(Debug, Default)]
pub struct QueryRequestBuilder {
    request: QueryRequest,
}

impl QueryRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dense(mut self, vector: Vector) -> Self {
        self.request.dense = Some(vector);
        self
    }

    pub fn sparse(mut self, sparse: SparseVector) -> Self {
        self.request.sparse = Some(sparse);
        self
    }

    pub fn k(mut self, k: usize) -> Self {
        self.request.k = k;
        self
    }

    pub fn filter(mut self, filter: AttributeFilter) -> Self {
        self.request.filter = Some(filter);
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.request.alpha = Some(alpha);
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.request.deadline = Some(deadline);
        self
    }

    pub fn build(self) -> QueryRequest {
        self.request
    }
}

/// Wire-shaped hybrid query mirroring the external API surface: a dense
/// embedding and/or a sparse embedding given as parallel
/// dimension/value arrays, plus the RRF ranking weight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridQuery {
    #[serde(default)]
    pub dense_embedding: Option<Vec<f64>>,
    #[serde(default)]
    pub sparse_embedding_dimensions: Option<Vec<u32>>,
    #[serde(default)]
    pub sparse_embedding_values: Option<Vec<f64>>,
    #[serde(default)]
    pub rrf_ranking_alpha: Option<f64>,
}

impl HybridQuery {
    /// Convert into an internal [`QueryRequest`] with the given `k`.
    pub fn into_request(self, k: usize) -> Result<QueryRequest> {
        let sparse = match (
            self.sparse_embedding_dimensions,
            self.sparse_embedding_values,
        ) {
            (Some(dimensions), Some(values)) => Some(SparseVector::new(dimensions, values)?),
            (None, None) => None,
            _ => {
                return Err(CallaError::invalid_query(
                    "sparse embedding requires both dimensions and values",
                ));
            }
        };

        Ok(QueryRequest {
            dense: self.dense_embedding.map(Vector::new),
            sparse,
            k,
            filter: None,
            alpha: self.rrf_ranking_alpha,
            deadline: None,
        })
    }
}
