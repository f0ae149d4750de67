//! Nearest-neighbor index.
//!
//! The index owns the searchable collection of fused embeddings and is
//! the crate's one long-lived shared resource: reads run concurrently,
//! inserts and deletes are exclusive and atomic per entry.
//!
//! # Module Structure
//!
//! - [`entry`]: [`FusedEmbedding`] and [`IndexEntry`]
//! - [`filter`]: attribute predicates applied before ranking
//! - [`flat`]: exact brute-force backend, the crate's ground truth
//!
//! [`AnnIndex`] is the seam for swappable backends: an optimized
//! structure must preserve flat ranking within its stated recall bound.

pub mod entry;
pub mod filter;
pub mod flat;

pub use entry::{FusedEmbedding, IndexEntry};
pub use filter::{AttributeFilter, NumericRange};
pub use flat::FlatIndex;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vector::Vector;
use crate::vector::distance::DistanceMetric;
use crate::vector::sparse::SparseVector;

/// One ranked neighbor.
///
/// Results are ordered ascending by distance with ties broken by
/// ascending `record_id`; `rank` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborResult {
    pub record_id: String,
    pub distance: f64,
    pub rank: usize,
}

/// A searchable collection of index entries.
///
/// The distance metric is fixed per instance at construction so every
/// query ranks against the same metric.
pub trait AnnIndex: Send + Sync {
    /// Insert an entry. Fails with [`crate::error::CallaError::DuplicateId`]
    /// if the record id is already present; updates are modeled as
    /// delete + insert by the caller.
    fn insert(&self, entry: IndexEntry) -> Result<()>;

    /// Remove an entry by record id. Fails with
    /// [`crate::error::CallaError::NotFound`] if absent.
    fn delete(&self, record_id: &str) -> Result<()>;

    /// Return up to `k` nearest entries to `query` under this index's
    /// metric. Entries failing `filter` are excluded from candidacy
    /// before ranking, so the result is shorter than `k` only when the
    /// filtered candidate set is.
    fn search(
        &self,
        query: &Vector,
        k: usize,
        filter: Option<&AttributeFilter>,
    ) -> Result<Vec<NeighborResult>>;

    /// Rank entries carrying a sparse vector by descending sparse dot
    /// product with `query`. Entries without a sparse vector are not
    /// candidates. The reported distance is the negated dot product so
    /// smaller still means closer.
    fn search_sparse(
        &self,
        query: &SparseVector,
        k: usize,
        filter: Option<&AttributeFilter>,
    ) -> Result<Vec<NeighborResult>>;

    /// Number of entries currently held.
    fn len(&self) -> usize;

    /// True if no entries are held.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed dense dimensionality of this index.
    fn dimension(&self) -> usize;

    /// Fixed distance metric of this index.
    fn metric(&self) -> DistanceMetric;
}
