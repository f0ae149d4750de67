//! Retrieval engine facade.
//!
//! Wires the embedding source, fusion pipeline, index, and query
//! engine together behind one handle. Every collaborator is an explicit
//! constructor dependency; there is no ambient state.
//!
//! The build path embeds and fuses records into the index; the online
//! path embeds queries through the same fusion code so entities and
//! queries land in the same space.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::data::Record;
use crate::embedding::embedder::{Embedder, TaskHint};
use crate::embedding::executor::EmbedderExecutor;
use crate::error::Result;
use crate::fusion::FusionPipeline;
use crate::index::entry::{FusedEmbedding, IndexEntry};
use crate::index::flat::FlatIndex;
use crate::index::{AnnIndex, NeighborResult};
use crate::query::engine::QueryEngine;
use crate::query::request::{HybridQuery, QueryRequest};
use crate::vector::Vector;
use crate::vector::sparse::SparseVector;

pub use config::EngineConfig;

/// The engine facade: build path plus online query path over one
/// shared index.
pub struct RetrievalEngine {
    config: EngineConfig,
    pipeline: Arc<FusionPipeline>,
    index: Arc<dyn AnnIndex>,
    queries: QueryEngine,
    executor: EmbedderExecutor,
}

impl RetrievalEngine {
    /// Create an engine over the exact flat backend.
    pub fn new(embedder: Arc<dyn Embedder>, config: EngineConfig) -> Result<Self> {
        let index: Arc<dyn AnnIndex> =
            Arc::new(FlatIndex::new(config.dimension, config.metric));
        Self::with_index(embedder, index, config)
    }

    /// Create an engine over a caller-supplied index backend.
    pub fn with_index(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn AnnIndex>,
        config: EngineConfig,
    ) -> Result<Self> {
        let pipeline = Arc::new(FusionPipeline::new(
            embedder,
            config.modality_weights.clone(),
            config.dimension,
        ));
        let queries = QueryEngine::new(index.clone())
            .rrf_c(config.rrf_c)
            .default_alpha(config.default_alpha);
        let executor = EmbedderExecutor::new()?;

        Ok(Self {
            config,
            pipeline,
            index,
            queries,
            executor,
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared index handle.
    pub fn index(&self) -> &Arc<dyn AnnIndex> {
        &self.index
    }

    fn embed_timeout(&self) -> Option<Duration> {
        self.config.embed_timeout_ms.map(Duration::from_millis)
    }

    fn run_embedding<F, T>(&self, future: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        match self.embed_timeout() {
            Some(timeout) => self.executor.run_with_timeout(future, timeout),
            None => self.executor.run(future),
        }
    }

    // =========================================================================
    // Build path
    // =========================================================================

    /// Embed, fuse, and insert one record.
    pub fn index_record(&self, record: Record) -> Result<()> {
        self.index_records(vec![record])
    }

    /// Embed, fuse, and insert a batch of records.
    ///
    /// All text content goes to the provider in one batched call. Each
    /// insert is atomic; a failure mid-batch leaves earlier records
    /// indexed and the failing one absent.
    pub fn index_records(&self, records: Vec<Record>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let pipeline = self.pipeline.clone();
        let batch = records.clone();
        let vectors = self.run_embedding(async move {
            pipeline
                .embed_records(&batch, TaskHint::RetrievalDocument)
                .await
        })?;

        for (record, vector) in records.into_iter().zip(vectors) {
            let mut entry = IndexEntry::new(FusedEmbedding::new(record.id.clone(), vector));
            entry.attributes = record.attributes;
            self.index.insert(entry)?;
        }
        debug!("indexed batch; index now holds {} entries", self.index.len());
        Ok(())
    }

    /// Insert a pre-fused entry directly, bypassing the embedding path.
    pub fn insert_entry(&self, entry: IndexEntry) -> Result<()> {
        self.index.insert(entry)
    }

    /// Delete an entry by record id.
    pub fn delete(&self, record_id: &str) -> Result<()> {
        self.index.delete(record_id)
    }

    // =========================================================================
    // Online query path
    // =========================================================================

    /// Find the `num_neighbors` nearest entries for each pre-computed
    /// dense query vector. One ranked list per query, in query order.
    pub fn find_neighbors(
        &self,
        queries: &[Vector],
        num_neighbors: usize,
    ) -> Result<Vec<Vec<NeighborResult>>> {
        let requests: Vec<QueryRequest> = queries
            .iter()
            .map(|vector| QueryRequest::dense(vector.clone(), num_neighbors))
            .collect();
        self.queries.find_neighbors(&requests)
    }

    /// Hybrid variant of [`Self::find_neighbors`].
    pub fn find_neighbors_hybrid(
        &self,
        queries: Vec<HybridQuery>,
        num_neighbors: usize,
    ) -> Result<Vec<Vec<NeighborResult>>> {
        let requests = queries
            .into_iter()
            .map(|query| query.into_request(num_neighbors))
            .collect::<Result<Vec<_>>>()?;
        self.queries.find_neighbors(&requests)
    }

    /// Execute fully-specified requests (filters, alpha, deadlines).
    pub fn find_neighbors_requests(
        &self,
        requests: &[QueryRequest],
    ) -> Result<Vec<Vec<NeighborResult>>> {
        self.queries.find_neighbors(requests)
    }

    /// Embed a raw record as a query and rank its neighbors.
    ///
    /// Uses the retrieval-query task hint; the fusion code is the same
    /// one the build path runs.
    pub fn query_record(&self, record: &Record, k: usize) -> Result<Vec<NeighborResult>> {
        let pipeline = self.pipeline.clone();
        let record = record.clone();
        let vector = self.run_embedding(async move {
            pipeline.embed_record(&record, TaskHint::RetrievalQuery).await
        })?;
        self.queries.execute(&QueryRequest::dense(vector, k))
    }

    /// Sparse-only search, exposed for callers holding a sparse signal
    /// without a dense one.
    pub fn query_sparse(&self, sparse: SparseVector, k: usize) -> Result<Vec<NeighborResult>> {
        self.queries.execute(&QueryRequest::sparse(sparse, k))
    }
}
