//! # Calla
//!
//! A multimodal embedding fusion and nearest-neighbor retrieval library
//! for Rust, built for entity resolution workloads.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Normalize-then-weighted-sum fusion across modalities
//! - Exact brute-force index with a trait seam for optimized backends
//! - Dense, sparse, and hybrid (RRF) top-k queries
//! - Deterministic ranking with an ascending-id tie break
//! - Attribute filters applied before ranking
// Core modules
pub mod content;
mod data;
pub mod embedding;
mod engine;
mod error;
pub mod fusion;
pub mod index;
pub mod query;
pub mod vector;

// Re-exports for the public API
pub use content::{ContentStore, MemoryContentStore};
pub use data::{AttrValue, Attributes, Modality, Record};
pub use embedding::embedder::{Embedder, TaskHint};
pub use embedding::executor::EmbedderExecutor;
pub use embedding::precomputed::PrecomputedEmbedder;
pub use engine::{EngineConfig, RetrievalEngine};
pub use error::{CallaError, Result};
pub use fusion::{FusionPipeline, ModalityEmbedding};
pub use index::{AnnIndex, AttributeFilter, FlatIndex, FusedEmbedding, IndexEntry, NeighborResult, NumericRange};
pub use query::{HybridQuery, QueryEngine, QueryRequest, QueryRequestBuilder};
pub use vector::Vector;
pub use vector::distance::DistanceMetric;
pub use vector::sparse::SparseVector;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
