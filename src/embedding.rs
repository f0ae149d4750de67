//! Embedding source boundary.
//!
//! The embedding model is an external, opaque service; this module
//! defines the provider contract and the executor that bridges the
//! crate's synchronous pipelines to the async provider call.
//!
//! # Module Structure
//!
//! - [`embedder`]: the [`Embedder`] trait and task hints
//! - [`precomputed`]: deterministic in-process embedder for tests and
//!   offline builds
//! - [`executor`]: blocking bridge with a caller-supplied timeout

pub mod embedder;
pub mod executor;
pub mod precomputed;

pub use embedder::{Embedder, TaskHint};
pub use executor::EmbedderExecutor;
pub use precomputed::PrecomputedEmbedder;
