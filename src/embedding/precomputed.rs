//! Deterministic in-process embedder.
//!
//! Maps registered texts to fixed vectors. Used by tests and by offline
//! build pipelines that already hold embeddings and only need the
//! fusion and indexing stages.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::embedding::embedder::{Embedder, TaskHint};
use crate::error::{CallaError, Result};
use crate::vector::Vector;

/// An [`Embedder`] backed by a registry of precomputed vectors.
#[derive(Debug, Default)]
pub struct PrecomputedEmbedder {
    vectors: RwLock<HashMap<String, Vector>>,
    dimensionality: usize,
}

impl PrecomputedEmbedder {
    /// Create an empty registry producing vectors of `dimensionality`.
    pub fn new(dimensionality: usize) -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
            dimensionality,
        }
    }

    /// Register the embedding for a text.
    pub fn register(&self, text: impl Into<String>, vector: Vector) {
        self.vectors.write().insert(text.into(), vector);
    }
}

#[async_trait]
impl Embedder for PrecomputedEmbedder {
    async fn embed_text(
        &self,
        texts: &[String],
        _task: TaskHint,
        output_dimensionality: Option<usize>,
    ) -> Result<Vec<Vector>> {
        let expected = output_dimensionality.unwrap_or(self.dimensionality);
        let vectors = self.vectors.read();
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let vector = vectors.get(text).ok_or_else(|| {
                CallaError::provider(format!("no precomputed embedding for text: {text:?}"))
            })?;
            vector.check_dimension(expected)?;
            out.push(vector.clone());
        }
        Ok(out)
    }

    fn default_dimensionality(&self) -> usize {
        self.dimensionality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let embedder = PrecomputedEmbedder::new(2);
        embedder.register("a", Vector::new(vec![1.0, 0.0]));
        embedder.register("b", Vector::new(vec![0.0, 1.0]));

        let out = embedder
            .embed_text(
                &["b".to_string(), "a".to_string()],
                TaskHint::Clustering,
                None,
            )
            .await
            .unwrap();
        assert_eq!(out[0].data, vec![0.0, 1.0]);
        assert_eq!(out[1].data, vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn unknown_text_is_a_provider_error() {
        let embedder = PrecomputedEmbedder::new(2);
        let err = embedder
            .embed_text(&["missing".to_string()], TaskHint::RetrievalQuery, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::CallaError::EmbeddingProvider { .. }
        ));
    }
}
