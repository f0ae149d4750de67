//! Fusion pipeline: one fused vector per entity.
//!
//! Each modality contributes a normalized embedding; the fused
//! representation is the weighted sum of the normalized set. The same
//! code path serves the offline build (records into the index) and the
//! online query path, so an entity and a query over it land in the same
//! space.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::data::{Modality, Record};
use crate::embedding::embedder::{Embedder, TaskHint};
use crate::error::{CallaError, Result};
use crate::vector::Vector;
use crate::vector::ops;

/// One modality's contribution to a fused embedding.
#[derive(Debug, Clone)]
pub struct ModalityEmbedding {
    pub modality: Modality,
    pub vector: Vector,
    pub weight: f64,
}

impl ModalityEmbedding {
    pub fn new(modality: Modality, vector: Vector, weight: f64) -> Self {
        Self {
            modality,
            vector,
            weight,
        }
    }
}

/// Orchestrates the embedding source and vector utilities to produce
/// fused representations. Stateless per call; the embedder handle is an
/// explicit dependency, never ambient state.
pub struct FusionPipeline {
    embedder: Arc<dyn Embedder>,
    weights: HashMap<Modality, f64>,
    dimensionality: usize,
}

impl FusionPipeline {
    /// Create a pipeline producing vectors of `dimensionality`, with a
    /// per-modality weight table. Modalities missing from the table
    /// default to weight 1.0.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        weights: HashMap<Modality, f64>,
        dimensionality: usize,
    ) -> Self {
        Self {
            embedder,
            weights,
            dimensionality,
        }
    }

    fn weight_for(&self, modality: Modality) -> f64 {
        self.weights.get(&modality).copied().unwrap_or(1.0)
    }

    /// Fuse per-modality embeddings: normalize each, then weighted sum.
    ///
    /// Modalities are processed in their declared order regardless of
    /// input order, so identical inputs always fuse identically. With a
    /// single modality at weight 1.0 this reduces to plain
    /// normalization. The combined result is NOT renormalized; callers
    /// normalize again when a unit-length fused vector is required.
    pub fn fuse(&self, embeddings: &[ModalityEmbedding]) -> Result<Vector> {
        if embeddings.is_empty() {
            return Err(CallaError::invalid_query(
                "fusion requires at least one modality embedding",
            ));
        }

        let mut ordered: Vec<&ModalityEmbedding> = embeddings.iter().collect();
        ordered.sort_by_key(|e| e.modality);

        let normalized: Vec<(Vector, f64)> = ordered
            .iter()
            .map(|e| (ops::normalize(&e.vector), e.weight))
            .collect();

        ops::weighted_combine(&normalized)
    }

    /// Embed a batch of records and fuse each into one vector.
    ///
    /// All text content goes to the provider in ONE batched call; one
    /// fused vector comes back per record, in input order. Records with
    /// binary modalities go through [`Embedder::embed_bytes`] as well.
    pub async fn embed_records(&self, records: &[Record], task: TaskHint) -> Result<Vec<Vector>> {
        // Batch every text in one round-trip.
        let mut text_owners = Vec::new();
        let mut texts = Vec::new();
        for (position, record) in records.iter().enumerate() {
            if let Some(text) = &record.text {
                text_owners.push(position);
                texts.push(text.clone());
            }
        }

        let text_vectors = if texts.is_empty() {
            Vec::new()
        } else {
            debug!("embedding {} texts in one provider call", texts.len());
            self.embedder
                .embed_text(&texts, task, Some(self.dimensionality))
                .await?
        };
        let mut text_by_record: HashMap<usize, Vector> = text_owners
            .into_iter()
            .zip(text_vectors)
            .collect();

        let mut fused = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let mut parts = Vec::new();
            if let Some(vector) = text_by_record.remove(&position) {
                parts.push(ModalityEmbedding::new(
                    Modality::Text,
                    vector,
                    self.weight_for(Modality::Text),
                ));
            }

            for (&modality, (bytes, mime)) in &record.bytes {
                let vectors = self
                    .embedder
                    .embed_bytes(
                        &[(bytes.clone(), mime.clone())],
                        modality,
                        task,
                        Some(self.dimensionality),
                    )
                    .await?;
                let vector = vectors.into_iter().next().ok_or_else(|| {
                    CallaError::provider("provider returned no vector for byte payload")
                })?;
                parts.push(ModalityEmbedding::new(
                    modality,
                    vector,
                    self.weight_for(modality),
                ));
            }

            if parts.is_empty() {
                return Err(CallaError::invalid_query(format!(
                    "record '{}' has no embeddable content",
                    record.id
                )));
            }
            fused.push(self.fuse(&parts)?);
        }

        Ok(fused)
    }

    /// Embed and fuse a single record.
    pub async fn embed_record(&self, record: &Record, task: TaskHint) -> Result<Vector> {
        let mut vectors = self.embed_records(std::slice::from_ref(record), task).await?;
        Ok(vectors.remove(0))
    }
}
