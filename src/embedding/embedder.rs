//! The embedding provider contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::Modality;
use crate::error::{CallaError, Result};
use crate::vector::Vector;

/// Task hint forwarded to the embedding provider.
///
/// Values follow the provider's contract and are not interpreted
/// locally; they only steer how the provider shapes the embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskHint {
    Clustering,
    RetrievalQuery,
    RetrievalDocument,
    SemanticSimilarity,
    Classification,
}

/// An external embedding provider.
///
/// Implementations delegate to a remote model (or an in-process stand-in)
/// and surface transport, auth, and quota failures as
/// [`CallaError::EmbeddingProvider`]. No retry happens at this boundary;
/// retry/backoff policy is the adapter's concern.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts in ONE provider round-trip.
    ///
    /// Returns one vector per input text, in input order. When
    /// `output_dimensionality` is given, every returned vector has
    /// exactly that length; otherwise the provider default applies.
    async fn embed_text(
        &self,
        texts: &[String],
        task: TaskHint,
        output_dimensionality: Option<usize>,
    ) -> Result<Vec<Vector>>;

    /// Embed raw bytes for a non-text modality (image, video).
    ///
    /// Declared extension point with the same signature shape as
    /// [`Self::embed_text`]; providers without multimodal support keep
    /// the default, which reports the capability as unavailable.
    async fn embed_bytes(
        &self,
        _payloads: &[(Vec<u8>, Option<String>)],
        _modality: Modality,
        _task: TaskHint,
        _output_dimensionality: Option<usize>,
    ) -> Result<Vec<Vector>> {
        Err(CallaError::provider(
            "this embedding provider does not support non-text modalities",
        ))
    }

    /// Provider default output dimensionality.
    fn default_dimensionality(&self) -> usize;
}
