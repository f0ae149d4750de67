//! Engine configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::Modality;
use crate::vector::distance::DistanceMetric;

fn default_dimension() -> usize {
    128
}

fn default_rrf_c() -> f64 {
    60.0
}

fn default_alpha() -> f64 {
    0.5
}

/// Configuration for a [`crate::engine::RetrievalEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Dense dimensionality of every vector in the index.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Distance metric, fixed for the engine's index.
    #[serde(default)]
    pub metric: DistanceMetric,

    /// Fusion weight per modality. Missing modalities weigh 1.0.
    #[serde(default)]
    pub modality_weights: HashMap<Modality, f64>,

    /// RRF rank constant.
    #[serde(default = "default_rrf_c")]
    pub rrf_c: f64,

    /// Default dense weight for hybrid requests.
    #[serde(default = "default_alpha")]
    pub default_alpha: f64,

    /// Deadline for one embedding provider call, in milliseconds.
    /// `None` waits indefinitely.
    #[serde(default)]
    pub embed_timeout_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            metric: DistanceMetric::default(),
            modality_weights: HashMap::new(),
            rrf_c: default_rrf_c(),
            default_alpha: default_alpha(),
            embed_timeout_ms: None,
        }
    }
}

impl EngineConfig {
    /// Config with the given dimension and defaults everywhere else.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn modality_weight(mut self, modality: Modality, weight: f64) -> Self {
        self.modality_weights.insert(modality, weight);
        self
    }

    pub fn rrf_c(mut self, c: f64) -> Self {
        self.rrf_c = c;
        self
    }

    pub fn default_alpha(mut self, alpha: f64) -> Self {
        self.default_alpha = alpha;
        self
    }

    pub fn embed_timeout_ms(mut self, millis: u64) -> Self {
        self.embed_timeout_ms = Some(millis);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_json() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dimension, 128);
        assert_eq!(config.metric, DistanceMetric::Euclidean);
        assert_eq!(config.rrf_c, 60.0);
        assert_eq!(config.default_alpha, 0.5);
        assert!(config.embed_timeout_ms.is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let config = EngineConfig::new(768)
            .metric(DistanceMetric::Cosine)
            .modality_weight(Modality::Text, 0.8)
            .embed_timeout_ms(2_000);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dimension, 768);
        assert_eq!(back.metric, DistanceMetric::Cosine);
        assert_eq!(back.modality_weights.get(&Modality::Text), Some(&0.8));
        assert_eq!(back.embed_timeout_ms, Some(2_000));
    }
}
