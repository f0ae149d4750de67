//! Query validation and execution.
//!
//! The engine validates each request fully before touching the index,
//! runs dense and/or sparse rankings, and fuses hybrid requests with
//! Reciprocal Rank Fusion. Requests in a batch are independent and run
//! in parallel; results come back in request order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use crate::error::{CallaError, Result};
use crate::index::{AnnIndex, NeighborResult};
use crate::query::request::QueryRequest;

/// A zero deadline is expired on arrival.
fn check_deadline(request: &QueryRequest, started: Instant) -> Result<()> {
    if let Some(deadline) = request.deadline {
        if deadline.is_zero() || started.elapsed() > deadline {
            return Err(CallaError::Timeout(format!(
                "query exceeded deadline of {deadline:?}"
            )));
        }
    }
    Ok(())
}

fn default_rrf_c() -> f64 {
    60.0
}

fn default_alpha() -> f64 {
    0.5
}

/// Executes search requests against a shared [`AnnIndex`].
pub struct QueryEngine {
    index: Arc<dyn AnnIndex>,
    /// RRF rank constant `c` in `1 / (rank + c)`.
    rrf_c: f64,
    /// Dense weight used when a hybrid request does not supply one.
    default_alpha: f64,
}

impl QueryEngine {
    /// Create an engine with the conventional RRF constant (60) and a
    /// default alpha of 0.5.
    pub fn new(index: Arc<dyn AnnIndex>) -> Self {
        Self {
            index,
            rrf_c: default_rrf_c(),
            default_alpha: default_alpha(),
        }
    }

    /// Override the RRF constant.
    pub fn rrf_c(mut self, c: f64) -> Self {
        self.rrf_c = c;
        self
    }

    /// Override the default hybrid alpha.
    pub fn default_alpha(mut self, alpha: f64) -> Self {
        self.default_alpha = alpha;
        self
    }

    /// Execute a batch of independent requests. One result list per
    /// request, in request order. No request mutates index state, so
    /// the batch runs with shared read access.
    pub fn find_neighbors(&self, requests: &[QueryRequest]) -> Result<Vec<Vec<NeighborResult>>> {
        requests
            .par_iter()
            .map(|request| self.execute(request))
            .collect()
    }

    /// Execute a single request.
    pub fn execute(&self, request: &QueryRequest) -> Result<Vec<NeighborResult>> {
        let started = Instant::now();
        self.validate(request)?;
        // An already-expired request must not pay for a scan.
        check_deadline(request, started)?;

        let results = match (&request.dense, &request.sparse) {
            (Some(dense), None) => {
                self.index
                    .search(dense, request.k, request.filter.as_ref())?
            }
            (None, Some(sparse)) => {
                self.index
                    .search_sparse(sparse, request.k, request.filter.as_ref())?
            }
            (Some(_), Some(_)) => self.execute_hybrid(request)?,
            (None, None) => unreachable!("validated above"),
        };

        check_deadline(request, started)?;

        Ok(results)
    }

    fn validate(&self, request: &QueryRequest) -> Result<()> {
        if request.k == 0 {
            return Err(CallaError::invalid_query("k must be >= 1"));
        }
        if request.dense.is_none() && request.sparse.is_none() {
            return Err(CallaError::invalid_query(
                "request requires a dense vector, a sparse vector, or both",
            ));
        }
        if let Some(dense) = &request.dense {
            // Fail fast before touching the index; never truncate or pad.
            dense.check_dimension(self.index.dimension())?;
        }
        if let Some(alpha) = request.alpha {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(CallaError::invalid_query(format!(
                    "alpha must be in [0, 1], got {alpha}"
                )));
            }
        }
        Ok(())
    }

    /// Hybrid execution: rank dense-only and sparse-only separately
    /// over the full filtered candidate set, then fuse:
    ///
    /// `score(id) = alpha * 1/(rank_dense + c) + (1 - alpha) * 1/(rank_sparse + c)`
    ///
    /// Ranks are 1-based; an id absent from one ranking contributes 0
    /// from that term. The final order is descending by fused score
    /// with ties broken by ascending record id. The reported distance
    /// is the negated fused score, so ascending distance matches the
    /// fused ranking like every other search path.
    fn execute_hybrid(&self, request: &QueryRequest) -> Result<Vec<NeighborResult>> {
        let dense = request.dense.as_ref().expect("hybrid request");
        let sparse = request.sparse.as_ref().expect("hybrid request");
        let alpha = request.alpha.unwrap_or(self.default_alpha);

        // Brute-force backends rank every candidate, so fusing over the
        // full depth keeps the top-k exact.
        let depth = self.index.len().max(request.k);
        if depth == 0 {
            return Ok(Vec::new());
        }

        let dense_ranking = self
            .index
            .search(dense, depth, request.filter.as_ref())?;
        let sparse_ranking = self
            .index
            .search_sparse(sparse, depth, request.filter.as_ref())?;
        debug!(
            "hybrid fusion: {} dense hits, {} sparse hits, alpha {}",
            dense_ranking.len(),
            sparse_ranking.len(),
            alpha
        );

        let mut fused: HashMap<String, f64> = HashMap::new();
        for hit in &dense_ranking {
            *fused.entry(hit.record_id.clone()).or_default() +=
                alpha / (hit.rank as f64 + self.rrf_c);
        }
        for hit in &sparse_ranking {
            *fused.entry(hit.record_id.clone()).or_default() +=
                (1.0 - alpha) / (hit.rank as f64 + self.rrf_c);
        }

        let mut scored: Vec<(String, f64)> = fused.into_iter().collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(request.k);

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(position, (record_id, score))| NeighborResult {
                record_id,
                distance: -score,
                rank: position + 1,
            })
            .collect())
    }
}
