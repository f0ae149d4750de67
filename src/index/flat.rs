//! Exact brute-force index backend.
//!
//! Scans every candidate per query (O(n·d)). This is the crate's
//! reference implementation: any optimized [`AnnIndex`] backend is
//! tested against the ranking this one produces.

use std::collections::BTreeMap;

use log::debug;
use parking_lot::RwLock;

use crate::error::{CallaError, Result};
use crate::index::entry::IndexEntry;
use crate::index::filter::AttributeFilter;
use crate::index::{AnnIndex, NeighborResult};
use crate::vector::Vector;
use crate::vector::distance::DistanceMetric;
use crate::vector::sparse::SparseVector;

/// In-memory exact-scan index.
///
/// Entries live under a single reader-writer lock: searches take shared
/// read access and run concurrently; insert and delete take the write
/// lock, so each mutation is atomic with respect to any search — an
/// entry is observed either fully present or fully absent.
pub struct FlatIndex {
    dimension: usize,
    metric: DistanceMetric,
    // BTreeMap keeps iteration in id order, which makes the ascending-id
    // tie break fall out of a stable sort.
    entries: RwLock<BTreeMap<String, IndexEntry>>,
}

impl FlatIndex {
    /// Create an empty index with a fixed dimension and metric.
    pub fn new(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            dimension,
            metric,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create an empty Euclidean index, the default metric.
    pub fn euclidean(dimension: usize) -> Self {
        Self::new(dimension, DistanceMetric::Euclidean)
    }

    /// Look up an entry by record id.
    pub fn get(&self, record_id: &str) -> Option<IndexEntry> {
        self.entries.read().get(record_id).cloned()
    }

    fn rank_and_truncate(mut scored: Vec<(String, f64)>, k: usize) -> Vec<NeighborResult> {
        // Stable sort over id-ordered input: equal distances keep
        // ascending id order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);
        scored
            .into_iter()
            .enumerate()
            .map(|(position, (record_id, distance))| NeighborResult {
                record_id,
                distance,
                rank: position + 1,
            })
            .collect()
    }
}

impl AnnIndex for FlatIndex {
    fn insert(&self, entry: IndexEntry) -> Result<()> {
        entry.embedding.vector.check_dimension(self.dimension)?;
        if !entry.embedding.vector.is_valid() {
            return Err(CallaError::invalid_query(format!(
                "vector for record '{}' contains non-finite values",
                entry.record_id()
            )));
        }

        let mut entries = self.entries.write();
        if entries.contains_key(entry.record_id()) {
            return Err(CallaError::DuplicateId(entry.record_id().to_string()));
        }
        debug!("flat index: insert '{}'", entry.record_id());
        entries.insert(entry.record_id().to_string(), entry);
        Ok(())
    }

    fn delete(&self, record_id: &str) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.remove(record_id).is_none() {
            return Err(CallaError::not_found(format!("record '{record_id}'")));
        }
        debug!("flat index: delete '{record_id}'");
        Ok(())
    }

    fn search(
        &self,
        query: &Vector,
        k: usize,
        filter: Option<&AttributeFilter>,
    ) -> Result<Vec<NeighborResult>> {
        if k == 0 {
            return Err(CallaError::invalid_query("k must be >= 1"));
        }
        query.check_dimension(self.dimension)?;

        let entries = self.entries.read();
        let mut scored = Vec::with_capacity(entries.len());
        for (record_id, entry) in entries.iter() {
            if let Some(filter) = filter {
                if !filter.matches(&entry.attributes) {
                    continue;
                }
            }
            let distance = self
                .metric
                .distance(&query.data, &entry.embedding.vector.data)?;
            scored.push((record_id.clone(), distance));
        }
        drop(entries);

        Ok(Self::rank_and_truncate(scored, k))
    }

    fn search_sparse(
        &self,
        query: &SparseVector,
        k: usize,
        filter: Option<&AttributeFilter>,
    ) -> Result<Vec<NeighborResult>> {
        if k == 0 {
            return Err(CallaError::invalid_query("k must be >= 1"));
        }

        let entries = self.entries.read();
        let mut scored = Vec::new();
        for (record_id, entry) in entries.iter() {
            let Some(sparse) = &entry.embedding.sparse else {
                continue;
            };
            if let Some(filter) = filter {
                if !filter.matches(&entry.attributes) {
                    continue;
                }
            }
            // Negated dot product keeps "smaller is closer" across both
            // search paths.
            scored.push((record_id.clone(), -query.dot(sparse)));
        }
        drop(entries);

        Ok(Self::rank_and_truncate(scored, k))
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn metric(&self) -> DistanceMetric {
        self.metric
    }
}
