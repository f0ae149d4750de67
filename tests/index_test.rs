use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use calla::{AnnIndex, DistanceMetric, FlatIndex, IndexEntry, Vector};

fn random_vector(rng: &mut StdRng, dim: usize) -> Vec<f64> {
    (0..dim).map(|_| rng.random_range(-1.0..1.0)).collect()
}

/// Independent linear-scan ground truth, written without going through
/// any crate search code path.
fn ground_truth_top_k(
    entries: &[(String, Vec<f64>)],
    query: &[f64],
    k: usize,
) -> Vec<String> {
    let mut scored: Vec<(String, f64)> = entries
        .iter()
        .map(|(id, v)| {
            let dist: f64 = v
                .iter()
                .zip(query.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt();
            (id.clone(), dist)
        })
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(k);
    scored.into_iter().map(|(id, _)| id).collect()
}

#[test]
fn flat_search_matches_independent_ground_truth() {
    let dim = 16;
    let k = 10;
    let mut rng = StdRng::seed_from_u64(7);

    let entries: Vec<(String, Vec<f64>)> = (0..200)
        .map(|i| (format!("e{i:03}"), random_vector(&mut rng, dim)))
        .collect();

    let index = FlatIndex::new(dim, DistanceMetric::Euclidean);
    for (id, v) in &entries {
        index
            .insert(IndexEntry::from_vector(id.clone(), Vector::new(v.clone())))
            .unwrap();
    }

    let mut total_recall = 0.0;
    let queries = 20;
    for _ in 0..queries {
        let query = random_vector(&mut rng, dim);
        let expected = ground_truth_top_k(&entries, &query, k);
        let actual: Vec<String> = index
            .search(&Vector::new(query), k, None)
            .unwrap()
            .into_iter()
            .map(|r| r.record_id)
            .collect();

        let hits = actual.iter().filter(|id| expected.contains(id)).count();
        total_recall += hits as f64 / k as f64;
        // The flat backend is exact, so the id sets match outright.
        assert_eq!(actual, expected);
    }

    // The stated bound any backend behind the AnnIndex trait must meet.
    assert!(total_recall / queries as f64 >= 0.95);
}

#[test]
fn insert_delete_is_idempotent_for_all_metrics() {
    for metric in [
        DistanceMetric::Euclidean,
        DistanceMetric::Cosine,
        DistanceMetric::DotProduct,
    ] {
        let index = FlatIndex::new(2, metric);
        index
            .insert(IndexEntry::from_vector("a", Vector::new(vec![1.0, 0.0])))
            .unwrap();
        index
            .insert(IndexEntry::from_vector("b", Vector::new(vec![0.0, 1.0])))
            .unwrap();

        let query = Vector::new(vec![0.5, 0.5]);
        let before = index.search(&query, 10, None).unwrap();

        index
            .insert(IndexEntry::from_vector("tmp", Vector::new(vec![0.4, 0.4])))
            .unwrap();
        index.delete("tmp").unwrap();

        let after = index.search(&query, 10, None).unwrap();
        assert_eq!(before, after, "metric {metric:?}");
    }
}

#[test]
fn fewer_than_k_only_when_candidates_run_out() {
    let index = FlatIndex::euclidean(2);
    for i in 0..3 {
        index
            .insert(IndexEntry::from_vector(
                format!("e{i}"),
                Vector::new(vec![i as f64, 0.0]),
            ))
            .unwrap();
    }

    let results = index
        .search(&Vector::new(vec![0.0, 0.0]), 10, None)
        .unwrap();
    assert_eq!(results.len(), 3);
}

#[test]
fn concurrent_readers_see_consistent_entries() {
    let index = Arc::new(FlatIndex::euclidean(2));
    for i in 0..50 {
        index
            .insert(IndexEntry::from_vector(
                format!("e{i:02}"),
                Vector::new(vec![i as f64, 0.0]),
            ))
            .unwrap();
    }

    // Readers race a writer that inserts and deletes one entry. Every
    // search must observe that entry fully present or fully absent:
    // result length is 50 or 51, never anything else.
    let writer = {
        let index = index.clone();
        thread::spawn(move || {
            for _ in 0..100 {
                index
                    .insert(IndexEntry::from_vector(
                        "volatile",
                        Vector::new(vec![0.5, 0.5]),
                    ))
                    .unwrap();
                index.delete("volatile").unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let index = index.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let results = index
                        .search(&Vector::new(vec![0.0, 0.0]), 100, None)
                        .unwrap();
                    assert!(results.len() == 50 || results.len() == 51);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn metric_is_fixed_per_index_instance() {
    let cosine = FlatIndex::new(2, DistanceMetric::Cosine);
    assert_eq!(cosine.metric(), DistanceMetric::Cosine);

    // Same data, different metric, different winner.
    cosine
        .insert(IndexEntry::from_vector(
            "long_same_direction",
            Vector::new(vec![10.0, 0.0]),
        ))
        .unwrap();
    cosine
        .insert(IndexEntry::from_vector(
            "short_other_direction",
            Vector::new(vec![0.5, 0.5]),
        ))
        .unwrap();

    let query = Vector::new(vec![1.0, 0.0]);
    let top_cosine = &cosine.search(&query, 1, None).unwrap()[0];
    assert_eq!(top_cosine.record_id, "long_same_direction");

    let euclidean = FlatIndex::euclidean(2);
    euclidean
        .insert(IndexEntry::from_vector(
            "long_same_direction",
            Vector::new(vec![10.0, 0.0]),
        ))
        .unwrap();
    euclidean
        .insert(IndexEntry::from_vector(
            "short_other_direction",
            Vector::new(vec![0.5, 0.5]),
        ))
        .unwrap();
    let top_euclidean = &euclidean.search(&query, 1, None).unwrap()[0];
    assert_eq!(top_euclidean.record_id, "short_other_direction");
}
