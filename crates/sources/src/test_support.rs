//! Small in-memory catalogs for unit tests.

use data_loader::{Catalog, MovieRecord, SimilarityMatrix, VectorizerModel};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Catalog with bare titles and the given similarity rows
pub fn catalog_from(titles: &[&str], rows: Vec<Vec<f32>>) -> Arc<Catalog> {
    let records = titles
        .iter()
        .enumerate()
        .map(|(row, title)| MovieRecord {
            id: row as u32 + 1,
            title: title.to_string(),
            tags: String::new(),
            genres: vec![],
        })
        .collect();
    catalog_with(records, rows)
}

/// Catalog from full records; the genre list is derived from them
pub fn catalog_with(records: Vec<MovieRecord>, rows: Vec<Vec<f32>>) -> Arc<Catalog> {
    let genres: Vec<String> = records
        .iter()
        .flat_map(|m| m.genres.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let vectorizer = VectorizerModel {
        vocabulary: vec![],
        idf: vec![],
        documents: records.len(),
    };
    let matrix = SimilarityMatrix::from_rows(rows).unwrap();
    Arc::new(Catalog::new(records, matrix, vectorizer, genres).unwrap())
}

/// Similarity rows where every movie is only similar to itself
pub fn identity(n: usize) -> Vec<Vec<f32>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}
