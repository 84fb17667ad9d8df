//! Pairwise cosine similarity over TF-IDF vectors.
//!
//! Only the upper triangle is computed, one row per rayon task, and then
//! mirrored, so `m[i][j] == m[j][i]` holds bit for bit.

use crate::error::Result;
use crate::vectorizer::SparseVector;
use data_loader::SimilarityMatrix;
use rayon::prelude::*;
use tracing::{info, instrument};

/// `a.b / (|a| |b|)`, or 0 when either vector is zero
pub fn cosine(a: &SparseVector, b: &SparseVector, norm_a: f32, norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    a.dot(b) / (norm_a * norm_b)
}

#[instrument(skip(vectors), fields(vectors = vectors.len()))]
pub fn cosine_matrix(vectors: &[SparseVector]) -> Result<SimilarityMatrix> {
    let n = vectors.len();
    let norms: Vec<f32> = vectors.iter().map(SparseVector::norm).collect();

    // Row i holds scores for columns i..n
    let upper: Vec<Vec<f32>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (i..n)
                .map(|j| cosine(&vectors[i], &vectors[j], norms[i], norms[j]))
                .collect()
        })
        .collect();

    let mut values = vec![0.0f32; n * n];
    for (i, row) in upper.into_iter().enumerate() {
        for (offset, score) in row.into_iter().enumerate() {
            let j = i + offset;
            values[i * n + j] = score;
            values[j * n + i] = score;
        }
    }

    info!("Computed {}x{} similarity matrix", n, n);
    Ok(SimilarityMatrix::new(n, values)?)
}
