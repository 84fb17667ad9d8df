//! TF-IDF vectorization of tag strings.
//!
//! Mirrors the scikit-learn `TfidfVectorizer` defaults:
//! - tokens are runs of two or more word characters, lower-cased
//! - English stop words are dropped
//! - the vocabulary keeps the `max_features` most frequent terms
//! - smooth idf: `ln((1 + n) / (1 + df)) + 1`
//! - raw counts times idf, then L2 normalisation

use crate::error::{PipelineError, Result};
use crate::stopwords::is_stop_word;
use data_loader::VectorizerModel;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// A sparse document vector: `(vocabulary index, weight)` sorted by index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    pub fn new(mut entries: Vec<(usize, f32)>) -> Self {
        entries.sort_by_key(|&(index, _)| index);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Dot product by merging the two sorted index lists
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            if a_idx == b_idx {
                sum += a_w * b_w;
                i += 1;
                j += 1;
            } else if a_idx < b_idx {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }
}

/// Split a document into lower-cased terms, stop words removed
pub fn tokenize(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

fn term_counts(document: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in tokenize(document) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

pub struct TfidfVectorizer {
    max_features: usize,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self { max_features: 5000 }
    }

    /// Cap on vocabulary size (default: 5000)
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Fit a model on `documents` and return it with every document's vector
    #[instrument(skip(self, documents), fields(documents = documents.len()))]
    pub fn fit_transform<S: AsRef<str> + Sync>(
        &self,
        documents: &[S],
    ) -> Result<(VectorizerModel, Vec<SparseVector>)> {
        if documents.is_empty() {
            return Err(PipelineError::EmptyCorpus);
        }

        let counts: Vec<HashMap<String, u32>> = documents
            .par_iter()
            .map(|doc| term_counts(doc.as_ref()))
            .collect();

        // Corpus-wide term frequency and document frequency
        let mut corpus: HashMap<&str, (u64, u32)> = HashMap::new();
        for doc in &counts {
            for (term, &count) in doc {
                let entry = corpus.entry(term.as_str()).or_insert((0, 0));
                entry.0 += count as u64;
                entry.1 += 1;
            }
        }
        if corpus.is_empty() {
            return Err(PipelineError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&str, u64, u32)> = corpus
            .into_iter()
            .map(|(term, (tf, df))| (term, tf, df))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n = documents.len() as f64;
        let vocabulary: Vec<String> = ranked.iter().map(|(term, _, _)| term.to_string()).collect();
        let idf: Vec<f32> = ranked
            .iter()
            .map(|&(_, _, df)| (((1.0 + n) / (1.0 + df as f64)).ln() + 1.0) as f32)
            .collect();

        let model = VectorizerModel {
            vocabulary,
            idf,
            documents: documents.len(),
        };
        info!(
            "Fitted TF-IDF on {} documents with {} terms",
            model.documents,
            model.vocabulary.len()
        );

        let vectors: Vec<SparseVector> = counts
            .par_iter()
            .map(|doc| weigh(&model, doc))
            .collect();
        Ok((model, vectors))
    }

    pub fn fit<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Result<VectorizerModel> {
        self.fit_transform(documents).map(|(model, _)| model)
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Project a document into the space of a fitted model
pub fn transform(model: &VectorizerModel, document: &str) -> SparseVector {
    weigh(model, &term_counts(document))
}

fn weigh(model: &VectorizerModel, counts: &HashMap<String, u32>) -> SparseVector {
    let mut entries: Vec<(usize, f64)> = counts
        .iter()
        .filter_map(|(term, &count)| {
            let index = model.index_of(term)?;
            Some((index, count as f64 * model.idf[index] as f64))
        })
        .collect();

    let norm = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for entry in &mut entries {
            entry.1 /= norm;
        }
    } else {
        debug!("Document has no in-vocabulary terms");
    }

    SparseVector::new(entries.into_iter().map(|(i, w)| (i, w as f32)).collect())
}
