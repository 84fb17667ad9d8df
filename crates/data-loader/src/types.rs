//! Core domain types for the content-based recommender.
//!
//! This module defines the data structures shared by the offline build and
//! the serving path:
//! - `RawMovie`: one joined row of the TMDB movies + credits exports
//! - `MovieRecord`: the immutable per-movie record produced by the build
//! - `SimilarityMatrix`: dense, symmetric, row-major cosine scores
//! - `VectorizerModel`: the fitted TF-IDF vocabulary and weights
//! - `Catalog`: the index-aligned bundle loaded once at start-up

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// TMDB movie identifier
pub type MovieId = u32;

/// Row position of a movie in the catalog and in the similarity matrix
pub type RowIndex = usize;

// =============================================================================
// Offline input
// =============================================================================

/// A crew credit; only the director is used for tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
}

/// One movie as read from the TMDB exports, before tag construction.
///
/// Name lists keep their original spelling (spaces included); the feature
/// builder is responsible for normalising them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMovie {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// Cast names in billing order
    pub cast: Vec<String>,
    pub crew: Vec<CrewMember>,
}

impl RawMovie {
    /// Name of the first crew member credited as `Director`
    pub fn director(&self) -> Option<&str> {
        self.crew
            .iter()
            .find(|member| member.job == "Director")
            .map(|member| member.name.as_str())
    }
}

// =============================================================================
// Built artifacts
// =============================================================================

/// A movie as seen by the serving path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    /// Normalised, stemmed tag string used for vectorization
    pub tags: String,
    /// Genre names with inner whitespace removed ("Science Fiction" -> "ScienceFiction")
    pub genres: Vec<String>,
}

impl MovieRecord {
    /// Distinct whitespace-separated tag tokens
    pub fn tag_set(&self) -> std::collections::HashSet<&str> {
        self.tags.split_whitespace().collect()
    }
}

/// Dense N×N cosine similarity matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Wrap a row-major buffer; fails unless it holds exactly `size * size`
    /// finite values
    pub fn new(size: usize, values: Vec<f32>) -> Result<Self> {
        let expected = size.checked_mul(size).ok_or_else(|| {
            DataLoadError::ValidationError(format!("similarity matrix size {} overflows", size))
        })?;
        if values.len() != expected {
            return Err(DataLoadError::ValidationError(format!(
                "similarity matrix of size {} needs {} values, got {}",
                size,
                expected,
                values.len()
            )));
        }
        if let Some(bad) = values.iter().position(|v| !v.is_finite()) {
            return Err(DataLoadError::ValidationError(format!(
                "similarity matrix has non-finite score at ({}, {})",
                bad / size,
                bad % size
            )));
        }
        Ok(Self { size, values })
    }

    pub(crate) fn validated(self) -> Result<Self> {
        Self::new(self.size, self.values)
    }

    /// Build from nested rows (mainly for tests and small fixtures)
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let size = rows.len();
        if let Some(bad) = rows.iter().position(|row| row.len() != size) {
            return Err(DataLoadError::ValidationError(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                size
            )));
        }
        Self::new(size, rows.into_iter().flatten().collect())
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Borrow one row of scores
    pub fn row(&self, index: RowIndex) -> Option<&[f32]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.values[start..start + self.size])
    }

    pub fn get(&self, i: RowIndex, j: RowIndex) -> Option<f32> {
        self.row(i).and_then(|row| row.get(j).copied())
    }
}

/// Fitted TF-IDF model: alphabetical vocabulary and matching idf weights.
///
/// Persisted alongside the matrix so that unseen documents could be projected
/// into the same space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerModel {
    pub vocabulary: Vec<String>,
    pub idf: Vec<f32>,
    /// Number of documents the model was fitted on
    pub documents: usize,
}

impl VectorizerModel {
    /// Position of a term in the vocabulary
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|probe| probe.as_str().cmp(term))
            .ok()
    }
}

// =============================================================================
// Catalog - the read-only serving state
// =============================================================================

/// Movie records, similarity matrix, vectorizer model, and genre list,
/// guaranteed to be index-aligned.
///
/// Row `i` of the similarity matrix always describes `movies[i]`. A catalog
/// can only be constructed through `Catalog::new`, which enforces this.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) movies: Vec<MovieRecord>,
    pub(crate) similarity: SimilarityMatrix,
    pub(crate) vectorizer: VectorizerModel,
    pub(crate) genres: Vec<String>,
    /// Title -> first row carrying that title
    pub(crate) title_index: HashMap<String, RowIndex>,
}

impl Catalog {
    /// Assemble a catalog, validating alignment of all parts
    pub fn new(
        movies: Vec<MovieRecord>,
        similarity: SimilarityMatrix,
        vectorizer: VectorizerModel,
        genres: Vec<String>,
    ) -> Result<Self> {
        if similarity.size() != movies.len() {
            return Err(DataLoadError::Misaligned(format!(
                "similarity matrix has {} rows but movie list has {} records",
                similarity.size(),
                movies.len()
            )));
        }
        if vectorizer.documents != movies.len() {
            return Err(DataLoadError::Misaligned(format!(
                "vectorizer was fitted on {} documents but movie list has {} records",
                vectorizer.documents,
                movies.len()
            )));
        }
        if vectorizer.vocabulary.len() != vectorizer.idf.len() {
            return Err(DataLoadError::ValidationError(format!(
                "vectorizer has {} terms but {} idf weights",
                vectorizer.vocabulary.len(),
                vectorizer.idf.len()
            )));
        }
        if genres.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(DataLoadError::ValidationError(
                "genre list must be sorted and distinct".to_string(),
            ));
        }
        for movie in &movies {
            if let Some(missing) = movie
                .genres
                .iter()
                .find(|g| genres.binary_search(g).is_err())
            {
                return Err(DataLoadError::Misaligned(format!(
                    "genre '{}' of '{}' is absent from the genre list",
                    missing, movie.title
                )));
            }
        }

        let mut title_index = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            title_index.entry(movie.title.clone()).or_insert(row);
        }

        Ok(Self {
            movies,
            similarity,
            vectorizer,
            genres,
            title_index,
        })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All records in row order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn get(&self, row: RowIndex) -> Option<&MovieRecord> {
        self.movies.get(row)
    }

    /// Exact, case-sensitive title lookup
    pub fn find_row(&self, title: &str) -> Option<RowIndex> {
        self.title_index.get(title).copied()
    }

    /// Similarity scores of one movie against every row
    pub fn similarity_row(&self, row: RowIndex) -> Option<&[f32]> {
        self.similarity.row(row)
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn vectorizer(&self) -> &VectorizerModel {
        &self.vectorizer
    }

    /// Sorted, distinct genre names
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Iterator over titles in row order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }
}
