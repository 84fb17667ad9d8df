//! Candidate types shared by every source and by the filter pipeline.

use data_loader::RowIndex;

/// Where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Nearest neighbours of a query title in the similarity matrix
    Similarity,
    /// Neighbours of titles the user searched for earlier
    History,
    /// Plain catalog scan (browsing by genre, category, or letter)
    Catalog,
}

/// A movie proposed for display, identified by its catalog row
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub row: RowIndex,
    pub title: String,
    /// Similarity to the query; 0.0 for catalog scans
    pub score: f32,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new(row: RowIndex, title: impl Into<String>, source: CandidateSource, score: f32) -> Self {
        Self {
            row,
            title: title.into(),
            score,
            source,
        }
    }
}

/// A title that approximately matches a query that had no exact hit
#[derive(Debug, Clone, PartialEq)]
pub struct TitleSuggestion {
    pub title: String,
    /// Match score on a 0-100 scale
    pub score: u8,
}
