//! # Data Loader Crate
//!
//! This crate owns the data side of the content-based recommender.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (RawMovie, MovieRecord, SimilarityMatrix, Catalog)
//! - **parser**: Parse and join the TMDB 5000 movies/credits CSV exports
//! - **index**: Persist and load the catalog artifacts
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! // Load the artifacts produced by the offline build
//! let catalog = Catalog::load_from_dir(Path::new("artifacts"))?;
//!
//! let row = catalog.find_row("Inception").unwrap();
//! let scores = catalog.similarity_row(row).unwrap();
//! println!("{} has {} neighbours", catalog.get(row).unwrap().title, scores.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    MovieId,
    RowIndex,
    // Core types
    Catalog,
    CrewMember,
    MovieRecord,
    RawMovie,
    SimilarityMatrix,
    VectorizerModel,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: MovieId, title: &str, genres: &[&str]) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            tags: String::new(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn model(documents: usize) -> VectorizerModel {
        VectorizerModel {
            vocabulary: vec![],
            idf: vec![],
            documents,
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let movies = vec![
            record(1, "Inception", &["Action"]),
            record(2, "Interstellar", &["Drama"]),
            record(3, "Inception", &["Action"]),
        ];
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.8, 0.1],
            vec![0.8, 1.0, 0.2],
            vec![0.1, 0.2, 1.0],
        ])
        .unwrap();
        let catalog = Catalog::new(
            movies,
            matrix,
            model(3),
            vec!["Action".to_string(), "Drama".to_string()],
        )
        .unwrap();

        // Duplicate titles resolve to the first row
        assert_eq!(catalog.find_row("Inception"), Some(0));
        assert_eq!(catalog.find_row("inception"), None);
        assert_eq!(catalog.similarity_row(1), Some(&[0.8f32, 1.0, 0.2][..]));
        assert_eq!(catalog.titles().count(), 3);
    }

    #[test]
    fn test_catalog_rejects_misaligned_matrix() {
        let movies = vec![record(1, "Up", &[])];
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();

        let result = Catalog::new(movies, matrix, model(1), vec![]);
        assert!(matches!(result, Err(DataLoadError::Misaligned(_))));
    }

    #[test]
    fn test_catalog_rejects_unsorted_genres() {
        let movies = vec![record(1, "Up", &["Animation"])];
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();

        let result = Catalog::new(
            movies,
            matrix,
            model(1),
            vec!["Family".to_string(), "Animation".to_string()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_matrix_requires_square_buffer() {
        assert!(SimilarityMatrix::new(2, vec![1.0, 0.0, 0.0]).is_err());
        assert!(SimilarityMatrix::from_rows(vec![vec![1.0, 0.0]]).is_err());

        let matrix = SimilarityMatrix::new(2, vec![1.0, 0.3, 0.3, 1.0]).unwrap();
        assert_eq!(matrix.get(0, 1), Some(0.3));
        assert_eq!(matrix.row(2), None);
    }

    #[test]
    fn test_matrix_rejects_overflowing_size() {
        let result = SimilarityMatrix::new(usize::MAX, vec![]);
        assert!(matches!(result, Err(DataLoadError::ValidationError(_))));
    }

    #[test]
    fn test_matrix_rejects_non_finite_scores() {
        let result = SimilarityMatrix::new(2, vec![1.0, f32::NAN, 0.3, 1.0]);
        assert!(matches!(result, Err(DataLoadError::ValidationError(_))));
        assert!(SimilarityMatrix::from_rows(vec![vec![f32::INFINITY]]).is_err());
    }
}
