//! Fixture catalog shared by the filter tests.

use data_loader::{Catalog, MovieRecord, SimilarityMatrix, VectorizerModel};

fn record(id: u32, title: &str, genres: &[&str]) -> MovieRecord {
    MovieRecord {
        id,
        title: title.to_string(),
        tags: String::new(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

/// Up, Saw, Toy Story, Uncut Gems, The Notebook
pub fn small_catalog() -> Catalog {
    let movies = vec![
        record(1, "Up", &["Animation", "Family"]),
        record(2, "Saw", &["Horror"]),
        record(3, "Toy Story", &["Animation", "Comedy"]),
        record(4, "Uncut Gems", &["Crime", "Thriller"]),
        record(5, "The Notebook", &["Drama", "Romance"]),
    ];
    let n = movies.len();
    let rows = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    let genres = [
        "Animation", "Comedy", "Crime", "Drama", "Family", "Horror", "Romance", "Thriller",
    ]
    .iter()
    .map(|g| g.to_string())
    .collect();
    let vectorizer = VectorizerModel {
        vocabulary: vec![],
        idf: vec![],
        documents: n,
    };
    Catalog::new(movies, SimilarityMatrix::from_rows(rows).unwrap(), vectorizer, genres).unwrap()
}
