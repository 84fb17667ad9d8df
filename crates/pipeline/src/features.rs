//! Tag construction for the offline build.
//!
//! Each movie's tag string is its overview words followed by its genres,
//! keywords, leading cast members and director. Names are collapsed into
//! single tokens ("Sam Worthington" -> "SamWorthington") so that people and
//! multi-word genres are matched as a whole, then everything is normalised.

use crate::text::{TextNormalizer, strip_spaces};
use data_loader::{MovieRecord, RawMovie};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Builds `MovieRecord`s (tag string + genres) from raw movies.
pub struct FeatureBuilder {
    normalizer: TextNormalizer,
    /// Cast members taken in billing order
    cast_limit: usize,
}

impl FeatureBuilder {
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            cast_limit: 3,
        }
    }

    /// Configure how many cast members are used (default: 3)
    pub fn with_cast_limit(mut self, cast_limit: usize) -> Self {
        self.cast_limit = cast_limit;
        self
    }

    /// Raw tag tokens before normalisation
    pub fn tag_tokens(&self, movie: &RawMovie) -> Vec<String> {
        let mut tokens: Vec<String> = movie
            .overview
            .split_whitespace()
            .map(str::to_string)
            .collect();

        tokens.extend(movie.genres.iter().map(|g| strip_spaces(g)));
        tokens.extend(movie.keywords.iter().map(|k| strip_spaces(k)));
        tokens.extend(
            movie
                .cast
                .iter()
                .take(self.cast_limit)
                .map(|c| strip_spaces(c)),
        );
        if let Some(director) = movie.director() {
            tokens.push(strip_spaces(director));
        }
        tokens
    }

    pub fn build_record(&self, movie: &RawMovie) -> MovieRecord {
        MovieRecord {
            id: movie.id,
            title: movie.title.clone(),
            tags: self.normalizer.normalize(&self.tag_tokens(movie)),
            genres: movie.genres.iter().map(|g| strip_spaces(g)).collect(),
        }
    }

    /// Build records for every movie in parallel, preserving input order
    #[instrument(skip(self, movies), fields(movies = movies.len()))]
    pub fn build_all(&self, movies: &[RawMovie]) -> Vec<MovieRecord> {
        let records: Vec<MovieRecord> = movies
            .par_iter()
            .map(|movie| self.build_record(movie))
            .collect();
        debug!("Built tags for {} movies", records.len());
        records
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::CrewMember;

    fn avatar() -> RawMovie {
        RawMovie {
            id: 19995,
            title: "Avatar".to_string(),
            overview: "In the 22nd century, a paraplegic Marine".to_string(),
            genres: vec!["Action".to_string(), "Science Fiction".to_string()],
            keywords: vec!["culture clash".to_string(), "space war".to_string()],
            cast: vec![
                "Sam Worthington".to_string(),
                "Zoe Saldana".to_string(),
                "Sigourney Weaver".to_string(),
                "Stephen Lang".to_string(),
            ],
            crew: vec![
                CrewMember {
                    name: "Stephen E. Rivkin".to_string(),
                    job: "Editor".to_string(),
                },
                CrewMember {
                    name: "James Cameron".to_string(),
                    job: "Director".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_tag_tokens_order_and_limits() {
        let tokens = FeatureBuilder::new().tag_tokens(&avatar());
        assert_eq!(
            tokens,
            vec![
                "In", "the", "22nd", "century,", "a", "paraplegic", "Marine",
                "Action", "ScienceFiction",
                "cultureclash", "spacewar",
                "SamWorthington", "ZoeSaldana", "SigourneyWeaver",
                "JamesCameron",
            ]
        );
    }

    #[test]
    fn test_no_director_adds_nothing() {
        let mut movie = avatar();
        movie.crew.retain(|m| m.job != "Director");
        let tokens = FeatureBuilder::new().tag_tokens(&movie);
        assert!(!tokens.iter().any(|t| t == "JamesCameron"));
        assert_eq!(tokens.last().map(String::as_str), Some("SigourneyWeaver"));
    }

    #[test]
    fn test_record_is_normalised() {
        let record = FeatureBuilder::new().build_record(&avatar());
        assert_eq!(record.id, 19995);
        assert_eq!(record.genres, vec!["Action", "ScienceFiction"]);
        assert!(record.tags.contains("samworthington"));
        assert!(record.tags.contains("jamescameron"));
        assert!(!record.tags.contains("stephenlang"));
        assert_eq!(record.tags, record.tags.to_lowercase());
        assert!(!record.tags.contains("  "));
    }

    #[test]
    fn test_build_all_preserves_order() {
        let mut second = avatar();
        second.title = "Avatar 2".to_string();
        let records = FeatureBuilder::new().build_all(&[avatar(), second]);
        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Avatar", "Avatar 2"]);
    }
}
