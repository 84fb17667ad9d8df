//! Text normalisation for tag construction.

use rust_stemmers::{Algorithm, Stemmer};

/// Lower-cases and stems tag tokens with the English (Porter2) stemmer
pub struct TextNormalizer {
    stemmer: Stemmer,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Join tokens, lower-case, then stem every whitespace-separated word.
    ///
    /// Output words are separated by exactly one space.
    pub fn normalize<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        let joined = tokens
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        joined
            .split_whitespace()
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove all whitespace so a multi-word name becomes a single token
pub fn strip_spaces(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_spaces() {
        assert_eq!(strip_spaces("Science Fiction"), "ScienceFiction");
        assert_eq!(strip_spaces("Sam  Worthington "), "SamWorthington");
        assert_eq!(strip_spaces(""), "");
    }

    #[test]
    fn test_normalize_lowercases_and_stems() {
        let normalizer = TextNormalizer::new();
        let tags = normalizer.normalize(&["Running", "Dreams", "ScienceFiction"]);
        assert_eq!(tags, "run dream sciencefict");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize(&["  a   marine ", "", "planet"]), "a marin planet");
        assert_eq!(normalizer.normalize::<&str>(&[]), "");
    }
}
