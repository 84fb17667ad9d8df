//! Fuzzy title matching for queries with no exact catalog hit.
//!
//! Scores are edit-distance ratios on a 0-100 scale, combined the way common
//! "weighted ratio" matchers do. The full ratio (normalized Levenshtein
//! similarity of the two strings) is always a candidate. Then, depending on
//! how much the lengths differ:
//! - under 1.5x: token-sort and token-set ratios, scaled by 0.95
//! - 1.5x or more: partial ratio (best ratio of the shorter string against
//!   every window of the longer one) scaled by 0.9, plus partial token-sort
//!   and token-set ratios scaled by 0.95 * 0.9
//! - above 8x: as above with 0.6 in place of 0.9
//!
//! The best candidate wins. Both strings are lower-cased and stripped of
//! punctuation first. Only the raw titles are matched; the similarity matrix
//! is never consulted.

use crate::types::TitleSuggestion;
use data_loader::Catalog;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use strsim::normalized_levenshtein;
use tracing::{debug, instrument};

const PARTIAL_SCALE: f64 = 0.9;
const LONG_PARTIAL_SCALE: f64 = 0.6;
const TOKEN_SCALE: f64 = 0.95;
const PARTIAL_LENGTH_RATIO: f64 = 1.5;
const LONG_LENGTH_RATIO: f64 = 8.0;

/// Suggests catalog titles close to a misspelled query
#[derive(Clone)]
pub struct TitleMatcher {
    catalog: Arc<Catalog>,
}

impl TitleMatcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Top `limit` titles by match score, highest first.
    ///
    /// Titles are scored in parallel; equal scores keep catalog order.
    #[instrument(skip(self))]
    pub fn suggest_close(&self, query: &str, limit: usize) -> Vec<TitleSuggestion> {
        let mut scored: Vec<(&str, u8)> = self
            .catalog
            .movies()
            .par_iter()
            .map(|movie| (movie.title.as_str(), weighted_ratio(query, &movie.title)))
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(limit);

        debug!("Suggesting {} titles for '{}'", scored.len(), query);
        scored
            .into_iter()
            .map(|(title, score)| TitleSuggestion {
                title: title.to_string(),
                score,
            })
            .collect()
    }
}

/// Lower-case, replace non-alphanumerics by spaces, collapse whitespace
fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn token_sort(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Best ratio of the shorter string against any equally long window of the
/// longer one
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (a_chars, b_chars): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };
    if short.is_empty() {
        return 0.0;
    }

    let shorter: String = short.iter().collect();
    (0..=long.len() - short.len())
        .map(|start| {
            let window: String = long[start..start + short.len()].iter().collect();
            normalized_levenshtein(&shorter, &window)
        })
        .fold(0.0, f64::max)
}

/// Compare the shared tokens against each side's full token set, so a title
/// that contains every word of the other scores as a match
fn token_set_ratio(a: &str, b: &str, ratio: fn(&str, &str) -> f64) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let shared = join(tokens_a.intersection(&tokens_b));
    let with_a = join_after(&shared, tokens_a.difference(&tokens_b));
    let with_b = join_after(&shared, tokens_b.difference(&tokens_a));

    let mut best = ratio(&with_a, &with_b);
    if !shared.is_empty() {
        best = best.max(ratio(&shared, &with_a)).max(ratio(&shared, &with_b));
    }
    best
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn join_after<'a, 'b: 'a>(prefix: &str, rest: impl Iterator<Item = &'a &'b str>) -> String {
    let rest = join(rest);
    match (prefix.is_empty(), rest.is_empty()) {
        (_, true) => prefix.to_string(),
        (true, false) => rest,
        (false, false) => format!("{} {}", prefix, rest),
    }
}

/// Match score between a query and a candidate title, 0-100
pub fn weighted_ratio(query: &str, candidate: &str) -> u8 {
    let a = normalize(query);
    let b = normalize(candidate);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut best = normalized_levenshtein(&a, &b);

    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let length_ratio = len_a.max(len_b) / len_a.min(len_b);
    if length_ratio < PARTIAL_LENGTH_RATIO {
        let sorted = normalized_levenshtein(&token_sort(&a), &token_sort(&b));
        let set = token_set_ratio(&a, &b, normalized_levenshtein);
        best = best.max(TOKEN_SCALE * sorted.max(set));
    } else {
        let scale = if length_ratio > LONG_LENGTH_RATIO {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        let sorted = partial_ratio(&token_sort(&a), &token_sort(&b));
        let set = token_set_ratio(&a, &b, partial_ratio);
        best = best
            .max(scale * partial_ratio(&a, &b))
            .max(scale * TOKEN_SCALE * sorted.max(set));
    }

    (best * 100.0).round().clamp(0.0, 100.0) as u8
}
