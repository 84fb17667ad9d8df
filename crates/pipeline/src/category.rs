//! Mood and age-group categories mapped to genre lists.
//!
//! The tables are plain data: built-in defaults, optionally replaced by a
//! JSON file of the form
//! `{"emotions": {"happy": ["Comedy"]}, "age_groups": {"kids": ["Family"]}}`.
//! A table missing from the file keeps its default.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Emotion,
    AgeGroup,
}

type Table = BTreeMap<String, Vec<String>>;

fn table(entries: &[(&str, &[&str])]) -> Table {
    entries
        .iter()
        .map(|(label, genres)| {
            (
                label.to_string(),
                genres.iter().map(|g| g.to_string()).collect(),
            )
        })
        .collect()
}

fn default_emotions() -> Table {
    table(&[
        ("happy", &["Comedy", "Adventure"]),
        ("sad", &["Drama", "Romance"]),
        ("excited", &["Action", "Thriller"]),
        ("relaxed", &["Animation", "Fantasy"]),
    ])
}

fn default_age_groups() -> Table {
    table(&[
        ("kids", &["Animation", "Family"]),
        ("teens", &["Adventure", "Fantasy", "Comedy"]),
        ("adults", &["Thriller", "Crime", "Horror"]),
        ("all", &["Drama", "Romance", "Music", "Mystery"]),
    ])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(default = "default_emotions")]
    emotions: Table,
    #[serde(default = "default_age_groups")]
    age_groups: Table,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            emotions: default_emotions(),
            age_groups: default_age_groups(),
        }
    }
}

impl CategoryTable {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: CategoryTable =
            serde_json::from_str(json).map_err(|e| PipelineError::CategoryTable {
                source_name: "<inline>".to_string(),
                reason: e.to_string(),
            })?;
        Ok(parsed.lowercased())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&contents).map_err(|e| match e {
            PipelineError::CategoryTable { reason, .. } => PipelineError::CategoryTable {
                source_name: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        info!("Loaded category table from {:?}", path);
        Ok(table)
    }

    fn lowercased(self) -> Self {
        let lower = |t: Table| t.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();
        Self {
            emotions: lower(self.emotions),
            age_groups: lower(self.age_groups),
        }
    }

    fn table(&self, kind: CategoryKind) -> &Table {
        match kind {
            CategoryKind::Emotion => &self.emotions,
            CategoryKind::AgeGroup => &self.age_groups,
        }
    }

    /// Genres for a label, matched case-insensitively; empty when unknown
    pub fn genres_for(&self, kind: CategoryKind, label: &str) -> &[String] {
        self.table(kind)
            .get(&label.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn labels(&self, kind: CategoryKind) -> Vec<&str> {
        self.table(kind).keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let table = CategoryTable::default();
        assert_eq!(table.genres_for(CategoryKind::Emotion, "happy"), &["Comedy", "Adventure"]);
        assert_eq!(table.genres_for(CategoryKind::AgeGroup, "kids"), &["Animation", "Family"]);
        assert_eq!(table.labels(CategoryKind::AgeGroup), vec!["adults", "all", "kids", "teens"]);
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(
            table.genres_for(CategoryKind::Emotion, " Excited "),
            &["Action", "Thriller"]
        );
    }

    #[test]
    fn test_unknown_label_maps_to_nothing() {
        let table = CategoryTable::default();
        assert!(table.genres_for(CategoryKind::Emotion, "bored").is_empty());
    }

    #[test]
    fn test_partial_override_keeps_other_default() {
        let table =
            CategoryTable::from_json_str(r#"{"emotions": {"Nostalgic": ["Western"]}}"#).unwrap();
        assert_eq!(table.genres_for(CategoryKind::Emotion, "nostalgic"), &["Western"]);
        assert!(table.genres_for(CategoryKind::Emotion, "happy").is_empty());
        assert_eq!(table.genres_for(CategoryKind::AgeGroup, "teens").len(), 3);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CategoryTable::from_json_str("{not json"),
            Err(PipelineError::CategoryTable { .. })
        ));
    }
}
