//! In-memory search history.
//!
//! Every recommendation request made by an identified user appends one
//! entry. Entries are never modified or expired.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type UserId = u32;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub user_id: UserId,
    pub term: String,
    pub searched_at: DateTime<Utc>,
}

/// Append-only store shared by all handlers
#[derive(Clone, Default)]
pub struct SearchHistoryStore {
    entries: Arc<RwLock<Vec<SearchEntry>>>,
}

impl SearchHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, user_id: UserId, term: &str) {
        self.entries.write().await.push(SearchEntry {
            user_id,
            term: term.to_string(),
            searched_at: Utc::now(),
        });
    }

    /// The user's latest `limit` searches, newest first
    pub async fn recent(&self, user_id: UserId, limit: usize) -> Vec<SearchEntry> {
        self.entries
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Distinct terms, newest first; repeated searches keep their latest position
    pub async fn distinct_terms(&self, user_id: UserId) -> Vec<String> {
        let entries = self.entries.read().await;
        let mut seen = HashSet::new();
        entries
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .filter(|e| seen.insert(e.term.as_str()))
            .map(|e| e.term.clone())
            .collect()
    }
}
