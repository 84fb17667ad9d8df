//! HTTP serving layer for the content-based recommender.
//!
//! - `RecommendationOrchestrator`: request-time flows over the shared catalog
//! - `api`: the axum router, handlers and shared state
//! - `history`: per-user search history
//! - `config`: environment-driven configuration

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod orchestrator;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use history::{SearchEntry, SearchHistoryStore};
pub use orchestrator::{
    MovieCard, OrchestratorSettings, RecommendationOrchestrator, RecommendationPage,
    SuggestionCard,
};
