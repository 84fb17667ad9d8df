use crate::history::SearchHistoryStore;
use crate::orchestrator::RecommendationOrchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: RecommendationOrchestrator,
    pub history: SearchHistoryStore,
}

impl AppState {
    pub fn new(orchestrator: RecommendationOrchestrator) -> Self {
        Self {
            orchestrator,
            history: SearchHistoryStore::new(),
        }
    }
}
