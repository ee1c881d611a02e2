use std::sync::Arc;

use crate::services::RecommendationService;

/// Shared application state
///
/// Holds no per-request data; each recommendation call builds its own
/// matrices, so handlers never contend on a lock.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(recommender: RecommendationService) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }
}
