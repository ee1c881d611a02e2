use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::instrument;

use crate::{
    config::Config,
    db::SignalRepository,
    error::{AppError, AppResult},
    models::{Recommendation, UserId},
};

use super::{enrichment, item_cf, ranking};

/// Generates personalized dish recommendations
///
/// Every call re-reads all signals and recomputes the item-item similarity
/// from scratch; nothing is shared between calls except the repository.
#[derive(Clone)]
pub struct RecommendationService {
    repository: Arc<dyn SignalRepository>,
    deadline: Duration,
    max_results: usize,
}

impl RecommendationService {
    pub fn new(
        repository: Arc<dyn SignalRepository>,
        deadline: Duration,
        max_results: usize,
    ) -> Self {
        Self {
            repository,
            deadline,
            max_results,
        }
    }

    pub fn from_config(repository: Arc<dyn SignalRepository>, config: &Config) -> Self {
        Self::new(repository, config.request_timeout(), config.max_results)
    }

    /// Returns the `[from, to)` window of the user's ranked recommendations
    ///
    /// Fails with a retryable [`AppError::Timeout`] once the deadline passes;
    /// the in-flight pipeline is dropped, which cancels pending queries. A
    /// scoring pass already handed to the blocking pool runs to completion in
    /// the background and its result is discarded.
    #[instrument(skip(self))]
    pub async fn recommend(
        &self,
        user_id: UserId,
        from: usize,
        to: usize,
    ) -> AppResult<Vec<Recommendation>> {
        match tokio::time::timeout(self.deadline, self.run(user_id, from, to)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(user_id, "Recommendation deadline exceeded");
                Err(AppError::Timeout(format!(
                    "recommendation for user {} exceeded {}ms",
                    user_id,
                    self.deadline.as_millis()
                )))
            }
        }
    }

    async fn run(&self, user_id: UserId, from: usize, to: usize) -> AppResult<Vec<Recommendation>> {
        let start = Instant::now();

        let (visits, catalog, liked, keywords) = tokio::try_join!(
            self.repository.all_visit_history(),
            self.repository.all_dishes(),
            self.repository.user_likes(user_id),
            self.repository.user_search_keywords(user_id),
        )?;

        tracing::info!(
            visits = visits.len(),
            dishes = catalog.len(),
            likes = liked.len(),
            keywords = keywords.len(),
            "Signals fetched"
        );

        // Scoring is CPU-bound and grows with total history, so it runs off the
        // async workers where the deadline can still fire around it.
        let max_results = self.max_results;
        let (ranked, catalog) = tokio::task::spawn_blocking(move || {
            let scores = item_cf::score_user(user_id, &visits, &catalog, &liked, &keywords);
            let mut ranked = ranking::rank(&scores);
            ranked.truncate(max_results);
            (ranked, catalog)
        })
        .await?;

        let page = ranking::paginate(&ranked, from, to);
        let recommendations =
            enrichment::enrich(page, &catalog, self.repository.as_ref()).await?;

        tracing::info!(
            candidates = ranked.len(),
            returned = recommendations.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "Recommendations generated"
        );

        Ok(recommendations)
    }
}
