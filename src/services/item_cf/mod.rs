//! Item-based collaborative filtering
//!
//! Everything here is rebuilt from scratch for each request: the interaction
//! matrix spans every user's visit history, so cost grows with total history
//! size (see `benches/item_cf.rs`).

use crate::models::{DishEntry, UserId, VisitRecord};

pub mod interaction;
pub mod scoring;
pub mod similarity;

pub use interaction::InteractionMatrix;
pub use scoring::{ScoreMap, KEYWORD_WEIGHT};
pub use similarity::{SimilarityMatrix, LIKE_WEIGHT};

/// Scores catalog dishes for `user_id` from visits, likes and search keywords
pub fn score_user(
    user_id: UserId,
    visits: &[VisitRecord],
    catalog: &[DishEntry],
    liked: &[DishEntry],
    keywords: &[String],
) -> ScoreMap {
    let interactions = InteractionMatrix::build(visits, catalog);
    let similarity = SimilarityMatrix::estimate(&interactions, liked, catalog);

    let mut scores = ScoreMap::from_history(interactions.sequence(user_id), &similarity);
    let keyword_matches = scores.add_keyword_matches(catalog, keywords);

    tracing::debug!(
        user_id,
        users = interactions.user_count(),
        interactions = interactions.total_interactions(),
        similar_dishes = similarity.len(),
        keyword_matches,
        candidates = scores.len(),
        "Scored dishes"
    );

    scores
}
