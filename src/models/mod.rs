use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;

pub mod recommendation;

pub use recommendation::{Recommendation, RecommendationRequest, RecommendationResponse};

pub type UserId = i64;
pub type StoreId = i64;
pub type DishId = i64;

// ============================================================================
// Behavioral signals (read-only, written by the ordering platform)
// ============================================================================

/// One browse event: a user opened a store page
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct VisitRecord {
    pub user_id: UserId,
    pub store_id: StoreId,
    pub visited_at: DateTime<Utc>,
}

/// An explicit like of a dish
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LikeRecord {
    pub user_id: UserId,
    pub dish_id: DishId,
    pub liked_at: DateTime<Utc>,
}

/// A search query issued by a user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SearchRecord {
    pub user_id: UserId,
    pub keyword: String,
    pub searched_at: DateTime<Utc>,
}

// ============================================================================
// Catalog
// ============================================================================

/// A recommendable dish as stored in the catalog
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DishEntry {
    pub id: DishId,
    pub store_id: StoreId,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub image_url: String,
    pub available: bool,
    pub avg_rating: f64,
    pub like_count: i64,
}

/// Display data for the store owning a dish
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoreEntry {
    pub id: StoreId,
    pub name: String,
}
