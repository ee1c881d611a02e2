//! Read-only access to the behavioral signals and catalog the recommender consumes.
//!
//! The ordering platform owns these tables; this service never writes to them.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{DishEntry, LikeRecord, SearchRecord, StoreEntry, StoreId, UserId, VisitRecord},
};

/// Source of visit history, likes, search keywords and catalog rows
///
/// Implementations must tolerate concurrent reads from many in-flight requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalRepository: Send + Sync {
    /// Every visit by every user, oldest first
    async fn all_visit_history(&self) -> AppResult<Vec<VisitRecord>>;

    /// The full dish catalog, ordered by dish id
    async fn all_dishes(&self) -> AppResult<Vec<DishEntry>>;

    /// Dishes the user has liked
    async fn user_likes(&self, user_id: UserId) -> AppResult<Vec<DishEntry>>;

    /// Keywords the user has searched for, oldest first
    async fn user_search_keywords(&self, user_id: UserId) -> AppResult<Vec<String>>;

    async fn store_by_id(&self, store_id: StoreId) -> AppResult<Option<StoreEntry>>;
}

const DISH_COLUMNS: &str = "id, store_id, name, price, description, image_url, available, \
                            avg_rating, like_count";

/// PostgreSQL-backed signal repository
#[derive(Clone)]
pub struct PgSignalRepository {
    pool: PgPool,
}

impl PgSignalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SignalRepository for PgSignalRepository {
    async fn all_visit_history(&self) -> AppResult<Vec<VisitRecord>> {
        let rows = sqlx::query_as::<_, VisitRecord>(
            r#"
            SELECT user_id, store_id, visited_at
            FROM visit_history
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn all_dishes(&self) -> AppResult<Vec<DishEntry>> {
        let sql = format!("SELECT {DISH_COLUMNS} FROM dishes ORDER BY id");
        let rows = sqlx::query_as::<_, DishEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn user_likes(&self, user_id: UserId) -> AppResult<Vec<DishEntry>> {
        let likes = sqlx::query_as::<_, LikeRecord>(
            r#"
            SELECT user_id, dish_id, liked_at
            FROM likes
            WHERE user_id = $1
            ORDER BY liked_at, dish_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if likes.is_empty() {
            return Ok(Vec::new());
        }

        let dish_ids: Vec<i64> = likes.iter().map(|like| like.dish_id).collect();
        let sql = format!("SELECT {DISH_COLUMNS} FROM dishes WHERE id = ANY($1) ORDER BY id");
        let dishes = sqlx::query_as::<_, DishEntry>(&sql)
            .bind(&dish_ids[..])
            .fetch_all(&self.pool)
            .await?;

        if dishes.len() < dish_ids.len() {
            tracing::warn!(
                user_id,
                liked = dish_ids.len(),
                found = dishes.len(),
                "Some liked dishes are missing from the catalog"
            );
        }

        Ok(dishes)
    }

    async fn user_search_keywords(&self, user_id: UserId) -> AppResult<Vec<String>> {
        let searches = sqlx::query_as::<_, SearchRecord>(
            r#"
            SELECT user_id, keyword, searched_at
            FROM searches
            WHERE user_id = $1
            ORDER BY searched_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(searches.into_iter().map(|search| search.keyword).collect())
    }

    async fn store_by_id(&self, store_id: StoreId) -> AppResult<Option<StoreEntry>> {
        let store = sqlx::query_as::<_, StoreEntry>("SELECT id, name FROM stores WHERE id = $1")
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(store)
    }
}
