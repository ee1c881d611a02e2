use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{routing::post, Router};
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::types::BigDecimal;

use dish_recommender::{
    api::{create_router, AppState},
    db::SignalRepository,
    error::{AppError, AppResult},
    models::{DishEntry, RecommendationRequest, StoreEntry, StoreId, UserId, VisitRecord},
    services::{RecommendClient, RecommendationService},
};

/// In-memory signal store standing in for PostgreSQL
#[derive(Default, Clone)]
struct InMemoryRepository {
    visits: Vec<VisitRecord>,
    dishes: Vec<DishEntry>,
    stores: Vec<StoreEntry>,
    likes: Vec<(UserId, i64)>,
    searches: Vec<(UserId, String)>,
}

impl InMemoryRepository {
    fn store(mut self, id: StoreId, name: &str) -> Self {
        self.stores.push(StoreEntry {
            id,
            name: name.to_string(),
        });
        self
    }

    fn dish(mut self, id: i64, store_id: StoreId, name: &str, price: &str) -> Self {
        self.dishes.push(DishEntry {
            id,
            store_id,
            name: name.to_string(),
            price: BigDecimal::from_str(price).unwrap(),
            description: format!("{name}, made to order"),
            image_url: format!("https://img.example/dishes/{id}.png"),
            available: true,
            avg_rating: 4.8,
            like_count: 12,
        });
        self
    }

    fn visit(mut self, user_id: UserId, store_id: StoreId) -> Self {
        self.visits.push(VisitRecord {
            user_id,
            store_id,
            visited_at: Utc::now(),
        });
        self
    }

    fn like(mut self, user_id: UserId, dish_id: i64) -> Self {
        self.likes.push((user_id, dish_id));
        self
    }

    fn search(mut self, user_id: UserId, keyword: &str) -> Self {
        self.searches.push((user_id, keyword.to_string()));
        self
    }
}

#[async_trait]
impl SignalRepository for InMemoryRepository {
    async fn all_visit_history(&self) -> AppResult<Vec<VisitRecord>> {
        Ok(self.visits.clone())
    }

    async fn all_dishes(&self) -> AppResult<Vec<DishEntry>> {
        Ok(self.dishes.clone())
    }

    async fn user_likes(&self, user_id: UserId) -> AppResult<Vec<DishEntry>> {
        Ok(self
            .likes
            .iter()
            .filter(|(liker, _)| *liker == user_id)
            .filter_map(|(_, dish_id)| self.dishes.iter().find(|d| d.id == *dish_id).cloned())
            .collect())
    }

    async fn user_search_keywords(&self, user_id: UserId) -> AppResult<Vec<String>> {
        Ok(self
            .searches
            .iter()
            .filter(|(searcher, _)| *searcher == user_id)
            .map(|(_, keyword)| keyword.clone())
            .collect())
    }

    async fn store_by_id(&self, store_id: StoreId) -> AppResult<Option<StoreEntry>> {
        Ok(self.stores.iter().find(|s| s.id == store_id).cloned())
    }
}

/// User 1 visits the bakery (rolls + tarts) three times and the grill once,
/// likes the hotpot, and searched for "Spicy". User 2 is a stranger.
fn platform() -> InMemoryRepository {
    InMemoryRepository::default()
        .store(10, "Corner Bakery")
        .store(20, "Grill House")
        .store(30, "Hotpot Palace")
        .store(40, "Noodle Bar")
        .dish(1, 10, "Butter Rolls", "3.50")
        .dish(2, 10, "Egg Tarts", "4.00")
        .dish(3, 20, "Grilled Chicken", "15.00")
        .dish(4, 30, "Mala Hotpot", "28.80")
        .dish(5, 40, "Spicy Noodles", "12.50")
        .dish(6, 40, "Plain Broth", "6.00")
        .visit(1, 10)
        .visit(1, 10)
        .visit(1, 10)
        .visit(1, 20)
        .visit(2, 40)
        .like(1, 4)
        .search(1, "Spicy")
}

fn create_test_server(repository: InMemoryRepository) -> TestServer {
    let recommender = RecommendationService::new(Arc::new(repository), Duration::from_secs(5), 100);
    let app = create_router(AppState::new(recommender));
    TestServer::new(app).unwrap()
}

async fn recommend(server: &TestServer, user_id: u32, from: u32, to: u32) -> Vec<Value> {
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "userID": user_id, "from": from, "to": to }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    body["data"].as_array().unwrap().clone()
}

fn dish_ids(records: &[Value]) -> Vec<i64> {
    records.iter().map(|r| r["dishID"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(platform());
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_user_without_signals_gets_empty_list() {
    let server = create_test_server(platform());
    let records = recommend(&server, 99, 0, 10).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_recommendations_are_enriched() {
    let server = create_test_server(platform());
    let records = recommend(&server, 1, 0, 10).await;

    let hotpot = records
        .iter()
        .find(|r| r["dishID"] == 4)
        .expect("liked dish should be recommended");
    assert_eq!(hotpot["dishName"], "Mala Hotpot");
    assert_eq!(hotpot["storeID"], 30);
    assert_eq!(hotpot["storeName"], "Hotpot Palace");
    assert_eq!(hotpot["price"], "28.80");
    assert_eq!(hotpot["avgRating"], "4.8");
    assert_eq!(hotpot["likeCount"], 12);
    assert_eq!(hotpot["available"], true);
    assert_eq!(hotpot["imageURL"], "https://img.example/dishes/4.png");
}

#[tokio::test]
async fn test_keyword_match_is_recommended() {
    let server = create_test_server(platform());
    let records = recommend(&server, 1, 0, 10).await;

    assert!(dish_ids(&records).contains(&5));
    // "Plain Broth" shares a store with the match but nothing links it to user 1
    assert!(!dish_ids(&records).contains(&6));
}

#[tokio::test]
async fn test_identical_calls_return_identical_order() {
    let server = create_test_server(platform());
    let first = recommend(&server, 1, 0, 10).await;
    let second = recommend(&server, 1, 0, 10).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_pagination_windows() {
    let server = create_test_server(platform());
    let all = recommend(&server, 1, 0, 100).await;
    assert!(all.len() >= 3);

    let first_two = recommend(&server, 1, 0, 2).await;
    assert_eq!(first_two[..], all[..2]);

    let middle = recommend(&server, 1, 1, 3).await;
    assert_eq!(middle[..], all[1..3]);

    assert!(recommend(&server, 1, 2, 2).await.is_empty());
    assert!(recommend(&server, 1, 500, 600).await.is_empty());
    assert!(recommend(&server, 1, 3, 1).await.is_empty());
}

#[tokio::test]
async fn test_dish_with_missing_store_fails_whole_response() {
    let repository = InMemoryRepository::default()
        .store(10, "Corner Bakery")
        .dish(1, 10, "Butter Rolls", "3.50")
        .dish(2, 77, "Orphan Dumplings", "9.00")
        .search(1, "Dumplings");
    let server = create_test_server(repository);

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "userID": 1, "from": 0, "to": 10 }))
        .await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn test_malformed_request_is_rejected() {
    let server = create_test_server(platform());
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "from": 0, "to": 10 }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

#[tokio::test]
async fn test_client_round_trip() {
    let recommender =
        RecommendationService::new(Arc::new(platform()), Duration::from_secs(5), 100);
    let base_url = serve(create_router(AppState::new(recommender))).await;

    let client = RecommendClient::new(base_url).unwrap();
    let records = client
        .recommend(RecommendationRequest {
            user_id: 1,
            from: 0,
            to: 2,
        })
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!(!records[0].store_name.is_empty());
}

#[tokio::test]
async fn test_client_timeout_is_retryable() {
    let slow = Router::new().route(
        "/api/v1/recommendations",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "too late"
        }),
    );
    let base_url = serve(slow).await;

    let client = RecommendClient::with_timeout(base_url, Duration::from_millis(100)).unwrap();
    let err = client
        .recommend(RecommendationRequest {
            user_id: 1,
            from: 0,
            to: 10,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Timeout(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_client_surfaces_server_errors() {
    let repository = InMemoryRepository::default()
        .dish(2, 77, "Orphan Dumplings", "9.00")
        .search(1, "Dumplings");
    let recommender = RecommendationService::new(Arc::new(repository), Duration::from_secs(5), 100);
    let base_url = serve(create_router(AppState::new(recommender))).await;

    let client = RecommendClient::new(base_url).unwrap();
    let err = client
        .recommend(RecommendationRequest {
            user_id: 1,
            from: 0,
            to: 10,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Upstream(_)));
}
