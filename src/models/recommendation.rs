use serde::{Deserialize, Serialize};

use super::{DishEntry, DishId, StoreEntry, StoreId};

/// Request for a page of dish recommendations
///
/// `from` and `to` are zero-based offsets into the ranked candidate list.
/// Windows past the end, or with `from >= to`, yield an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(rename = "userID", alias = "user_id")]
    pub user_id: u32,
    #[serde(default)]
    pub from: u32,
    #[serde(default)]
    pub to: u32,
}

/// A recommended dish as returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "dishID")]
    pub dish_id: DishId,
    #[serde(rename = "dishName")]
    pub dish_name: String,
    #[serde(rename = "storeID")]
    pub store_id: StoreId,
    #[serde(rename = "storeName")]
    pub store_name: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// One fractional digit, e.g. "4.5"
    #[serde(rename = "avgRating")]
    pub avg_rating: String,
    #[serde(rename = "likeCount")]
    pub like_count: i64,
    pub price: String,
    pub description: String,
    pub available: bool,
}

impl Recommendation {
    /// Joins a catalog dish with its owning store's display name
    pub fn new(dish: &DishEntry, store: &StoreEntry) -> Self {
        Self {
            dish_id: dish.id,
            dish_name: dish.name.clone(),
            store_id: dish.store_id,
            store_name: store.name.clone(),
            image_url: dish.image_url.clone(),
            avg_rating: format!("{:.1}", dish.avg_rating),
            like_count: dish.like_count,
            price: dish.price.to_string(),
            description: dish.description.clone(),
            available: dish.available,
        }
    }
}

/// Envelope returned by the recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub status: String,
    pub data: Vec<Recommendation>,
}

impl RecommendationResponse {
    pub fn success(data: Vec<Recommendation>) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}
