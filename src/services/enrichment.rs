use std::collections::{hash_map::Entry, HashMap};

use crate::{
    db::SignalRepository,
    error::{AppError, AppResult},
    models::{DishEntry, DishId, Recommendation, StoreEntry, StoreId},
};

use super::ranking::RankedDish;

/// Joins a page of ranked dishes back to catalog and store display data
///
/// Dishes come from the request's catalog snapshot, stores from the
/// repository (each store fetched at most once per call). A missing dish or
/// store fails the whole page.
pub async fn enrich(
    page: &[RankedDish],
    catalog: &[DishEntry],
    repository: &dyn SignalRepository,
) -> AppResult<Vec<Recommendation>> {
    let dishes: HashMap<DishId, &DishEntry> = catalog.iter().map(|dish| (dish.id, dish)).collect();
    let mut stores: HashMap<StoreId, StoreEntry> = HashMap::new();
    let mut recommendations = Vec::with_capacity(page.len());

    for ranked in page {
        let dish = dishes.get(&ranked.dish_id).ok_or_else(|| {
            AppError::Inconsistent(format!("dish {} is not in the catalog", ranked.dish_id))
        })?;

        let store = match stores.entry(dish.store_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let store = repository.store_by_id(dish.store_id).await?.ok_or_else(|| {
                    AppError::Inconsistent(format!(
                        "store {} of dish {} does not exist",
                        dish.store_id, dish.id
                    ))
                })?;
                entry.insert(store)
            }
        };

        recommendations.push(Recommendation::new(dish, store));
    }

    Ok(recommendations)
}
