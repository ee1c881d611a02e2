use std::collections::HashMap;

use crate::models::{DishEntry, DishId, StoreId, UserId, VisitRecord};

/// Per-user dish sequences derived from cross-user visit history
///
/// A store visit stands for every dish that store offers in the catalog
/// snapshot. Repeated visits repeat the dishes, which strengthens their
/// co-occurrence weight later on.
#[derive(Debug, Default, Clone)]
pub struct InteractionMatrix {
    sequences: HashMap<UserId, Vec<DishId>>,
    counts: HashMap<DishId, u32>,
}

impl InteractionMatrix {
    /// Builds the matrix from all users' visits
    ///
    /// Visits to stores without dishes in `catalog` contribute nothing.
    pub fn build(visits: &[VisitRecord], catalog: &[DishEntry]) -> Self {
        let mut store_dishes: HashMap<StoreId, Vec<DishId>> = HashMap::new();
        for dish in catalog {
            store_dishes.entry(dish.store_id).or_default().push(dish.id);
        }
        for dishes in store_dishes.values_mut() {
            dishes.sort_unstable();
        }

        let mut matrix = Self::default();
        for visit in visits {
            let Some(dishes) = store_dishes.get(&visit.store_id) else {
                continue;
            };

            let sequence = matrix.sequences.entry(visit.user_id).or_default();
            for &dish_id in dishes {
                sequence.push(dish_id);
                *matrix.counts.entry(dish_id).or_insert(0) += 1;
            }
        }

        matrix
    }

    /// The user's dish sequence in visit order; empty for unknown users
    pub fn sequence(&self, user_id: UserId) -> &[DishId] {
        self.sequences
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn sequences(&self) -> impl Iterator<Item = &[DishId]> {
        self.sequences.values().map(Vec::as_slice)
    }

    /// Occurrences of each dish across all sequences
    pub fn interaction_counts(&self) -> &HashMap<DishId, u32> {
        &self.counts
    }

    pub fn user_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn total_interactions(&self) -> usize {
        self.sequences.values().map(Vec::len).sum()
    }
}
