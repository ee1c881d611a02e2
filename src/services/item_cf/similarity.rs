use std::collections::{HashMap, HashSet};

use crate::models::{DishEntry, DishId};

use super::InteractionMatrix;

/// Raw weight added between a liked dish and every other catalog dish
pub const LIKE_WEIGHT: f64 = 2.0;

/// Sparse item-item similarity, rebuilt on every request
///
/// A missing entry means zero similarity. Only positive weights are stored.
#[derive(Debug, Default, Clone)]
pub struct SimilarityMatrix {
    weights: HashMap<DishId, HashMap<DishId, f64>>,
}

impl SimilarityMatrix {
    /// Estimates similarity from co-occurrence and the requesting user's likes
    ///
    /// Raw weights count ordered co-occurrences of distinct dishes within each
    /// user's sequence. Every liked dish is then tied to every other catalog
    /// dish, in both directions, with [`LIKE_WEIGHT`]; an ordered pair of two
    /// liked dishes receives the boost once. Each like also counts
    /// as one interaction of the liked dish. Finally every raw weight is
    /// divided by `sqrt(count(i) * count(j))`; pairs with a zero count are
    /// dropped.
    pub fn estimate(
        interactions: &InteractionMatrix,
        liked: &[DishEntry],
        catalog: &[DishEntry],
    ) -> Self {
        let mut raw: HashMap<DishId, HashMap<DishId, f64>> = HashMap::new();

        for sequence in interactions.sequences() {
            for &i in sequence {
                let row = raw.entry(i).or_default();
                for &j in sequence {
                    if i != j {
                        *row.entry(j).or_insert(0.0) += 1.0;
                    }
                }
            }
        }

        // Likes inflate the interaction count too; see DESIGN.md on weighting.
        let mut counts = interactions.interaction_counts().clone();
        let liked_ids: HashSet<DishId> = liked.iter().map(|dish| dish.id).collect();
        for liked_dish in liked {
            *counts.entry(liked_dish.id).or_insert(0) += 1;

            for related in catalog.iter().filter(|dish| dish.id != liked_dish.id) {
                *raw.entry(liked_dish.id)
                    .or_default()
                    .entry(related.id)
                    .or_insert(0.0) += LIKE_WEIGHT;
                // A liked partner's own forward pass covers the reverse pair.
                if !liked_ids.contains(&related.id) {
                    *raw.entry(related.id)
                        .or_default()
                        .entry(liked_dish.id)
                        .or_insert(0.0) += LIKE_WEIGHT;
                }
            }
        }

        let count_of = |dish_id: &DishId| counts.get(dish_id).copied().unwrap_or(0) as f64;

        let weights = raw
            .into_iter()
            .filter_map(|(i, row)| {
                let count_i = count_of(&i);
                let normalized: HashMap<DishId, f64> = row
                    .into_iter()
                    .filter_map(|(j, raw_weight)| {
                        let denominator = (count_i * count_of(&j)).sqrt();
                        (denominator > 0.0).then(|| (j, raw_weight / denominator))
                    })
                    .filter(|(_, weight)| *weight > 0.0)
                    .collect();

                (!normalized.is_empty()).then_some((i, normalized))
            })
            .collect();

        Self { weights }
    }

    /// Similarity of `j` to `i`, zero when the pair never co-occurred
    pub fn weight(&self, i: DishId, j: DishId) -> f64 {
        self.weights
            .get(&i)
            .and_then(|row| row.get(&j))
            .copied()
            .unwrap_or(0.0)
    }

    /// Dishes related to `dish_id` with their positive weights
    pub fn related(&self, dish_id: DishId) -> impl Iterator<Item = (DishId, f64)> + '_ {
        self.weights
            .get(&dish_id)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&related, &weight)| (related, weight)))
    }

    /// Number of dishes with at least one related dish
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
