use std::collections::HashMap;

use crate::models::{DishEntry, DishId};

use super::SimilarityMatrix;

/// Bonus added per (dish, keyword) substring match
pub const KEYWORD_WEIGHT: f64 = 1.0;

/// Accumulated recommendation scores for one user
///
/// Holds strictly positive scores only. Dishes never reached from the user's
/// history or a keyword match are absent rather than zero.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScoreMap {
    scores: HashMap<DishId, f64>,
}

impl ScoreMap {
    /// Sums the similarity of every dish related to each dish in `history`
    ///
    /// Duplicates in `history` contribute once per occurrence.
    pub fn from_history(history: &[DishId], similarity: &SimilarityMatrix) -> Self {
        let mut map = Self::default();
        for &dish_id in history {
            for (related, weight) in similarity.related(dish_id) {
                map.add(related, weight);
            }
        }
        map
    }

    /// Adds [`KEYWORD_WEIGHT`] for every catalog dish whose name contains a keyword
    ///
    /// Matching is a case-sensitive substring test. Each matching keyword adds
    /// the bonus again. Empty keywords match nothing. Returns the number of
    /// matches.
    pub fn add_keyword_matches(&mut self, catalog: &[DishEntry], keywords: &[String]) -> usize {
        let mut matches = 0;
        for dish in catalog {
            for keyword in keywords.iter().filter(|keyword| !keyword.is_empty()) {
                if dish.name.contains(keyword.as_str()) {
                    self.add(dish.id, KEYWORD_WEIGHT);
                    matches += 1;
                }
            }
        }
        matches
    }

    fn add(&mut self, dish_id: DishId, amount: f64) {
        if amount > 0.0 {
            *self.scores.entry(dish_id).or_insert(0.0) += amount;
        }
    }

    pub fn get(&self, dish_id: DishId) -> Option<f64> {
        self.scores.get(&dish_id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DishId, f64)> + '_ {
        self.scores.iter().map(|(&dish_id, &score)| (dish_id, score))
    }
}
