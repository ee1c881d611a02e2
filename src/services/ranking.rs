use std::cmp::Ordering;

use crate::models::DishId;

use super::item_cf::ScoreMap;

/// A scored candidate in ranked order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedDish {
    pub dish_id: DishId,
    pub score: f64,
}

/// Sorts candidates by descending score, ties broken by ascending dish id
pub fn rank(scores: &ScoreMap) -> Vec<RankedDish> {
    let mut ranked: Vec<RankedDish> = scores
        .iter()
        .map(|(dish_id, score)| RankedDish { dish_id, score })
        .collect();

    ranked.sort_by(compare);
    ranked
}

fn compare(a: &RankedDish, b: &RankedDish) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.dish_id.cmp(&b.dish_id))
}

/// Slices the `[from, to)` window out of a ranked list
///
/// Never fails: `to` is clamped to the list length, and a window starting at
/// or past the end (or with `from >= to`) is empty.
pub fn paginate(ranked: &[RankedDish], from: usize, to: usize) -> &[RankedDish] {
    let end = to.min(ranked.len());
    if from >= end {
        return &[];
    }
    &ranked[from..end]
}
