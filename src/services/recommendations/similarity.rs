use std::collections::HashSet;

use crate::models::Course;

pub const CATEGORY_WEIGHT: f64 = 5.0;
pub const SUBCATEGORY_WEIGHT: f64 = 3.0;
pub const LEVEL_WEIGHT: f64 = 2.0;
pub const TAG_WEIGHT: f64 = 1.0;
pub const INSTRUCTOR_WEIGHT: f64 = 2.0;

/// Weighted attribute overlap between two courses
///
/// Raw additive sum, no normalization. Each component needs the attribute
/// present and non-blank on both sides; shared tags add one point each.
pub fn score(a: &Course, b: &Course) -> f64 {
    let mut total = 0.0;

    if matches_on(a.category_key(), b.category_key()) {
        total += CATEGORY_WEIGHT;
    }
    if matches_on(a.subcategory_key(), b.subcategory_key()) {
        total += SUBCATEGORY_WEIGHT;
    }
    if matches_on(a.level, b.level) {
        total += LEVEL_WEIGHT;
    }

    let a_tags: HashSet<&str> = a.tag_keys().collect();
    let shared_tags = b
        .tag_keys()
        .collect::<HashSet<_>>()
        .intersection(&a_tags)
        .count();
    total += shared_tags as f64 * TAG_WEIGHT;

    if matches_on(a.instructor_id, b.instructor_id) {
        total += INSTRUCTOR_WEIGHT;
    }

    total
}

fn matches_on<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}
