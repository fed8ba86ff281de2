use crate::models::{Course, CourseScore};

use super::{profile::LearnerHistory, rank_descending, similarity, RecommendationSettings};

/// Ranks candidates by aggregate similarity to the learner's history
///
/// `total = Σ sim(c, completed) + w × Σ sim(c, in_progress)` where `w` is the
/// in-progress weight. Candidates scoring zero are dropped. Learners without
/// completed or in-progress courses get nothing here.
pub fn recommend<'a>(
    history: &LearnerHistory,
    candidates: &[&'a Course],
    settings: &RecommendationSettings,
) -> Vec<CourseScore<'a>> {
    if !history.has_activity() {
        return Vec::new();
    }

    let scored = candidates
        .iter()
        .map(|&course| CourseScore {
            course,
            score: total_score(course, history, settings.in_progress_weight),
        })
        .filter(|scored| scored.score > 0.0)
        .collect();

    rank_descending(scored, settings.max_results)
}

fn total_score(candidate: &Course, history: &LearnerHistory, in_progress_weight: f64) -> f64 {
    let completed: f64 = history
        .completed
        .iter()
        .map(|c| similarity::score(candidate, c))
        .sum();
    let in_progress: f64 = history
        .in_progress
        .iter()
        .map(|c| similarity::score(candidate, c))
        .sum();

    completed + in_progress_weight * in_progress
}
