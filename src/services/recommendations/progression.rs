use crate::models::{Course, CourseLevel};

use super::profile::LearnerHistory;

/// Highest completed level per category, in order of first appearance.
///
/// A category only ever moves up: Beginner is recorded when nothing higher
/// has been seen, Intermediate replaces Beginner, Advanced replaces anything.
pub fn highest_completed_levels(completed: &[Course]) -> Vec<(String, CourseLevel)> {
    let mut levels: Vec<(String, CourseLevel)> = Vec::new();

    for course in completed {
        let (Some(category), Some(level)) = (course.category_key(), course.level) else {
            continue;
        };

        match levels.iter_mut().find(|(c, _)| c == category) {
            Some((_, tracked)) => *tracked = (*tracked).max(level),
            None => levels.push((category.to_string(), level)),
        }
    }

    levels
}

/// Candidates one tier above the learner's highest completed level in each
/// category. Categories finished at Advanced get no suggestions.
pub fn recommend<'a>(
    history: &LearnerHistory,
    candidates: &[&'a Course],
    limit: usize,
) -> Vec<&'a Course> {
    let mut next_steps = Vec::new();

    for (category, level) in highest_completed_levels(&history.completed) {
        let Some(next_level) = level.next() else {
            continue;
        };

        next_steps.extend(candidates.iter().copied().filter(|course| {
            course.category_key() == Some(category.as_str()) && course.level == Some(next_level)
        }));

        if next_steps.len() >= limit {
            break;
        }
    }

    next_steps.truncate(limit);
    next_steps
}
