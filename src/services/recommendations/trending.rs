use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::models::{Course, CourseScore, Enrollment};

use super::rank_descending;

/// Start of the trending window ending at `now`.
///
/// Saturates at the earliest representable instant; a negative window is
/// treated as empty and starts at `now`.
pub fn window_start(now: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    TimeDelta::try_days(window_days.max(0))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Trending list plus whether the top-rated fallback produced it
#[derive(Debug, Clone)]
pub struct TrendingOutcome<'a> {
    pub courses: Vec<CourseScore<'a>>,
    pub used_fallback: bool,
}

/// Ranks candidates by enrollments created inside the window.
///
/// When nothing recent maps to a candidate (or the recent read failed and
/// `recent` is `None`), falls back to the highest-rated candidates so the
/// list is never empty while unenrolled courses exist.
pub fn recommend<'a>(
    recent: Option<&[Enrollment]>,
    candidates: &[&'a Course],
    since: DateTime<Utc>,
    limit: usize,
) -> TrendingOutcome<'a> {
    let by_velocity = recent
        .map(|recent| rank_by_recent_enrollments(recent, candidates, since, limit))
        .unwrap_or_default();

    if !by_velocity.is_empty() {
        return TrendingOutcome {
            courses: by_velocity,
            used_fallback: false,
        };
    }

    TrendingOutcome {
        courses: top_rated(candidates, limit),
        used_fallback: true,
    }
}

/// Counts enrollments per candidate course created at or after `since`
pub fn rank_by_recent_enrollments<'a>(
    recent: &[Enrollment],
    candidates: &[&'a Course],
    since: DateTime<Utc>,
    limit: usize,
) -> Vec<CourseScore<'a>> {
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for enrollment in recent.iter().filter(|e| e.enrolled_at >= since) {
        *counts.entry(enrollment.course_id).or_default() += 1;
    }

    let scored = candidates
        .iter()
        .filter_map(|&course| {
            counts.get(&course.id).map(|count| CourseScore {
                course,
                score: *count as f64,
            })
        })
        .collect();

    rank_descending(scored, limit)
}

/// Candidates by rating, highest first
pub fn top_rated<'a>(candidates: &[&'a Course], limit: usize) -> Vec<CourseScore<'a>> {
    let scored = candidates
        .iter()
        .map(|&course| CourseScore {
            course,
            score: course.rating,
        })
        .collect();

    rank_descending(scored, limit)
}
