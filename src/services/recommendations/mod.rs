use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::{Course, CourseScore, RecommendationResult},
    services::readers::{CatalogReader, EnrollmentReader},
};

pub mod collaborative;
pub mod content_based;
pub mod profile;
pub mod progression;
pub mod similarity;
pub mod trending;

pub use profile::{LearnerHistory, LearnerInterestProfile};

/// Tuning knobs for the engine. Defaults reproduce the platform's behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSettings {
    /// Progress at which an enrollment counts as completed, and at which a
    /// peer counts as having passed a shared course
    pub completion_threshold: u8,
    pub trending_window_days: i64,
    /// Per-list cap
    pub max_results: usize,
    pub in_progress_weight: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            completion_threshold: 70,
            trending_window_days: 30,
            max_results: 8,
            in_progress_weight: 1.5,
        }
    }
}

/// Published courses as read at the start of a request, in catalog order
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    published: Vec<Course>,
}

impl CatalogSnapshot {
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            published: courses.into_iter().filter(Course::is_published).collect(),
        }
    }

    /// Published courses the learner is not enrolled in
    pub fn candidates(&self, enrolled_ids: &HashSet<Uuid>) -> Vec<&Course> {
        self.published
            .iter()
            .filter(|course| !enrolled_ids.contains(&course.id))
            .collect()
    }
}

/// Stable descending sort by score, truncated to `limit`.
///
/// Equal scores keep their input order, which callers keep in catalog order.
pub(crate) fn rank_descending(
    mut scored: Vec<CourseScore<'_>>,
    limit: usize,
) -> Vec<CourseScore<'_>> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

fn into_courses(scored: Vec<CourseScore<'_>>) -> Vec<Course> {
    scored.into_iter().map(|s| s.course.clone()).collect()
}

/// Runs all recommendation strategies for one learner against one snapshot
pub struct Recommender {
    catalog: Arc<dyn CatalogReader>,
    enrollments: Arc<dyn EnrollmentReader>,
    settings: RecommendationSettings,
}

impl Recommender {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        enrollments: Arc<dyn EnrollmentReader>,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            catalog,
            enrollments,
            settings,
        }
    }

    /// Recommendations for a learner as of now
    pub async fn recommend(&self, learner_id: Uuid) -> RecommendationResult {
        self.recommend_at(learner_id, Utc::now()).await
    }

    /// Recommendations for a learner with an explicit clock.
    ///
    /// Never fails: an unreadable collaborator empties the sections that
    /// depend on it and is logged.
    #[instrument(skip(self))]
    pub async fn recommend_at(
        &self,
        learner_id: Uuid,
        now: DateTime<Utc>,
    ) -> RecommendationResult {
        let since = trending::window_start(now, self.settings.trending_window_days);

        let (enrollments, catalog, recent) = tokio::join!(
            self.enrollments.enrollments_for_learner(learner_id),
            self.catalog.courses(),
            self.enrollments.enrollments_since(since),
        );

        let enrollments = match enrollments {
            Ok(enrollments) => enrollments,
            Err(e) => {
                // Without the enrolled set nothing can be safely offered. The
                // flag stays false: the learner is not known to be enrolled in
                // everything, only unreadable.
                tracing::warn!(
                    learner_id = %learner_id,
                    error = %e,
                    "Learner enrollments unavailable, returning empty recommendations"
                );
                return RecommendationResult::default();
            }
        };

        let snapshot = match catalog {
            Ok(courses) => CatalogSnapshot::new(courses),
            Err(e) => {
                tracing::warn!(
                    learner_id = %learner_id,
                    error = %e,
                    section = "catalog",
                    "Catalog unavailable"
                );
                CatalogSnapshot::default()
            }
        };

        let recent = match recent {
            Ok(recent) => Some(recent),
            Err(e) => {
                tracing::warn!(
                    learner_id = %learner_id,
                    error = %e,
                    section = "trending",
                    "Recent enrollments unavailable, using top-rated fallback"
                );
                None
            }
        };

        let history =
            LearnerHistory::from_enrollments(&enrollments, self.settings.completion_threshold);
        let candidates = snapshot.candidates(&history.enrolled_ids);

        tracing::debug!(
            learner_id = %learner_id,
            categories = history.profile.categories.len(),
            subcategories = history.profile.subcategories.len(),
            levels = history.profile.levels.len(),
            instructors = history.profile.instructor_ids.len(),
            tags = history.profile.tags.len(),
            "Interest profile built"
        );

        let personalized = content_based::recommend(&history, &candidates, &self.settings);

        let collaborative = collaborative::recommend(
            self.enrollments.as_ref(),
            learner_id,
            &history,
            &candidates,
            &self.settings,
        )
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(
                learner_id = %learner_id,
                error = %e,
                section = "collaborative",
                "Peer enrollments unavailable"
            );
            Vec::new()
        });

        let trending = trending::recommend(
            recent.as_deref(),
            &candidates,
            since,
            self.settings.max_results,
        );

        let next_steps = progression::recommend(&history, &candidates, self.settings.max_results);

        tracing::info!(
            learner_id = %learner_id,
            enrollments = enrollments.len(),
            completed = history.completed.len(),
            in_progress = history.in_progress.len(),
            candidates = candidates.len(),
            personalized = personalized.len(),
            collaborative = collaborative.len(),
            trending = trending.courses.len(),
            trending_fallback = trending.used_fallback,
            next_steps = next_steps.len(),
            "Recommendations computed"
        );

        RecommendationResult {
            is_enrolled_in_all_courses: candidates.is_empty(),
            personalized: into_courses(personalized),
            collaborative: into_courses(collaborative),
            trending: into_courses(trending.courses),
            next_steps: next_steps.into_iter().cloned().collect(),
        }
    }
}
