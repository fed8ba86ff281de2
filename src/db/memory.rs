use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Course, Enrollment, LearnerEnrollment},
    services::readers::{CatalogReader, EnrollmentQuery, EnrollmentReader},
};

/// In-process catalog and enrollment store
///
/// Courses keep insertion order, which is the catalog order the engine
/// ranks ties by. Enrollments are unique per (learner, course) pair.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    courses: Vec<Course>,
    enrollments: Vec<Enrollment>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course, replacing any course with the same id in place
    pub async fn upsert_course(&self, course: Course) {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.courses.iter_mut().find(|c| c.id == course.id) {
            *existing = course;
        } else {
            inner.courses.push(course);
        }
    }

    /// Records an enrollment, replacing the existing one for the same pair
    pub async fn upsert_enrollment(&self, enrollment: Enrollment) {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.enrollments.iter_mut().find(|e| {
            e.learner_id == enrollment.learner_id && e.course_id == enrollment.course_id
        }) {
            *existing = enrollment;
        } else {
            inner.enrollments.push(enrollment);
        }
    }

    pub async fn course_count(&self) -> usize {
        self.inner.read().await.courses.len()
    }

    pub async fn enrollment_count(&self) -> usize {
        self.inner.read().await.enrollments.len()
    }
}

#[async_trait::async_trait]
impl CatalogReader for InMemoryStore {
    async fn courses(&self) -> AppResult<Vec<Course>> {
        Ok(self.inner.read().await.courses.clone())
    }
}

#[async_trait::async_trait]
impl EnrollmentReader for InMemoryStore {
    async fn enrollments_for_learner(&self, learner_id: Uuid) -> AppResult<Vec<LearnerEnrollment>> {
        let inner = self.inner.read().await;

        // Enrollments whose course vanished from the catalog are skipped,
        // matching the inner join of the database reader.
        Ok(inner
            .enrollments
            .iter()
            .filter(|e| e.learner_id == learner_id)
            .filter_map(|e| {
                inner
                    .courses
                    .iter()
                    .find(|c| c.id == e.course_id)
                    .map(|course| LearnerEnrollment {
                        enrollment: e.clone(),
                        course: course.clone(),
                    })
            })
            .collect())
    }

    async fn enrollments_by_learners(&self, query: &EnrollmentQuery) -> AppResult<Vec<Enrollment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .enrollments
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect())
    }

    async fn enrollments_since(&self, since: DateTime<Utc>) -> AppResult<Vec<Enrollment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .enrollments
            .iter()
            .filter(|e| e.enrolled_at >= since)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tokio_test::block_on;

    #[test]
    fn test_upsert_enrollment_keeps_pairs_unique() {
        let store = InMemoryStore::new();
        let learner = Uuid::new_v4();
        let course = Course::new("Rust");

        block_on(async {
            store.upsert_course(course.clone()).await;
            store
                .upsert_enrollment(Enrollment::new(learner, course.id).with_progress(20))
                .await;
            store
                .upsert_enrollment(Enrollment::new(learner, course.id).with_progress(90))
                .await;

            assert_eq!(store.enrollment_count().await, 1);
            let mine = store.enrollments_for_learner(learner).await.unwrap();
            assert_eq!(mine[0].enrollment.progress_percentage, 90);
            assert_eq!(mine[0].course, course);
        });
    }

    #[test]
    fn test_courses_keep_insertion_order() {
        let store = InMemoryStore::new();
        let first = Course::new("First");
        let second = Course::new("Second");

        block_on(async {
            store.upsert_course(first.clone()).await;
            store.upsert_course(second.clone()).await;
            store.upsert_course(first.clone().with_rating(5.0)).await;

            let titles: Vec<String> = store
                .courses()
                .await
                .unwrap()
                .into_iter()
                .map(|c| c.title)
                .collect();
            assert_eq!(titles, vec!["First", "Second"]);
            assert_eq!(store.course_count().await, 2);
        });
    }

    #[test]
    fn test_unknown_learner_has_no_enrollments() {
        let store = InMemoryStore::new();
        let result = block_on(store.enrollments_for_learner(Uuid::new_v4())).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_enrollments_since_filters_by_enrollment_time() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let course = Uuid::new_v4();

        block_on(async {
            store
                .upsert_enrollment(
                    Enrollment::new(Uuid::new_v4(), course).enrolled_on(now - Duration::days(3)),
                )
                .await;
            store
                .upsert_enrollment(
                    Enrollment::new(Uuid::new_v4(), course).enrolled_on(now - Duration::days(60)),
                )
                .await;

            let recent = store
                .enrollments_since(now - Duration::days(30))
                .await
                .unwrap();
            assert_eq!(recent.len(), 1);
        });
    }

    #[test]
    fn test_enrollments_by_learners_applies_query() {
        let store = InMemoryStore::new();
        let peer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let course = Uuid::new_v4();

        block_on(async {
            store.upsert_enrollment(Enrollment::new(peer, course)).await;
            store.upsert_enrollment(Enrollment::new(other, course)).await;

            let found = store
                .enrollments_by_learners(
                    &EnrollmentQuery::for_courses(vec![course]).excluding_learner(other),
                )
                .await
                .unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].learner_id, peer);
        });
    }
}
