//! Read-only collaborators consumed by the recommendation engine
//!
//! The engine never writes. Storage backends (Postgres, in-memory) implement
//! these traits; the engine only sees reconciled enrollment rows and the full
//! catalog, regardless of how they are persisted.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Course, Enrollment, LearnerEnrollment},
};

/// Filter for pooling enrollments across learners
///
/// `None` on a field means "no restriction". An empty list matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrollmentQuery {
    pub learner_ids: Option<Vec<Uuid>>,
    pub course_ids: Option<Vec<Uuid>>,
    pub exclude_learner: Option<Uuid>,
}

impl EnrollmentQuery {
    /// Enrollments held by any of the given learners
    pub fn for_learners(learner_ids: Vec<Uuid>) -> Self {
        Self {
            learner_ids: Some(learner_ids),
            ..Default::default()
        }
    }

    /// Enrollments in any of the given courses
    pub fn for_courses(course_ids: Vec<Uuid>) -> Self {
        Self {
            course_ids: Some(course_ids),
            ..Default::default()
        }
    }

    pub fn excluding_learner(mut self, learner_id: Uuid) -> Self {
        self.exclude_learner = Some(learner_id);
        self
    }

    /// Applies the filter to a single enrollment
    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        if self.exclude_learner == Some(enrollment.learner_id) {
            return false;
        }
        if let Some(learners) = &self.learner_ids {
            if !learners.contains(&enrollment.learner_id) {
                return false;
            }
        }
        if let Some(courses) = &self.course_ids {
            if !courses.contains(&enrollment.course_id) {
                return false;
            }
        }
        true
    }
}

/// Access to the course catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogReader: Send + Sync {
    /// Every course regardless of status, in stable catalog order
    async fn courses(&self) -> AppResult<Vec<Course>>;
}

/// Access to enrollment records
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EnrollmentReader: Send + Sync {
    /// The learner's enrollments joined with their courses.
    ///
    /// Unknown learners yield an empty list, not an error.
    async fn enrollments_for_learner(&self, learner_id: Uuid) -> AppResult<Vec<LearnerEnrollment>>;

    /// Enrollments across learners matching the query
    async fn enrollments_by_learners(&self, query: &EnrollmentQuery) -> AppResult<Vec<Enrollment>>;

    /// Platform-wide enrollments created at or after `since`
    async fn enrollments_since(&self, since: DateTime<Utc>) -> AppResult<Vec<Enrollment>>;
}
