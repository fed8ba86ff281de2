use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Course;

/// A learner's enrollment in one course. Unique per (learner, course) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub learner_id: Uuid,
    pub course_id: Uuid,
    /// Progress through the course, 0 to 100
    pub progress_percentage: u8,
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
    pub enrolled_at: DateTime<Utc>,
}

/// How far along an enrollment is, derived on read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentState {
    Completed,
    InProgress,
    NotStarted,
}

impl Enrollment {
    /// Creates an untouched enrollment starting now
    pub fn new(learner_id: Uuid, course_id: Uuid) -> Self {
        Self {
            learner_id,
            course_id,
            progress_percentage: 0,
            completion_date: None,
            enrolled_at: Utc::now(),
        }
    }

    pub fn with_progress(mut self, progress_percentage: u8) -> Self {
        self.progress_percentage = progress_percentage.min(100);
        self
    }

    pub fn completed_on(mut self, completion_date: DateTime<Utc>) -> Self {
        self.completion_date = Some(completion_date);
        self
    }

    pub fn enrolled_on(mut self, enrolled_at: DateTime<Utc>) -> Self {
        self.enrolled_at = enrolled_at;
        self
    }

    /// Classifies the enrollment against the completion threshold.
    ///
    /// An explicit completion date always wins, so an enrollment marked
    /// complete at 0% is still completed.
    pub fn state(&self, completion_threshold: u8) -> EnrollmentState {
        if self.progress_percentage >= completion_threshold || self.completion_date.is_some() {
            EnrollmentState::Completed
        } else if self.progress_percentage > 0 {
            EnrollmentState::InProgress
        } else {
            EnrollmentState::NotStarted
        }
    }

    /// Whether the learner has passed the course on progress alone
    pub fn has_passed(&self, completion_threshold: u8) -> bool {
        self.progress_percentage >= completion_threshold
    }
}

/// An enrollment joined with the course it refers to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearnerEnrollment {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course: Course,
}
