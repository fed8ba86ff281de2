use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Course, CourseLevel, EnrollmentState, LearnerEnrollment};

/// Attributes a learner has shown interest in, gathered from completed and
/// in-progress courses. Recomputed for every request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearnerInterestProfile {
    pub categories: HashSet<String>,
    pub subcategories: HashSet<String>,
    pub levels: HashSet<CourseLevel>,
    pub instructor_ids: HashSet<Uuid>,
    pub tags: HashSet<String>,
}

impl LearnerInterestProfile {
    fn absorb(&mut self, course: &Course) {
        if let Some(category) = course.category_key() {
            self.categories.insert(category.to_string());
        }
        if let Some(subcategory) = course.subcategory_key() {
            self.subcategories.insert(subcategory.to_string());
        }
        if let Some(level) = course.level {
            self.levels.insert(level);
        }
        if let Some(instructor_id) = course.instructor_id {
            self.instructor_ids.insert(instructor_id);
        }
        self.tags.extend(course.tag_keys().map(str::to_string));
    }
}

/// A learner's enrollments partitioned for the generators
#[derive(Debug, Clone, Default)]
pub struct LearnerHistory {
    pub profile: LearnerInterestProfile,
    pub completed: Vec<Course>,
    pub in_progress: Vec<Course>,
    /// Every enrolled course id, whatever its progress
    pub enrolled_ids: HashSet<Uuid>,
}

impl LearnerHistory {
    /// Partitions enrollments into completed and in-progress courses.
    ///
    /// Not-started enrollments only feed the enrolled-id exclusion set.
    pub fn from_enrollments(enrollments: &[LearnerEnrollment], completion_threshold: u8) -> Self {
        let mut history = LearnerHistory::default();

        for LearnerEnrollment { enrollment, course } in enrollments {
            history.enrolled_ids.insert(enrollment.course_id);

            match enrollment.state(completion_threshold) {
                EnrollmentState::Completed => {
                    history.profile.absorb(course);
                    history.completed.push(course.clone());
                }
                EnrollmentState::InProgress => {
                    history.profile.absorb(course);
                    history.in_progress.push(course.clone());
                }
                EnrollmentState::NotStarted => {}
            }
        }

        history
    }

    /// Ids of completed courses
    pub fn completed_ids(&self) -> HashSet<Uuid> {
        self.completed.iter().map(|c| c.id).collect()
    }

    pub fn has_activity(&self) -> bool {
        !self.completed.is_empty() || !self.in_progress.is_empty()
    }
}
