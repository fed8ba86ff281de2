use serde::Serialize;

use super::Course;

/// A candidate course with its ranking score. Only lives during ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseScore<'a> {
    pub course: &'a Course,
    pub score: f64,
}

/// Response of a recommendation request
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    /// Content-based suggestions from the learner's own history
    pub personalized: Vec<Course>,
    /// Courses popular among learners who finished what this learner finished
    pub collaborative: Vec<Course>,
    /// Recent enrollment velocity, or top-rated when nothing is recent
    pub trending: Vec<Course>,
    /// Next difficulty tier per completed category
    pub next_steps: Vec<Course>,
    pub is_enrolled_in_all_courses: bool,
}

impl RecommendationResult {
    /// Iterates every recommended course across all sections
    pub fn all_courses(&self) -> impl Iterator<Item = &Course> {
        self.personalized
            .iter()
            .chain(self.collaborative.iter())
            .chain(self.trending.iter())
            .chain(self.next_steps.iter())
    }
}
