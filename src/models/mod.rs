mod course;
mod enrollment;
mod recommendation;

pub use course::{Course, CourseLevel, CourseStatus};
pub use enrollment::{Enrollment, EnrollmentState, LearnerEnrollment};
pub use recommendation::{CourseScore, RecommendationResult};
