pub mod readers;
pub mod recommendations;

pub use readers::{CatalogReader, EnrollmentQuery, EnrollmentReader};
pub use recommendations::{RecommendationSettings, Recommender};
