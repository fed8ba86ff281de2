use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

/// Difficulty tier of a course. Ordering follows the progression path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    /// The tier a learner should move to after this one, `None` once terminal
    pub fn next(self) -> Option<CourseLevel> {
        match self {
            CourseLevel::Beginner => Some(CourseLevel::Intermediate),
            CourseLevel::Intermediate => Some(CourseLevel::Advanced),
            CourseLevel::Advanced => None,
        }
    }
}

impl Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for CourseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(CourseLevel::Beginner),
            "intermediate" => Ok(CourseLevel::Intermediate),
            "advanced" => Ok(CourseLevel::Advanced),
            other => Err(format!("unknown course level '{}'", other)),
        }
    }
}

/// Publication state of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Published,
    Draft,
    Archived,
}

impl FromStr for CourseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "published" => Ok(CourseStatus::Published),
            "draft" => Ok(CourseStatus::Draft),
            "archived" => Ok(CourseStatus::Archived),
            other => Err(format!("unknown course status '{}'", other)),
        }
    }
}

/// A catalog entry. Every descriptive attribute is optional; a missing or
/// blank attribute never contributes to similarity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub level: Option<CourseLevel>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub instructor_id: Option<Uuid>,
    #[serde(default)]
    pub rating: f64,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a published course with no descriptive attributes
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category: None,
            subcategory: None,
            level: None,
            tags: Vec::new(),
            instructor_id: None,
            rating: 0.0,
            status: CourseStatus::Published,
            created_at: Utc::now(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_level(mut self, level: CourseLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_instructor(mut self, instructor_id: Uuid) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_status(mut self, status: CourseStatus) -> Self {
        self.status = status;
        self
    }

    /// Only published courses may be recommended
    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    /// Category, if present and not blank
    pub fn category_key(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Subcategory, if present and not blank
    pub fn subcategory_key(&self) -> Option<&str> {
        non_blank(self.subcategory.as_deref())
    }

    /// Non-blank tags
    pub fn tag_keys(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter_map(|t| non_blank(Some(t.as_str())))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
