use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Course, CourseStatus, Enrollment, LearnerEnrollment},
    services::readers::{CatalogReader, EnrollmentQuery, EnrollmentReader},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Connection-level failures mean the store is unreachable; everything else
/// is a query error.
fn read_error(error: sqlx::Error) -> AppError {
    match error {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::Unavailable(error.to_string())
        }
        other => AppError::Database(other),
    }
}

const COURSE_COLUMNS: &str = "c.id, c.title, c.category, c.subcategory, c.level, c.tags, \
     c.instructor_id, c.rating, c.status, c.created_at";

const ENROLLMENT_COLUMNS: &str =
    "e.learner_id, e.course_id, e.progress_percentage, e.completion_date, e.enrolled_at";

#[derive(Debug, FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    category: Option<String>,
    subcategory: Option<String>,
    level: Option<String>,
    tags: Vec<String>,
    instructor_id: Option<Uuid>,
    rating: f64,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        // Unknown levels are treated as absent; unknown statuses are never
        // recommendable.
        let level = row.level.as_deref().and_then(|l| l.parse().ok());
        let status = row.status.parse().unwrap_or_else(|_| {
            tracing::debug!(course_id = %row.id, status = %row.status, "Unrecognized course status");
            CourseStatus::Draft
        });

        Course {
            id: row.id,
            title: row.title,
            category: row.category,
            subcategory: row.subcategory,
            level,
            tags: row.tags,
            instructor_id: row.instructor_id,
            rating: row.rating,
            status,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct EnrollmentRow {
    learner_id: Uuid,
    course_id: Uuid,
    progress_percentage: i16,
    completion_date: Option<DateTime<Utc>>,
    enrolled_at: DateTime<Utc>,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(row: EnrollmentRow) -> Self {
        Enrollment {
            learner_id: row.learner_id,
            course_id: row.course_id,
            progress_percentage: row.progress_percentage.clamp(0, 100) as u8,
            completion_date: row.completion_date,
            enrolled_at: row.enrolled_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct LearnerEnrollmentRow {
    #[sqlx(flatten)]
    enrollment: EnrollmentRow,
    #[sqlx(flatten)]
    course: CourseRow,
}

/// Postgres-backed catalog and enrollment reader
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogReader for PgStore {
    async fn courses(&self) -> AppResult<Vec<Course>> {
        let sql = format!(
            "SELECT {} FROM courses c ORDER BY c.created_at, c.id",
            COURSE_COLUMNS
        );

        let rows: Vec<CourseRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(read_error)?;

        tracing::debug!(courses = rows.len(), "Catalog loaded");

        Ok(rows.into_iter().map(Course::from).collect())
    }
}

#[async_trait::async_trait]
impl EnrollmentReader for PgStore {
    async fn enrollments_for_learner(&self, learner_id: Uuid) -> AppResult<Vec<LearnerEnrollment>> {
        let sql = format!(
            "SELECT {}, {} FROM enrollments e \
             JOIN courses c ON c.id = e.course_id \
             WHERE e.learner_id = $1 \
             ORDER BY e.enrolled_at, e.course_id",
            ENROLLMENT_COLUMNS, COURSE_COLUMNS
        );

        let rows: Vec<LearnerEnrollmentRow> = sqlx::query_as(&sql)
            .bind(learner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(read_error)?;

        Ok(rows
            .into_iter()
            .map(|row| LearnerEnrollment {
                enrollment: row.enrollment.into(),
                course: row.course.into(),
            })
            .collect())
    }

    async fn enrollments_by_learners(&self, query: &EnrollmentQuery) -> AppResult<Vec<Enrollment>> {
        let sql = format!(
            "SELECT {} FROM enrollments e \
             WHERE ($1::uuid[] IS NULL OR e.learner_id = ANY($1)) \
             AND ($2::uuid[] IS NULL OR e.course_id = ANY($2)) \
             AND ($3::uuid IS NULL OR e.learner_id <> $3) \
             ORDER BY e.enrolled_at, e.learner_id, e.course_id",
            ENROLLMENT_COLUMNS
        );

        let rows: Vec<EnrollmentRow> = sqlx::query_as(&sql)
            .bind(query.learner_ids.clone())
            .bind(query.course_ids.clone())
            .bind(query.exclude_learner)
            .fetch_all(&self.pool)
            .await
            .map_err(read_error)?;

        Ok(rows.into_iter().map(Enrollment::from).collect())
    }

    async fn enrollments_since(&self, since: DateTime<Utc>) -> AppResult<Vec<Enrollment>> {
        let sql = format!(
            "SELECT {} FROM enrollments e \
             WHERE e.enrolled_at >= $1 \
             ORDER BY e.enrolled_at, e.learner_id, e.course_id",
            ENROLLMENT_COLUMNS
        );

        let rows: Vec<EnrollmentRow> = sqlx::query_as(&sql)
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(read_error)?;

        Ok(rows.into_iter().map(Enrollment::from).collect())
    }
}
