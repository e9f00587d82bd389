//! Seminar repository implementation

use std::time::Instant;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::dashboard::{MonthlySeminarCount, RecentSeminar};
use crate::models::seminar::{Seminar, SeminarFilter, SeminarRequest};
use crate::utils::errors::SeminarHubError;
use crate::utils::logging::log_database_operation;

const SEMINAR_COLUMNS: &str =
    "id, title, description, seminar_date AS date, location, is_closed, created_by, category_id, created_at";
const CREATOR_FOREIGN_KEY: &str = "fk_seminars_created_by";
const CATEGORY_FOREIGN_KEY: &str = "fk_seminars_category";

#[derive(Debug, Clone)]
pub struct SeminarRepository {
    pool: PgPool,
}

impl SeminarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new seminar
    pub async fn create(&self, seminar: Seminar) -> Result<Seminar, SeminarHubError> {
        let (created_by, category_id) = (seminar.created_by, seminar.category_id);

        let seminar = sqlx::query_as::<_, Seminar>(&format!(
            r#"
            INSERT INTO seminars (id, title, description, seminar_date, location, is_closed, created_by, category_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            SEMINAR_COLUMNS
        ))
        .bind(seminar.id)
        .bind(seminar.title)
        .bind(seminar.description)
        .bind(seminar.date)
        .bind(seminar.location)
        .bind(seminar.is_closed)
        .bind(seminar.created_by)
        .bind(seminar.category_id)
        .bind(seminar.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    match (db_err.constraint(), category_id) {
                        (Some(CREATOR_FOREIGN_KEY), _) => return SeminarHubError::not_found("User", created_by),
                        (Some(CATEGORY_FOREIGN_KEY), Some(category_id)) => {
                            return SeminarHubError::not_found("Category", category_id)
                        }
                        _ => {}
                    }
                }
            }
            SeminarHubError::from(e)
        })?;

        Ok(seminar)
    }

    /// Find seminar by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Seminar>, SeminarHubError> {
        let seminar = sqlx::query_as::<_, Seminar>(&format!("SELECT {} FROM seminars WHERE id = $1", SEMINAR_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(seminar)
    }

    /// Replace the editable fields of a seminar
    pub async fn update(&self, id: Uuid, request: &SeminarRequest) -> Result<Option<Seminar>, SeminarHubError> {
        let seminar = sqlx::query_as::<_, Seminar>(&format!(
            r#"
            UPDATE seminars
            SET title = $2,
                description = $3,
                seminar_date = $4,
                location = $5,
                category_id = $6
            WHERE id = $1
            RETURNING {}
            "#,
            SEMINAR_COLUMNS
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.date)
        .bind(&request.location)
        .bind(request.category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seminar)
    }

    /// Flip the closed flag only if it still holds the expected value
    pub async fn set_closed(&self, id: Uuid, expected: bool, closed: bool) -> Result<Option<Seminar>, SeminarHubError> {
        let seminar = sqlx::query_as::<_, Seminar>(&format!(
            "UPDATE seminars SET is_closed = $3 WHERE id = $1 AND is_closed = $2 RETURNING {}",
            SEMINAR_COLUMNS
        ))
        .bind(id)
        .bind(expected)
        .bind(closed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(seminar)
    }

    /// Delete a seminar and everything it owns in one transaction
    pub async fn delete_cascade(&self, id: Uuid) -> Result<bool, SeminarHubError> {
        let started = Instant::now();
        let result = self.delete_cascade_tx(id).await;
        log_database_operation("delete_cascade", "seminars", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn delete_cascade_tx(&self, id: Uuid) -> Result<bool, SeminarHubError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM seminar_applications WHERE seminar_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM file_attachments WHERE seminar_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM seminars WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// List seminars matching the filter, newest date first
    pub async fn list(&self, filter: &SeminarFilter) -> Result<Vec<Seminar>, SeminarHubError> {
        let seminars = sqlx::query_as::<_, Seminar>(&format!(
            r#"
            SELECT {}
            FROM seminars
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::text IS NULL
                   OR POSITION(LOWER($2) IN LOWER(title)) > 0
                   OR POSITION(LOWER($2) IN LOWER(COALESCE(description, ''))) > 0)
              AND ($3::timestamptz IS NULL OR seminar_date >= $3)
              AND ($4::timestamptz IS NULL OR seminar_date <= $4)
              AND ($5::boolean IS NULL OR is_closed = $5)
            ORDER BY seminar_date DESC
            "#,
            SEMINAR_COLUMNS
        ))
        .bind(filter.category_id)
        .bind(filter.keyword())
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.is_closed)
        .fetch_all(&self.pool)
        .await?;

        Ok(seminars)
    }

    /// Count total seminars
    pub async fn count(&self) -> Result<i64, SeminarHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seminars")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count seminars in a category
    pub async fn count_by_category(&self, category_id: Uuid) -> Result<i64, SeminarHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seminars WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count upcoming seminars that are not administratively closed
    pub async fn count_active(&self, now: DateTime<Utc>) -> Result<i64, SeminarHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seminars WHERE seminar_date > $1 AND is_closed = false")
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count seminars taking place in `[start, end)`
    pub async fn count_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, SeminarHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seminars WHERE seminar_date >= $1 AND seminar_date < $2")
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Seminar counts per calendar month (UTC)
    pub async fn monthly_counts(&self) -> Result<Vec<MonthlySeminarCount>, SeminarHubError> {
        let counts = sqlx::query_as::<_, MonthlySeminarCount>(
            r#"
            SELECT EXTRACT(YEAR FROM seminar_date AT TIME ZONE 'UTC')::int AS year,
                   EXTRACT(MONTH FROM seminar_date AT TIME ZONE 'UTC')::int AS month,
                   COUNT(*) AS count
            FROM seminars
            GROUP BY 1, 2
            ORDER BY 1 DESC, 2 DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Latest seminars by date with creator, category and application count
    pub async fn recent(&self, limit: i64) -> Result<Vec<RecentSeminar>, SeminarHubError> {
        let seminars = sqlx::query_as::<_, RecentSeminar>(
            r#"
            SELECT s.id, s.title, s.seminar_date AS date, s.location,
                   u.full_name AS created_by_name, s.created_at,
                   (SELECT COUNT(*) FROM seminar_applications a WHERE a.seminar_id = s.id) AS application_count,
                   c.name AS category_name, c.color_code AS category_color
            FROM seminars s
            INNER JOIN users u ON u.id = s.created_by
            LEFT JOIN categories c ON c.id = s.category_id
            ORDER BY s.seminar_date DESC
            LIMIT $1
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(seminars)
    }
}
