//! Seminar application repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::application::{Applicant, Application};
use crate::models::dashboard::RecentApplication;
use crate::utils::errors::SeminarHubError;

const APPLICATION_COLUMNS: &str = "id, user_id, seminar_id, applied_at";
const USER_FOREIGN_KEY: &str = "fk_seminar_applications_user";

#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an application; the (user, seminar) unique constraint decides races
    pub async fn create(&self, application: Application) -> Result<Application, SeminarHubError> {
        let (user_id, seminar_id) = (application.user_id, application.seminar_id);

        let application = sqlx::query_as::<_, Application>(&format!(
            r#"
            INSERT INTO seminar_applications (id, user_id, seminar_id, applied_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(application.id)
        .bind(application.user_id)
        .bind(application.seminar_id)
        .bind(application.applied_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return SeminarHubError::AlreadyApplied { user_id, seminar_id };
                }
                if db_err.is_foreign_key_violation() {
                    return match db_err.constraint() {
                        Some(USER_FOREIGN_KEY) => SeminarHubError::not_found("User", user_id),
                        _ => SeminarHubError::not_found("Seminar", seminar_id),
                    };
                }
            }
            SeminarHubError::from(e)
        })?;

        Ok(application)
    }

    /// Find application by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, SeminarHubError> {
        let application = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM seminar_applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    /// Check if user has applied to seminar
    pub async fn exists(&self, user_id: Uuid, seminar_id: Uuid) -> Result<bool, SeminarHubError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM seminar_applications WHERE user_id = $1 AND seminar_id = $2)"
        )
        .bind(user_id)
        .bind(seminar_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Delete application
    pub async fn delete(&self, id: Uuid) -> Result<bool, SeminarHubError> {
        let result = sqlx::query("DELETE FROM seminar_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a user's applications
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Application>, SeminarHubError> {
        let applications = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM seminar_applications WHERE user_id = $1 ORDER BY applied_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    /// Get a seminar's applications
    pub async fn list_for_seminar(&self, seminar_id: Uuid) -> Result<Vec<Application>, SeminarHubError> {
        let applications = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM seminar_applications WHERE seminar_id = $1 ORDER BY applied_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(seminar_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    /// Get a seminar's applicants joined with their user records
    pub async fn list_applicants(&self, seminar_id: Uuid) -> Result<Vec<Applicant>, SeminarHubError> {
        let applicants = sqlx::query_as::<_, Applicant>(
            r#"
            SELECT a.id AS application_id, a.applied_at,
                   u.id, u.username, u.full_name, u.email, u.department, u.role, u.created_at
            FROM seminar_applications a
            INNER JOIN users u ON u.id = a.user_id
            WHERE a.seminar_id = $1
            ORDER BY a.applied_at DESC
            "#
        )
        .bind(seminar_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(applicants)
    }

    /// Count total applications
    pub async fn count(&self) -> Result<i64, SeminarHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seminar_applications")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Get application count for seminar
    pub async fn count_for_seminar(&self, seminar_id: Uuid) -> Result<i64, SeminarHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seminar_applications WHERE seminar_id = $1")
            .bind(seminar_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count applications made after `since`
    pub async fn count_since(&self, since: DateTime<Utc>) -> Result<i64, SeminarHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seminar_applications WHERE applied_at > $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Latest applications with applicant and seminar names
    pub async fn recent(&self, limit: i64) -> Result<Vec<RecentApplication>, SeminarHubError> {
        let applications = sqlx::query_as::<_, RecentApplication>(
            r#"
            SELECT a.id, u.full_name AS user_name, u.department AS user_department,
                   s.id AS seminar_id, s.title AS seminar_title, a.applied_at
            FROM seminar_applications a
            INNER JOIN users u ON u.id = a.user_id
            INNER JOIN seminars s ON s.id = a.seminar_id
            ORDER BY a.applied_at DESC
            LIMIT $1
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }
}
