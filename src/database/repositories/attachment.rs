//! File attachment repository implementation

use std::time::Instant;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::attachment::{AttachmentContent, FileAttachment};
use crate::utils::errors::SeminarHubError;
use crate::utils::logging::log_database_operation;

const ATTACHMENT_COLUMNS: &str = "id, seminar_id, file_name, content_type, file_size, uploaded_at";

#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    pool: PgPool,
}

impl AttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a batch of attachments with their content in one transaction
    pub async fn create_many(&self, files: Vec<(FileAttachment, Vec<u8>)>) -> Result<Vec<FileAttachment>, SeminarHubError> {
        let started = Instant::now();
        let result = self.create_many_tx(files).await;

        log_database_operation("insert_batch", "file_attachments", started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn create_many_tx(&self, files: Vec<(FileAttachment, Vec<u8>)>) -> Result<Vec<FileAttachment>, SeminarHubError> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(files.len());

        for (meta, data) in files {
            let seminar_id = meta.seminar_id;

            let attachment = sqlx::query_as::<_, FileAttachment>(&format!(
                r#"
                INSERT INTO file_attachments (id, seminar_id, file_name, content_type, file_size, file_data, uploaded_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {}
                "#,
                ATTACHMENT_COLUMNS
            ))
            .bind(meta.id)
            .bind(meta.seminar_id)
            .bind(meta.file_name)
            .bind(meta.content_type)
            .bind(meta.file_size)
            .bind(data)
            .bind(meta.uploaded_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return SeminarHubError::not_found("Seminar", seminar_id);
                    }
                }
                SeminarHubError::from(e)
            })?;

            stored.push(attachment);
        }

        // Dropping the transaction on an early return rolls back every row above
        tx.commit().await?;
        Ok(stored)
    }

    /// Find attachment with its content
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AttachmentContent>, SeminarHubError> {
        let attachment = sqlx::query_as::<_, AttachmentContent>(&format!(
            "SELECT {}, file_data FROM file_attachments WHERE id = $1",
            ATTACHMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attachment)
    }

    /// List attachment metadata for a seminar
    pub async fn list_for_seminar(&self, seminar_id: Uuid) -> Result<Vec<FileAttachment>, SeminarHubError> {
        let attachments = sqlx::query_as::<_, FileAttachment>(&format!(
            "SELECT {} FROM file_attachments WHERE seminar_id = $1 ORDER BY uploaded_at DESC",
            ATTACHMENT_COLUMNS
        ))
        .bind(seminar_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attachments)
    }

    /// Delete attachment
    pub async fn delete(&self, id: Uuid) -> Result<bool, SeminarHubError> {
        let result = sqlx::query("DELETE FROM file_attachments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
