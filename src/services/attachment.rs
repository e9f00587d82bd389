//! Attachment service implementation
//!
//! Thin layer over the attachment store: names are sanitized, the content
//! type is guessed from the extension when the upload did not carry one, and
//! uploads above the configured limit are refused.

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use crate::database::Store;
use crate::models::attachment::{AttachmentContent, FileAttachment, UploadedFile};
use crate::models::seminar::Seminar;
use crate::models::user::Actor;
use crate::services::clock::Clock;
use crate::services::policy;
use crate::utils::errors::{Result, SeminarHubError};
use crate::utils::helpers::{format_bytes, sanitize_filename};
use crate::utils::logging::log_seminar_action;

#[derive(Clone)]
pub struct AttachmentService<S: Store> {
    store: S,
    clock: Arc<dyn Clock>,
    max_bytes: u64,
}

impl<S: Store> AttachmentService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>, max_bytes: u64) -> Self {
        Self { store, clock, max_bytes }
    }

    async fn seminar(&self, id: Uuid) -> Result<Seminar> {
        self.store
            .find_seminar(id)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Seminar", id))
    }

    /// Attach files to a seminar. Empty files are skipped.
    pub async fn upload(&self, actor: &Actor, seminar_id: Uuid, files: Vec<UploadedFile>) -> Result<Vec<FileAttachment>> {
        let seminar = self.seminar(seminar_id).await?;
        policy::require_mutate_seminar(actor, &seminar)?;

        // Validate the whole batch before handing it to the store in one piece
        let mut prepared = Vec::with_capacity(files.len());
        for file in files {
            if file.data.is_empty() {
                debug!(file_name = %file.file_name, "Skipping empty upload");
                continue;
            }

            let size = file.data.len() as u64;
            if size > self.max_bytes {
                return Err(SeminarHubError::InvalidInput(format!(
                    "{} is {}, limit is {}",
                    file.file_name,
                    format_bytes(size),
                    format_bytes(self.max_bytes)
                )));
            }

            let file_name = sanitize_filename(&file.file_name);
            let content_type = file
                .content_type
                .filter(|c| !c.trim().is_empty())
                .or_else(|| mime_guess::from_path(&file_name).first().map(|m| m.to_string()));

            let meta = FileAttachment {
                id: Uuid::new_v4(),
                seminar_id,
                file_name,
                content_type,
                file_size: size as i64,
                uploaded_at: self.clock.now(),
            };
            prepared.push((meta, file.data));
        }

        let stored = self.store.insert_attachments(prepared).await?;

        log_seminar_action(seminar_id, "upload_attachments", actor.user_id, Some(format!("{} file(s)", stored.len()).as_str()));
        Ok(stored)
    }

    /// Attachment metadata for a seminar, newest upload first
    pub async fn list(&self, seminar_id: Uuid) -> Result<Vec<FileAttachment>> {
        self.seminar(seminar_id).await?;
        self.store.list_attachments(seminar_id).await
    }

    pub async fn download(&self, id: Uuid) -> Result<AttachmentContent> {
        self.store
            .find_attachment(id)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Attachment", id))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<()> {
        let attachment = self.download(id).await?;
        let seminar = self.seminar(attachment.meta.seminar_id).await?;
        policy::require_mutate_seminar(actor, &seminar)?;

        if !self.store.delete_attachment(id).await? {
            return Err(SeminarHubError::not_found("Attachment", id));
        }

        log_seminar_action(seminar.id, "delete_attachment", actor.user_id, Some(attachment.meta.file_name.as_str()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use crate::database::{MemoryStore, SeminarStore};
    use crate::models::user::Role;
    use crate::services::clock::SystemClock;

    async fn setup(max_bytes: u64) -> (AttachmentService<MemoryStore>, Seminar, Actor) {
        let store = MemoryStore::new();
        let creator = Actor::new(Uuid::new_v4(), Role::User);
        let seminar = store
            .create_seminar(Seminar {
                id: Uuid::new_v4(),
                title: "Profiling".to_string(),
                description: None,
                date: Utc::now() + Duration::days(10),
                location: "Lab".to_string(),
                is_closed: false,
                created_by: creator.user_id,
                category_id: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        (AttachmentService::new(store, Arc::new(SystemClock), max_bytes), seminar, creator)
    }

    fn file(name: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: None,
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_upload_sanitizes_and_guesses_type() {
        let (attachments, seminar, creator) = setup(1024).await;

        let stored = attachments
            .upload(&creator, seminar.id, vec![file("../../slides.pdf", b"%PDF"), file("empty.txt", b"")])
            .await
            .unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].file_name, "slides.pdf");
        assert_eq!(stored[0].content_type.as_deref(), Some("application/pdf"));
        assert_eq!(stored[0].file_size, 4);

        let content = attachments.download(stored[0].id).await.unwrap();
        assert_eq!(content.file_data, b"%PDF".to_vec());
        assert_eq!(content.content_type_or_default(), "application/pdf");
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let (attachments, seminar, creator) = setup(3).await;

        assert_matches!(
            attachments.upload(&creator, seminar.id, vec![file("notes.txt", b"abcd")]).await,
            Err(SeminarHubError::InvalidInput(_))
        );
        assert!(attachments.list(seminar.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_creator_or_admin_changes_attachments() {
        let (attachments, seminar, creator) = setup(1024).await;
        let stored = attachments
            .upload(&creator, seminar.id, vec![file("agenda.txt", b"agenda")])
            .await
            .unwrap();

        let stranger = Actor::new(Uuid::new_v4(), Role::User);
        assert_matches!(
            attachments.delete(&stranger, stored[0].id).await,
            Err(SeminarHubError::Forbidden(_))
        );

        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        attachments.delete(&admin, stored[0].id).await.unwrap();
        assert_matches!(
            attachments.download(stored[0].id).await,
            Err(SeminarHubError::NotFound { entity: "Attachment", .. })
        );
    }
}
