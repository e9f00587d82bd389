//! File attachment model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Attachment metadata; the bytes are only loaded on download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileAttachment {
    pub id: Uuid,
    pub seminar_id: Uuid,
    pub file_name: String,
    pub content_type: Option<String>,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AttachmentContent {
    #[sqlx(flatten)]
    pub meta: FileAttachment,
    pub file_data: Vec<u8>,
}

/// A file as received from the presentation layer
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl AttachmentContent {
    pub fn content_type_or_default(&self) -> &str {
        self.meta
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}
