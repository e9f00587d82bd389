//! Seminar model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::models::attachment::FileAttachment;
use crate::models::category::Category;
use crate::utils::errors::{Result, SeminarHubError};
use crate::utils::helpers::normalize_whitespace;

/// Persisted seminar row
///
/// `is_closed` is the raw administrator flag. Consumers must go through the
/// eligibility engine for the effective state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Seminar {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub is_closed: bool,
    pub created_by: Uuid,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Editable seminar fields, used for both create and update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeminarRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category_id: Option<Uuid>,
}

impl SeminarRequest {
    /// Trim the request and reject blank required fields
    pub fn normalized(self) -> Result<Self> {
        let title = normalize_whitespace(&self.title);
        if title.is_empty() {
            return Err(SeminarHubError::InvalidInput("Seminar title is required".to_string()));
        }

        let location = self.location.trim().to_string();
        if location.is_empty() {
            return Err(SeminarHubError::InvalidInput("Seminar location is required".to_string()));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            title,
            description,
            date: self.date,
            location,
            category_id: self.category_id,
        })
    }
}

/// Search criteria for listing seminars; `None` fields do not filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeminarFilter {
    pub category_id: Option<Uuid>,
    pub keyword: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_closed: Option<bool>,
}

impl SeminarFilter {
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// In-process evaluation of the same predicate the SQL store applies
    pub fn matches(&self, seminar: &Seminar) -> bool {
        if let Some(category_id) = self.category_id {
            if seminar.category_id != Some(category_id) {
                return false;
            }
        }

        if let Some(keyword) = self.keyword() {
            let keyword = keyword.to_lowercase();
            let in_title = seminar.title.to_lowercase().contains(&keyword);
            let in_description = seminar
                .description
                .as_ref()
                .map(|d| d.to_lowercase().contains(&keyword))
                .unwrap_or(false);
            if !in_title && !in_description {
                return false;
            }
        }

        if let Some(start) = self.start_date {
            if seminar.date < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if seminar.date > end {
                return false;
            }
        }

        if let Some(is_closed) = self.is_closed {
            if seminar.is_closed != is_closed {
                return false;
            }
        }

        true
    }
}

/// Administrative and temporal state of a seminar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Open,
    Closed,
    Expired,
}

/// Effective status derived from a seminar at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeminarStatus {
    pub state: LifecycleState,
    pub is_expired: bool,
    /// Effective closed state: administrator flag or expiry
    pub is_closed: bool,
    pub can_apply: bool,
    pub can_cancel: bool,
}

/// Seminar as presented to a specific actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeminarView {
    pub seminar: Seminar,
    pub status: SeminarStatus,
    pub category: Option<Category>,
    pub application_count: i64,
    pub user_applied: bool,
    pub attachments: Vec<FileAttachment>,
}
