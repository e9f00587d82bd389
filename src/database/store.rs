//! Storage collaborator traits
//!
//! The core talks to persistence only through these traits. Two
//! implementations exist: [`DatabaseService`](crate::database::DatabaseService)
//! over PostgreSQL and [`MemoryStore`](crate::database::MemoryStore) in-process.
//!
//! Every storage failure is reported as [`SeminarHubError::Unavailable`](crate::utils::errors::SeminarHubError::Unavailable).
//! Lookups return `Ok(None)` / `Ok(false)` for absent rows and leave the
//! `NotFound` decision to the caller.

use std::future::Future;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::models::*;
use crate::utils::errors::Result;

/// Read access to users owned by the identity collaborator
pub trait UserStore: Send + Sync {
    fn find_user(&self, id: Uuid) -> impl Future<Output = Result<Option<User>>> + Send;

    fn find_user_by_username(&self, username: &str) -> impl Future<Output = Result<Option<User>>> + Send;

    /// Insert a user; used by sample-data seeding and tests
    fn create_user(&self, user: User) -> impl Future<Output = Result<User>> + Send;

    fn count_users(&self) -> impl Future<Output = Result<i64>> + Send;
}

pub trait SeminarStore: Send + Sync {
    fn create_seminar(&self, seminar: Seminar) -> impl Future<Output = Result<Seminar>> + Send;

    fn find_seminar(&self, id: Uuid) -> impl Future<Output = Result<Option<Seminar>>> + Send;

    /// Replace the editable fields. Returns `None` if the seminar is gone.
    fn update_seminar(&self, id: Uuid, request: &SeminarRequest) -> impl Future<Output = Result<Option<Seminar>>> + Send;

    /// Compare-and-set on the closed flag. Returns `None` when the seminar is
    /// missing or its flag no longer equals `expected`.
    fn set_closed_flag(&self, id: Uuid, expected: bool, closed: bool) -> impl Future<Output = Result<Option<Seminar>>> + Send;

    /// Delete a seminar together with its applications and attachments.
    /// Returns `false` if nothing was deleted.
    fn delete_seminar_cascade(&self, id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    /// Seminars matching `filter`, newest date first
    fn list_seminars(&self, filter: &SeminarFilter) -> impl Future<Output = Result<Vec<Seminar>>> + Send;

    fn count_seminars(&self) -> impl Future<Output = Result<i64>> + Send;

    fn count_seminars_in_category(&self, category_id: Uuid) -> impl Future<Output = Result<i64>> + Send;

    /// Seminars with `date > now` and the closed flag unset
    fn count_active_seminars(&self, now: DateTime<Utc>) -> impl Future<Output = Result<i64>> + Send;

    /// Seminars with `start <= date < end`
    fn count_seminars_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> impl Future<Output = Result<i64>> + Send;

    /// Seminar counts grouped by year and month, most recent first
    fn monthly_seminar_counts(&self) -> impl Future<Output = Result<Vec<MonthlySeminarCount>>> + Send;

    fn recent_seminars(&self, limit: i64) -> impl Future<Output = Result<Vec<RecentSeminar>>> + Send;
}

pub trait ApplicationStore: Send + Sync {
    fn find_application(&self, id: Uuid) -> impl Future<Output = Result<Option<Application>>> + Send;

    fn application_exists(&self, user_id: Uuid, seminar_id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    /// Uniqueness-enforcing insert. A second application for the same
    /// (user, seminar) pair fails with `AlreadyApplied`.
    fn insert_application(&self, application: Application) -> impl Future<Output = Result<Application>> + Send;

    /// Returns `false` if the application no longer exists
    fn delete_application(&self, id: Uuid) -> impl Future<Output = Result<bool>> + Send;

    /// The user's applications, newest first
    fn list_applications_for_user(&self, user_id: Uuid) -> impl Future<Output = Result<Vec<Application>>> + Send;

    /// The seminar's applications, newest first
    fn list_applications_for_seminar(&self, seminar_id: Uuid) -> impl Future<Output = Result<Vec<Application>>> + Send;

    /// The seminar's applicants with their user records, newest first
    fn list_applicants(&self, seminar_id: Uuid) -> impl Future<Output = Result<Vec<Applicant>>> + Send;

    fn count_applications(&self) -> impl Future<Output = Result<i64>> + Send;

    fn count_applications_for_seminar(&self, seminar_id: Uuid) -> impl Future<Output = Result<i64>> + Send;

    fn count_applications_since(&self, since: DateTime<Utc>) -> impl Future<Output = Result<i64>> + Send;

    fn recent_applications(&self, limit: i64) -> impl Future<Output = Result<Vec<RecentApplication>>> + Send;
}

pub trait CategoryStore: Send + Sync {
    /// Fails with `DuplicateName` if the name is taken
    fn create_category(&self, category: Category) -> impl Future<Output = Result<Category>> + Send;

    fn find_category(&self, id: Uuid) -> impl Future<Output = Result<Option<Category>>> + Send;

    /// Fails with `DuplicateName` if renamed onto another category's name
    fn update_category(&self, id: Uuid, request: &CategoryRequest) -> impl Future<Output = Result<Option<Category>>> + Send;

    fn set_category_active(&self, id: Uuid, active: bool) -> impl Future<Output = Result<Option<Category>>> + Send;

    fn category_name_exists(&self, name: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Ordered by display order, then name
    fn list_categories(&self, active_only: bool) -> impl Future<Output = Result<Vec<Category>>> + Send;

    fn count_categories(&self) -> impl Future<Output = Result<i64>> + Send;
}

pub trait AttachmentStore: Send + Sync {
    /// All or nothing: a failure on any file leaves none of the batch stored
    fn insert_attachments(&self, files: Vec<(FileAttachment, Vec<u8>)>) -> impl Future<Output = Result<Vec<FileAttachment>>> + Send;

    fn find_attachment(&self, id: Uuid) -> impl Future<Output = Result<Option<AttachmentContent>>> + Send;

    /// Metadata only, newest upload first
    fn list_attachments(&self, seminar_id: Uuid) -> impl Future<Output = Result<Vec<FileAttachment>>> + Send;

    fn delete_attachment(&self, id: Uuid) -> impl Future<Output = Result<bool>> + Send;
}

/// Everything the core needs from storage
pub trait Store: UserStore + SeminarStore + ApplicationStore + CategoryStore + AttachmentStore + Clone + 'static {}

impl<T> Store for T where T: UserStore + SeminarStore + ApplicationStore + CategoryStore + AttachmentStore + Clone + 'static {}
