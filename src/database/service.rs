//! Database service layer
//!
//! This module bundles the PostgreSQL repositories and exposes them through
//! the storage traits in [`crate::database::store`].

use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::database::store::{ApplicationStore, AttachmentStore, CategoryStore, SeminarStore, UserStore};
use crate::database::{
    ApplicationRepository, AttachmentRepository, CategoryRepository, DatabasePool,
    SeminarRepository, UserRepository,
};
use crate::models::*;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub seminars: SeminarRepository,
    pub applications: ApplicationRepository,
    pub categories: CategoryRepository,
    pub attachments: AttachmentRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            seminars: SeminarRepository::new(pool.clone()),
            applications: ApplicationRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            attachments: AttachmentRepository::new(pool),
        }
    }
}

impl UserStore for DatabaseService {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users.find_by_username(username).await
    }

    async fn create_user(&self, user: User) -> Result<User> {
        self.users.create(user).await
    }

    async fn count_users(&self) -> Result<i64> {
        self.users.count().await
    }
}

impl SeminarStore for DatabaseService {
    async fn create_seminar(&self, seminar: Seminar) -> Result<Seminar> {
        self.seminars.create(seminar).await
    }

    async fn find_seminar(&self, id: Uuid) -> Result<Option<Seminar>> {
        self.seminars.find_by_id(id).await
    }

    async fn update_seminar(&self, id: Uuid, request: &SeminarRequest) -> Result<Option<Seminar>> {
        self.seminars.update(id, request).await
    }

    async fn set_closed_flag(&self, id: Uuid, expected: bool, closed: bool) -> Result<Option<Seminar>> {
        self.seminars.set_closed(id, expected, closed).await
    }

    async fn delete_seminar_cascade(&self, id: Uuid) -> Result<bool> {
        self.seminars.delete_cascade(id).await
    }

    async fn list_seminars(&self, filter: &SeminarFilter) -> Result<Vec<Seminar>> {
        self.seminars.list(filter).await
    }

    async fn count_seminars(&self) -> Result<i64> {
        self.seminars.count().await
    }

    async fn count_seminars_in_category(&self, category_id: Uuid) -> Result<i64> {
        self.seminars.count_by_category(category_id).await
    }

    async fn count_active_seminars(&self, now: DateTime<Utc>) -> Result<i64> {
        self.seminars.count_active(now).await
    }

    async fn count_seminars_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        self.seminars.count_between(start, end).await
    }

    async fn monthly_seminar_counts(&self) -> Result<Vec<MonthlySeminarCount>> {
        self.seminars.monthly_counts().await
    }

    async fn recent_seminars(&self, limit: i64) -> Result<Vec<RecentSeminar>> {
        self.seminars.recent(limit).await
    }
}

impl ApplicationStore for DatabaseService {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        self.applications.find_by_id(id).await
    }

    async fn application_exists(&self, user_id: Uuid, seminar_id: Uuid) -> Result<bool> {
        self.applications.exists(user_id, seminar_id).await
    }

    async fn insert_application(&self, application: Application) -> Result<Application> {
        self.applications.create(application).await
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool> {
        self.applications.delete(id).await
    }

    async fn list_applications_for_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        self.applications.list_for_user(user_id).await
    }

    async fn list_applications_for_seminar(&self, seminar_id: Uuid) -> Result<Vec<Application>> {
        self.applications.list_for_seminar(seminar_id).await
    }

    async fn list_applicants(&self, seminar_id: Uuid) -> Result<Vec<Applicant>> {
        self.applications.list_applicants(seminar_id).await
    }

    async fn count_applications(&self) -> Result<i64> {
        self.applications.count().await
    }

    async fn count_applications_for_seminar(&self, seminar_id: Uuid) -> Result<i64> {
        self.applications.count_for_seminar(seminar_id).await
    }

    async fn count_applications_since(&self, since: DateTime<Utc>) -> Result<i64> {
        self.applications.count_since(since).await
    }

    async fn recent_applications(&self, limit: i64) -> Result<Vec<RecentApplication>> {
        self.applications.recent(limit).await
    }
}

impl CategoryStore for DatabaseService {
    async fn create_category(&self, category: Category) -> Result<Category> {
        self.categories.create(category).await
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>> {
        self.categories.find_by_id(id).await
    }

    async fn update_category(&self, id: Uuid, request: &CategoryRequest) -> Result<Option<Category>> {
        self.categories.update(id, request).await
    }

    async fn set_category_active(&self, id: Uuid, active: bool) -> Result<Option<Category>> {
        self.categories.set_active(id, active).await
    }

    async fn category_name_exists(&self, name: &str) -> Result<bool> {
        self.categories.name_exists(name).await
    }

    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>> {
        self.categories.list(active_only).await
    }

    async fn count_categories(&self) -> Result<i64> {
        self.categories.count().await
    }
}

impl AttachmentStore for DatabaseService {
    async fn insert_attachments(&self, files: Vec<(FileAttachment, Vec<u8>)>) -> Result<Vec<FileAttachment>> {
        self.attachments.create_many(files).await
    }

    async fn find_attachment(&self, id: Uuid) -> Result<Option<AttachmentContent>> {
        self.attachments.find_by_id(id).await
    }

    async fn list_attachments(&self, seminar_id: Uuid) -> Result<Vec<FileAttachment>> {
        self.attachments.list_for_seminar(seminar_id).await
    }

    async fn delete_attachment(&self, id: Uuid) -> Result<bool> {
        self.attachments.delete(id).await
    }
}
