//! In-process storage
//!
//! All tables sit behind a single mutex, so every store call is atomic with
//! respect to every other. Used by tests and by embedders that do not need
//! durability.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;
use crate::database::store::*;
use crate::models::*;
use crate::utils::errors::{Result, SeminarHubError};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    seminars: HashMap<Uuid, Seminar>,
    applications: HashMap<Uuid, Application>,
    categories: HashMap<Uuid, Category>,
    attachments: HashMap<Uuid, AttachmentContent>,
}

impl Tables {
    fn applications_sorted<F>(&self, predicate: F) -> Vec<Application>
    where
        F: Fn(&Application) -> bool,
    {
        let mut applications: Vec<Application> = self
            .applications
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        applications
    }

    fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| SeminarHubError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: User) -> Result<User> {
        let mut tables = self.lock()?;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(SeminarHubError::InvalidInput(format!("Username already exists: {}", user.username)));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.lock()?.users.len() as i64)
    }
}

impl SeminarStore for MemoryStore {
    async fn create_seminar(&self, seminar: Seminar) -> Result<Seminar> {
        self.lock()?.seminars.insert(seminar.id, seminar.clone());
        Ok(seminar)
    }

    async fn find_seminar(&self, id: Uuid) -> Result<Option<Seminar>> {
        Ok(self.lock()?.seminars.get(&id).cloned())
    }

    async fn update_seminar(&self, id: Uuid, request: &SeminarRequest) -> Result<Option<Seminar>> {
        let mut tables = self.lock()?;
        Ok(tables.seminars.get_mut(&id).map(|seminar| {
            seminar.title = request.title.clone();
            seminar.description = request.description.clone();
            seminar.date = request.date;
            seminar.location = request.location.clone();
            seminar.category_id = request.category_id;
            seminar.clone()
        }))
    }

    async fn set_closed_flag(&self, id: Uuid, expected: bool, closed: bool) -> Result<Option<Seminar>> {
        let mut tables = self.lock()?;
        Ok(tables
            .seminars
            .get_mut(&id)
            .filter(|seminar| seminar.is_closed == expected)
            .map(|seminar| {
                seminar.is_closed = closed;
                seminar.clone()
            }))
    }

    async fn delete_seminar_cascade(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.lock()?;
        if tables.seminars.remove(&id).is_none() {
            return Ok(false);
        }
        tables.applications.retain(|_, a| a.seminar_id != id);
        tables.attachments.retain(|_, a| a.meta.seminar_id != id);
        Ok(true)
    }

    async fn list_seminars(&self, filter: &SeminarFilter) -> Result<Vec<Seminar>> {
        let tables = self.lock()?;
        let mut seminars: Vec<Seminar> = tables
            .seminars
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        seminars.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(seminars)
    }

    async fn count_seminars(&self) -> Result<i64> {
        Ok(self.lock()?.seminars.len() as i64)
    }

    async fn count_seminars_in_category(&self, category_id: Uuid) -> Result<i64> {
        Ok(self
            .lock()?
            .seminars
            .values()
            .filter(|s| s.category_id == Some(category_id))
            .count() as i64)
    }

    async fn count_active_seminars(&self, now: DateTime<Utc>) -> Result<i64> {
        Ok(self
            .lock()?
            .seminars
            .values()
            .filter(|s| s.date > now && !s.is_closed)
            .count() as i64)
    }

    async fn count_seminars_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64> {
        Ok(self
            .lock()?
            .seminars
            .values()
            .filter(|s| s.date >= start && s.date < end)
            .count() as i64)
    }

    async fn monthly_seminar_counts(&self) -> Result<Vec<MonthlySeminarCount>> {
        let tables = self.lock()?;
        let mut counts: HashMap<(i32, i32), i64> = HashMap::new();
        for seminar in tables.seminars.values() {
            *counts
                .entry((seminar.date.year(), seminar.date.month() as i32))
                .or_insert(0) += 1;
        }

        let mut monthly: Vec<MonthlySeminarCount> = counts
            .into_iter()
            .map(|((year, month), count)| MonthlySeminarCount { year, month, count })
            .collect();
        monthly.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        Ok(monthly)
    }

    async fn recent_seminars(&self, limit: i64) -> Result<Vec<RecentSeminar>> {
        let tables = self.lock()?;
        let mut seminars: Vec<&Seminar> = tables.seminars.values().collect();
        seminars.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(seminars
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|s| {
                let category = s.category_id.and_then(|id| tables.categories.get(&id));
                RecentSeminar {
                    id: s.id,
                    title: s.title.clone(),
                    date: s.date,
                    location: s.location.clone(),
                    created_by_name: tables
                        .users
                        .get(&s.created_by)
                        .map(|u| u.full_name.clone())
                        .unwrap_or_default(),
                    created_at: s.created_at,
                    application_count: tables
                        .applications
                        .values()
                        .filter(|a| a.seminar_id == s.id)
                        .count() as i64,
                    category_name: category.map(|c| c.name.clone()),
                    category_color: category.and_then(|c| c.color_code.clone()),
                }
            })
            .collect())
    }
}

impl ApplicationStore for MemoryStore {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.lock()?.applications.get(&id).cloned())
    }

    async fn application_exists(&self, user_id: Uuid, seminar_id: Uuid) -> Result<bool> {
        Ok(self
            .lock()?
            .applications
            .values()
            .any(|a| a.user_id == user_id && a.seminar_id == seminar_id))
    }

    async fn insert_application(&self, application: Application) -> Result<Application> {
        let mut tables = self.lock()?;
        let duplicate = tables
            .applications
            .values()
            .any(|a| a.user_id == application.user_id && a.seminar_id == application.seminar_id);
        if duplicate {
            return Err(SeminarHubError::AlreadyApplied {
                user_id: application.user_id,
                seminar_id: application.seminar_id,
            });
        }
        if !tables.seminars.contains_key(&application.seminar_id) {
            return Err(SeminarHubError::not_found("Seminar", application.seminar_id));
        }
        tables.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool> {
        Ok(self.lock()?.applications.remove(&id).is_some())
    }

    async fn list_applications_for_user(&self, user_id: Uuid) -> Result<Vec<Application>> {
        Ok(self.lock()?.applications_sorted(|a| a.user_id == user_id))
    }

    async fn list_applications_for_seminar(&self, seminar_id: Uuid) -> Result<Vec<Application>> {
        Ok(self.lock()?.applications_sorted(|a| a.seminar_id == seminar_id))
    }

    async fn list_applicants(&self, seminar_id: Uuid) -> Result<Vec<Applicant>> {
        let tables = self.lock()?;
        Ok(tables
            .applications_sorted(|a| a.seminar_id == seminar_id)
            .into_iter()
            .filter_map(|a| {
                tables.users.get(&a.user_id).map(|user| Applicant {
                    application_id: a.id,
                    applied_at: a.applied_at,
                    user: user.clone(),
                })
            })
            .collect())
    }

    async fn count_applications(&self) -> Result<i64> {
        Ok(self.lock()?.applications.len() as i64)
    }

    async fn count_applications_for_seminar(&self, seminar_id: Uuid) -> Result<i64> {
        Ok(self
            .lock()?
            .applications
            .values()
            .filter(|a| a.seminar_id == seminar_id)
            .count() as i64)
    }

    async fn count_applications_since(&self, since: DateTime<Utc>) -> Result<i64> {
        Ok(self
            .lock()?
            .applications
            .values()
            .filter(|a| a.applied_at > since)
            .count() as i64)
    }

    async fn recent_applications(&self, limit: i64) -> Result<Vec<RecentApplication>> {
        let tables = self.lock()?;
        Ok(tables
            .applications_sorted(|_| true)
            .into_iter()
            .filter_map(|a| {
                let user = tables.users.get(&a.user_id)?;
                let seminar = tables.seminars.get(&a.seminar_id)?;
                Some(RecentApplication {
                    id: a.id,
                    user_name: user.full_name.clone(),
                    user_department: user.department.clone(),
                    seminar_id: seminar.id,
                    seminar_title: seminar.title.clone(),
                    applied_at: a.applied_at,
                })
            })
            .take(limit.max(0) as usize)
            .collect())
    }
}

impl CategoryStore for MemoryStore {
    async fn create_category(&self, category: Category) -> Result<Category> {
        let mut tables = self.lock()?;
        if tables.name_taken(&category.name, None) {
            return Err(SeminarHubError::DuplicateName(category.name));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.lock()?.categories.get(&id).cloned())
    }

    async fn update_category(&self, id: Uuid, request: &CategoryRequest) -> Result<Option<Category>> {
        let mut tables = self.lock()?;
        if tables.name_taken(&request.name, Some(id)) {
            return Err(SeminarHubError::DuplicateName(request.name.clone()));
        }
        Ok(tables.categories.get_mut(&id).map(|category| {
            category.name = request.name.clone();
            category.description = request.description.clone();
            category.icon_name = request.icon_name.clone();
            category.color_code = request.color_code.clone();
            category.display_order = request.display_order;
            category.is_active = request.is_active;
            category.clone()
        }))
    }

    async fn set_category_active(&self, id: Uuid, active: bool) -> Result<Option<Category>> {
        let mut tables = self.lock()?;
        Ok(tables.categories.get_mut(&id).map(|category| {
            category.is_active = active;
            category.clone()
        }))
    }

    async fn category_name_exists(&self, name: &str) -> Result<bool> {
        Ok(self.lock()?.name_taken(name, None))
    }

    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>> {
        let tables = self.lock()?;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(categories)
    }

    async fn count_categories(&self) -> Result<i64> {
        Ok(self.lock()?.categories.len() as i64)
    }
}

impl AttachmentStore for MemoryStore {
    async fn insert_attachments(&self, files: Vec<(FileAttachment, Vec<u8>)>) -> Result<Vec<FileAttachment>> {
        let mut tables = self.lock()?;
        if let Some((meta, _)) = files.iter().find(|(meta, _)| !tables.seminars.contains_key(&meta.seminar_id)) {
            return Err(SeminarHubError::not_found("Seminar", meta.seminar_id));
        }

        let mut stored = Vec::with_capacity(files.len());
        for (meta, data) in files {
            tables.attachments.insert(
                meta.id,
                AttachmentContent {
                    meta: meta.clone(),
                    file_data: data,
                },
            );
            stored.push(meta);
        }
        Ok(stored)
    }

    async fn find_attachment(&self, id: Uuid) -> Result<Option<AttachmentContent>> {
        Ok(self.lock()?.attachments.get(&id).cloned())
    }

    async fn list_attachments(&self, seminar_id: Uuid) -> Result<Vec<FileAttachment>> {
        let tables = self.lock()?;
        let mut attachments: Vec<FileAttachment> = tables
            .attachments
            .values()
            .filter(|a| a.meta.seminar_id == seminar_id)
            .map(|a| a.meta.clone())
            .collect();
        attachments.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(attachments)
    }

    async fn delete_attachment(&self, id: Uuid) -> Result<bool> {
        Ok(self.lock()?.attachments.remove(&id).is_some())
    }
}
