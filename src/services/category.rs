//! Category service implementation
//!
//! Categories are never removed, only deactivated, so seminars that point at
//! one keep resolving.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use crate::database::Store;
use crate::models::category::{Category, CategoryRequest};
use crate::models::user::Actor;
use crate::services::clock::Clock;
use crate::services::policy;
use crate::utils::errors::{Result, SeminarHubError};
use crate::utils::logging::log_admin_action;

#[derive(Clone)]
pub struct CategoryService<S: Store> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: Store> CategoryService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Active categories in display order
    pub async fn list_active(&self) -> Result<Vec<Category>> {
        self.store.list_categories(true).await
    }

    /// Every category including deactivated ones. Admin only.
    pub async fn list_all(&self, actor: &Actor) -> Result<Vec<Category>> {
        policy::require_manage_categories(actor)?;
        self.store.list_categories(false).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Category> {
        self.store
            .find_category(id)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Category", id))
    }

    pub async fn create(&self, actor: &Actor, request: CategoryRequest) -> Result<Category> {
        policy::require_manage_categories(actor)?;
        let request = request.normalized()?;

        if self.store.category_name_exists(&request.name).await? {
            debug!(name = %request.name, "Category name already taken");
            return Err(SeminarHubError::DuplicateName(request.name));
        }

        let category = Category {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            icon_name: request.icon_name,
            color_code: request.color_code,
            display_order: request.display_order,
            is_active: request.is_active,
            created_at: self.clock.now(),
        };

        let category = self.store.create_category(category).await?;
        log_admin_action(actor.user_id, "create_category", Some(category.name.as_str()), None);
        Ok(category)
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, request: CategoryRequest) -> Result<Category> {
        policy::require_manage_categories(actor)?;
        let request = request.normalized()?;
        let current = self.get(id).await?;

        if current.name != request.name && self.store.category_name_exists(&request.name).await? {
            return Err(SeminarHubError::DuplicateName(request.name));
        }

        let category = self
            .store
            .update_category(id, &request)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Category", id))?;

        log_admin_action(actor.user_id, "update_category", Some(category.name.as_str()), None);
        Ok(category)
    }

    /// Soft delete
    pub async fn deactivate(&self, actor: &Actor, id: Uuid) -> Result<Category> {
        self.set_active(actor, id, false).await
    }

    pub async fn activate(&self, actor: &Actor, id: Uuid) -> Result<Category> {
        self.set_active(actor, id, true).await
    }

    async fn set_active(&self, actor: &Actor, id: Uuid, active: bool) -> Result<Category> {
        policy::require_manage_categories(actor)?;

        let category = self
            .store
            .set_category_active(id, active)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Category", id))?;

        info!(category_id = %id, active = active, "Category activation changed");
        Ok(category)
    }
}
