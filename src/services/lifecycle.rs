//! Seminar lifecycle controller
//!
//! Orchestrates create, update, close, reopen and delete. Each mutation
//! loads the seminar, asks the authorization policy, then the eligibility
//! engine, and only then writes. Close and reopen write through a
//! compare-and-set on the flag so two admins racing on the same seminar
//! cannot both succeed.

use std::collections::HashMap;
use std::sync::Arc;
use futures::future::try_join_all;
use tracing::debug;
use uuid::Uuid;
use crate::database::Store;
use crate::models::category::Category;
use crate::models::seminar::{Seminar, SeminarFilter, SeminarRequest, SeminarStatus, SeminarView};
use crate::models::user::Actor;
use crate::services::clock::Clock;
use crate::services::{eligibility, policy};
use crate::utils::errors::{Result, SeminarHubError};
use crate::utils::helpers::format_timestamp;
use crate::utils::logging::log_seminar_action;

#[derive(Clone)]
pub struct SeminarLifecycle<S: Store> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: Store> SeminarLifecycle<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn seminar(&self, id: Uuid) -> Result<Seminar> {
        self.store
            .find_seminar(id)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Seminar", id))
    }

    async fn require_category(&self, category_id: Option<Uuid>) -> Result<Option<Category>> {
        match category_id {
            Some(id) => self
                .store
                .find_category(id)
                .await?
                .map(Some)
                .ok_or_else(|| SeminarHubError::not_found("Category", id)),
            None => Ok(None),
        }
    }

    /// Publish a new seminar. Admin only.
    pub async fn create(&self, actor: &Actor, request: SeminarRequest) -> Result<Seminar> {
        policy::require_create_seminar(actor)?;
        let request = request.normalized()?;
        self.require_category(request.category_id).await?;

        let seminar = Seminar {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            date: request.date,
            location: request.location,
            is_closed: false,
            created_by: actor.user_id,
            category_id: request.category_id,
            created_at: self.clock.now(),
        };

        let seminar = self.store.create_seminar(seminar).await?;
        let details = format!("{} at {}", seminar.title, format_timestamp(seminar.date));
        log_seminar_action(seminar.id, "create", actor.user_id, Some(details.as_str()));
        Ok(seminar)
    }

    /// Full view of one seminar for the actor, including attachment metadata
    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<SeminarView> {
        let seminar = self.seminar(id).await?;
        let now = self.clock.now();

        let (category, application_count, user_applied, attachments) = futures::try_join!(
            async {
                match seminar.category_id {
                    Some(category_id) => self.store.find_category(category_id).await,
                    None => Ok(None),
                }
            },
            self.store.count_applications_for_seminar(id),
            self.store.application_exists(actor.user_id, id),
            self.store.list_attachments(id),
        )?;

        Ok(SeminarView {
            status: eligibility::status(&seminar, now),
            seminar,
            category,
            application_count,
            user_applied,
            attachments,
        })
    }

    /// Every seminar, newest date first
    pub async fn list(&self, actor: &Actor) -> Result<Vec<SeminarView>> {
        self.search(actor, SeminarFilter::default()).await
    }

    /// Seminars matching the filter, newest date first
    pub async fn search(&self, actor: &Actor, filter: SeminarFilter) -> Result<Vec<SeminarView>> {
        self.require_category(filter.category_id).await?;

        let (seminars, categories) = futures::try_join!(
            self.store.list_seminars(&filter),
            self.store.list_categories(false),
        )?;
        let categories: HashMap<Uuid, Category> = categories.into_iter().map(|c| (c.id, c)).collect();
        let now = self.clock.now();

        let views = try_join_all(seminars.into_iter().map(|seminar| {
            let category = seminar.category_id.and_then(|id| categories.get(&id).cloned());
            async move {
                let (application_count, user_applied) = futures::try_join!(
                    self.store.count_applications_for_seminar(seminar.id),
                    self.store.application_exists(actor.user_id, seminar.id),
                )?;

                Ok::<_, SeminarHubError>(SeminarView {
                    status: eligibility::status(&seminar, now),
                    seminar,
                    category,
                    application_count,
                    user_applied,
                    attachments: Vec::new(),
                })
            }
        }))
        .await?;

        debug!(count = views.len(), "Seminar search completed");
        Ok(views)
    }

    /// Replace the editable fields of a seminar that has not yet taken place
    pub async fn update(&self, actor: &Actor, id: Uuid, request: SeminarRequest) -> Result<Seminar> {
        let seminar = self.seminar(id).await?;
        policy::require_mutate_seminar(actor, &seminar)?;

        if eligibility::is_expired(&seminar, self.clock.now()) {
            return Err(SeminarHubError::AlreadyExpired { seminar_id: id });
        }

        let request = request.normalized()?;
        self.require_category(request.category_id).await?;

        let updated = self
            .store
            .update_seminar(id, &request)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Seminar", id))?;

        log_seminar_action(id, "update", actor.user_id, Some(updated.title.as_str()));
        Ok(updated)
    }

    /// Stop accepting applications ahead of the seminar date
    pub async fn close(&self, actor: &Actor, id: Uuid) -> Result<Seminar> {
        let seminar = self.seminar(id).await?;
        policy::require_mutate_seminar(actor, &seminar)?;

        if seminar.is_closed {
            return Err(SeminarHubError::AlreadyClosed { seminar_id: id });
        }
        if eligibility::is_expired(&seminar, self.clock.now()) {
            return Err(SeminarHubError::AlreadyExpired { seminar_id: id });
        }

        match self.store.set_closed_flag(id, false, true).await? {
            Some(closed) => {
                log_seminar_action(id, "close", actor.user_id, None);
                Ok(closed)
            }
            None => Err(self.lost_race(id, SeminarHubError::AlreadyClosed { seminar_id: id }).await),
        }
    }

    /// Accept applications again. Expired seminars stay closed for good.
    pub async fn reopen(&self, actor: &Actor, id: Uuid) -> Result<Seminar> {
        let seminar = self.seminar(id).await?;
        policy::require_mutate_seminar(actor, &seminar)?;

        if !seminar.is_closed {
            return Err(SeminarHubError::NotClosed { seminar_id: id });
        }
        if eligibility::is_expired(&seminar, self.clock.now()) {
            return Err(SeminarHubError::AlreadyExpired { seminar_id: id });
        }

        match self.store.set_closed_flag(id, true, false).await? {
            Some(reopened) => {
                log_seminar_action(id, "reopen", actor.user_id, None);
                Ok(reopened)
            }
            None => Err(self.lost_race(id, SeminarHubError::NotClosed { seminar_id: id }).await),
        }
    }

    /// The compare-and-set missed: either the row is gone or another writer flipped the flag first
    async fn lost_race(&self, id: Uuid, flipped: SeminarHubError) -> SeminarHubError {
        match self.store.find_seminar(id).await {
            Ok(Some(_)) => flipped,
            Ok(None) => SeminarHubError::not_found("Seminar", id),
            Err(e) => e,
        }
    }

    /// Remove a seminar in any state, with its applications and attachments
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<()> {
        let seminar = self.seminar(id).await?;
        policy::require_mutate_seminar(actor, &seminar)?;

        if !self.store.delete_seminar_cascade(id).await? {
            return Err(SeminarHubError::not_found("Seminar", id));
        }

        log_seminar_action(id, "delete", actor.user_id, Some(seminar.title.as_str()));
        Ok(())
    }

    /// Effective status of a seminar right now
    pub async fn status(&self, id: Uuid) -> Result<SeminarStatus> {
        let seminar = self.seminar(id).await?;
        Ok(eligibility::status(&seminar, self.clock.now()))
    }
}
