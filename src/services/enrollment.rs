//! Enrollment ledger
//!
//! Owns the apply and cancel transitions and the at-most-one-application
//! per (user, seminar) invariant. The pre-checks here give precise errors;
//! the store's uniqueness constraint is what settles a race between two
//! concurrent applies.

use std::sync::Arc;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::debug;
use uuid::Uuid;
use crate::database::Store;
use crate::models::application::{Applicant, Application, ApplicationView};
use crate::models::seminar::Seminar;
use crate::models::user::Actor;
use crate::services::clock::Clock;
use crate::services::{eligibility, policy};
use crate::utils::errors::{Result, SeminarHubError};
use crate::utils::logging::{log_application_action, log_application_rejected};

/// Decide whether an apply may proceed.
///
/// Rule order: duplicate application, then effective closed state.
pub fn check_apply(seminar: &Seminar, already_applied: bool, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
    if already_applied {
        return Err(SeminarHubError::AlreadyApplied {
            user_id: actor.user_id,
            seminar_id: seminar.id,
        });
    }

    if !policy::can_apply(actor, seminar) || !eligibility::application_allowed(seminar, now) {
        return Err(SeminarHubError::SeminarClosed { seminar_id: seminar.id });
    }

    Ok(())
}

/// Decide whether a cancel may proceed.
///
/// Rule order: ownership, cancellation cutoff, effective closed state.
pub fn check_cancel(application: &Application, seminar: &Seminar, actor: &Actor, now: DateTime<Utc>) -> Result<()> {
    if application.user_id != actor.user_id {
        return Err(SeminarHubError::NotOwner {
            application_id: application.id,
        });
    }

    if !eligibility::cancellation_allowed(seminar, now) {
        return Err(SeminarHubError::CancellationWindowClosed { seminar_id: seminar.id });
    }

    if eligibility::effective_closed(seminar, now) {
        return Err(SeminarHubError::SeminarAlreadyClosed { seminar_id: seminar.id });
    }

    Ok(())
}

#[derive(Clone)]
pub struct EnrollmentLedger<S: Store> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: Store> EnrollmentLedger<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn seminar(&self, seminar_id: Uuid) -> Result<Seminar> {
        self.store
            .find_seminar(seminar_id)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Seminar", seminar_id))
    }

    /// Apply the actor to a seminar
    pub async fn apply(&self, actor: &Actor, seminar_id: Uuid) -> Result<Application> {
        let seminar = self.seminar(seminar_id).await?;
        let already_applied = self.store.application_exists(actor.user_id, seminar_id).await?;
        let now = self.clock.now();

        if let Err(e) = check_apply(&seminar, already_applied, actor, now) {
            log_application_rejected(seminar_id, actor.user_id, &e.to_string());
            return Err(e);
        }

        let application = Application {
            id: Uuid::new_v4(),
            user_id: actor.user_id,
            seminar_id,
            applied_at: now,
        };

        let application = self.store.insert_application(application).await.map_err(|e| {
            log_application_rejected(seminar_id, actor.user_id, &e.to_string());
            e
        })?;

        log_application_action(application.id, seminar_id, "apply", actor.user_id);
        Ok(application)
    }

    /// Withdraw one of the actor's applications
    pub async fn cancel(&self, actor: &Actor, application_id: Uuid) -> Result<()> {
        let application = self
            .store
            .find_application(application_id)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("Application", application_id))?;

        // Ownership is decided before the seminar is even loaded
        if application.user_id != actor.user_id {
            return Err(SeminarHubError::NotOwner { application_id });
        }

        let seminar = self.seminar(application.seminar_id).await?;
        let now = self.clock.now();

        if let Err(e) = check_cancel(&application, &seminar, actor, now) {
            log_application_rejected(seminar.id, actor.user_id, &e.to_string());
            return Err(e);
        }

        if !self.store.delete_application(application_id).await? {
            return Err(SeminarHubError::not_found("Application", application_id));
        }

        log_application_action(application_id, seminar.id, "cancel", actor.user_id);
        Ok(())
    }

    /// The actor's applications with their seminars, newest first
    pub async fn list_for_user(&self, actor: &Actor) -> Result<Vec<ApplicationView>> {
        let applications = self.store.list_applications_for_user(actor.user_id).await?;
        let now = self.clock.now();

        let seminars = try_join_all(
            applications
                .iter()
                .map(|application| self.store.find_seminar(application.seminar_id)),
        )
        .await?;

        let views = applications
            .into_iter()
            .zip(seminars)
            .filter_map(|(application, seminar)| {
                // A seminar deleted mid-listing takes its applications with it
                let seminar = seminar?;
                let status = eligibility::status(&seminar, now);
                Some(ApplicationView {
                    application,
                    can_cancel: status.can_cancel,
                    status,
                    seminar,
                })
            })
            .collect::<Vec<_>>();

        debug!(user_id = %actor.user_id, count = views.len(), "Listed applications for user");
        Ok(views)
    }

    /// Roster of a seminar's applications, newest first. Admin only.
    pub async fn list_for_seminar(&self, actor: &Actor, seminar_id: Uuid) -> Result<Vec<Application>> {
        policy::require_manage_applications(actor)?;
        self.seminar(seminar_id).await?;
        self.store.list_applications_for_seminar(seminar_id).await
    }

    /// Roster joined with applicant user records. Admin only.
    pub async fn applicants(&self, actor: &Actor, seminar_id: Uuid) -> Result<Vec<Applicant>> {
        policy::require_manage_applications(actor)?;
        self.seminar(seminar_id).await?;
        self.store.list_applicants(seminar_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};
    use crate::database::{MemoryStore, SeminarStore, UserStore};
    use crate::models::user::{Role, User};
    use crate::services::clock::FixedClock;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
    }

    async fn setup(date: DateTime<Utc>, closed: bool) -> (EnrollmentLedger<MemoryStore>, Arc<FixedClock>, MemoryStore, Seminar, Actor) {
        let store = MemoryStore::new();
        let clock = Arc::new(FixedClock::new(t0()));

        let user = store
            .create_user(User {
                id: Uuid::new_v4(),
                username: "jkim".to_string(),
                full_name: "Jisoo Kim".to_string(),
                email: None,
                department: Some("Platform".to_string()),
                role: Role::User,
                created_at: t0(),
            })
            .await
            .unwrap();

        let seminar = store
            .create_seminar(Seminar {
                id: Uuid::new_v4(),
                title: "Async Rust".to_string(),
                description: None,
                date,
                location: "Room 3".to_string(),
                is_closed: closed,
                created_by: Uuid::new_v4(),
                category_id: None,
                created_at: t0(),
            })
            .await
            .unwrap();

        let ledger = EnrollmentLedger::new(store.clone(), clock.clone());
        (ledger, clock, store, seminar, Actor::from(&user))
    }

    #[tokio::test]
    async fn test_apply_then_duplicate_is_rejected() {
        let (ledger, _clock, _store, seminar, actor) = setup(t0() + Duration::days(3), false).await;

        let application = ledger.apply(&actor, seminar.id).await.unwrap();
        assert_eq!(application.applied_at, t0());

        assert_matches!(
            ledger.apply(&actor, seminar.id).await,
            Err(SeminarHubError::AlreadyApplied { .. })
        );
    }

    #[tokio::test]
    async fn test_duplicate_takes_precedence_over_closed() {
        let (ledger, clock, _store, seminar, actor) = setup(t0() + Duration::days(3), false).await;
        ledger.apply(&actor, seminar.id).await.unwrap();

        clock.set(seminar.date);
        assert_matches!(
            ledger.apply(&actor, seminar.id).await,
            Err(SeminarHubError::AlreadyApplied { .. })
        );
    }

    #[tokio::test]
    async fn test_apply_to_closed_or_missing_seminar() {
        let (ledger, _clock, _store, seminar, actor) = setup(t0() + Duration::days(3), true).await;

        assert_matches!(
            ledger.apply(&actor, seminar.id).await,
            Err(SeminarHubError::SeminarClosed { .. })
        );
        assert_matches!(
            ledger.apply(&actor, Uuid::new_v4()).await,
            Err(SeminarHubError::NotFound { entity: "Seminar", .. })
        );
    }

    #[tokio::test]
    async fn test_cancel_by_other_user_is_not_owner() {
        let (ledger, _clock, _store, seminar, actor) = setup(t0() + Duration::days(3), false).await;
        let application = ledger.apply(&actor, seminar.id).await.unwrap();

        let intruder = Actor::new(Uuid::new_v4(), Role::Admin);
        assert_matches!(
            ledger.cancel(&intruder, application.id).await,
            Err(SeminarHubError::NotOwner { .. })
        );
    }

    #[tokio::test]
    async fn test_cancel_rules_order() {
        let (ledger, clock, store, seminar, actor) = setup(t0() + Duration::days(3), false).await;
        let application = ledger.apply(&actor, seminar.id).await.unwrap();

        // Closed but still outside the cutoff
        store.set_closed_flag(seminar.id, false, true).await.unwrap();
        assert_matches!(
            ledger.cancel(&actor, application.id).await,
            Err(SeminarHubError::SeminarAlreadyClosed { .. })
        );

        // Inside the cutoff the window error wins
        clock.set(seminar.date - Duration::hours(24));
        assert_matches!(
            ledger.cancel(&actor, application.id).await,
            Err(SeminarHubError::CancellationWindowClosed { .. })
        );
    }

    #[tokio::test]
    async fn test_cancel_then_reapply() {
        let (ledger, _clock, _store, seminar, actor) = setup(t0() + Duration::days(3), false).await;
        let application = ledger.apply(&actor, seminar.id).await.unwrap();

        ledger.cancel(&actor, application.id).await.unwrap();
        assert_matches!(
            ledger.cancel(&actor, application.id).await,
            Err(SeminarHubError::NotFound { entity: "Application", .. })
        );

        ledger.apply(&actor, seminar.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_for_user_reports_can_cancel() {
        let (ledger, clock, _store, seminar, actor) = setup(t0() + Duration::days(3), false).await;
        ledger.apply(&actor, seminar.id).await.unwrap();

        let views = ledger.list_for_user(&actor).await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].can_cancel);

        clock.advance(Duration::days(2) + Duration::hours(1));
        let views = ledger.list_for_user(&actor).await.unwrap();
        assert!(!views[0].can_cancel);
        assert!(views[0].status.can_apply);
    }

    #[tokio::test]
    async fn test_rosters_are_admin_only() {
        let (ledger, _clock, _store, seminar, actor) = setup(t0() + Duration::days(3), false).await;
        ledger.apply(&actor, seminar.id).await.unwrap();

        assert_matches!(
            ledger.list_for_seminar(&actor, seminar.id).await,
            Err(SeminarHubError::Forbidden(_))
        );

        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let roster = ledger.applicants(&admin, seminar.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].user.username, "jkim");
    }
}
