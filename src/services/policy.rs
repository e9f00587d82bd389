//! Authorization policy
//!
//! Every permission decision for seminars, applications, categories and the
//! admin dashboard lives here. The `can_*` functions are pure; the
//! `require_*` variants turn a denial into [`SeminarHubError::Forbidden`] and
//! log it.

use crate::models::seminar::Seminar;
use crate::models::user::{Actor, Role};
use crate::utils::errors::{Result, SeminarHubError};
use crate::utils::logging::log_authorization_denied;

/// Operations gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CreateSeminar,
    MutateSeminar,
    ManageApplications,
    ManageCategories,
    ViewDashboard,
}

impl Permission {
    fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateSeminar => "create_seminar",
            Permission::MutateSeminar => "mutate_seminar",
            Permission::ManageApplications => "manage_applications",
            Permission::ManageCategories => "manage_categories",
            Permission::ViewDashboard => "view_dashboard",
        }
    }
}

/// Creator or any administrator. Covers update, delete, close, reopen and
/// attachment changes.
pub fn can_mutate_seminar(actor: &Actor, seminar: &Seminar) -> bool {
    actor.role == Role::Admin || actor.user_id == seminar.created_by
}

/// Rosters and aggregate views
pub fn can_manage_applications(actor: &Actor) -> bool {
    actor.is_admin()
}

/// Any authenticated actor may apply; holding an [`Actor`] means authenticated
pub fn can_apply(_actor: &Actor, _seminar: &Seminar) -> bool {
    true
}

pub fn can_create_seminar(actor: &Actor) -> bool {
    actor.is_admin()
}

pub fn can_manage_categories(actor: &Actor) -> bool {
    actor.is_admin()
}

pub fn can_view_dashboard(actor: &Actor) -> bool {
    actor.is_admin()
}

fn deny(actor: &Actor, permission: Permission, seminar: Option<&Seminar>) -> SeminarHubError {
    log_authorization_denied(actor.user_id, permission.as_str(), seminar.map(|s| s.id));
    SeminarHubError::Forbidden(format!(
        "User {} lacks permission: {}",
        actor.user_id,
        permission.as_str()
    ))
}

pub fn require_mutate_seminar(actor: &Actor, seminar: &Seminar) -> Result<()> {
    if can_mutate_seminar(actor, seminar) {
        Ok(())
    } else {
        Err(deny(actor, Permission::MutateSeminar, Some(seminar)))
    }
}

pub fn require_create_seminar(actor: &Actor) -> Result<()> {
    if can_create_seminar(actor) {
        Ok(())
    } else {
        Err(deny(actor, Permission::CreateSeminar, None))
    }
}

pub fn require_manage_applications(actor: &Actor) -> Result<()> {
    if can_manage_applications(actor) {
        Ok(())
    } else {
        Err(deny(actor, Permission::ManageApplications, None))
    }
}

pub fn require_manage_categories(actor: &Actor) -> Result<()> {
    if can_manage_categories(actor) {
        Ok(())
    } else {
        Err(deny(actor, Permission::ManageCategories, None))
    }
}

pub fn require_view_dashboard(actor: &Actor) -> Result<()> {
    if can_view_dashboard(actor) {
        Ok(())
    } else {
        Err(deny(actor, Permission::ViewDashboard, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use uuid::Uuid;

    fn seminar_by(creator: Uuid) -> Seminar {
        Seminar {
            id: Uuid::new_v4(),
            title: "Observability 101".to_string(),
            description: None,
            date: Utc::now(),
            location: "Hall B".to_string(),
            is_closed: false,
            created_by: creator,
            category_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_creator_and_admins_may_mutate() {
        let creator = Actor::new(Uuid::new_v4(), Role::User);
        let other_admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let stranger = Actor::new(Uuid::new_v4(), Role::User);
        let seminar = seminar_by(creator.user_id);

        assert!(can_mutate_seminar(&creator, &seminar));
        assert!(can_mutate_seminar(&other_admin, &seminar));
        assert!(!can_mutate_seminar(&stranger, &seminar));
    }

    #[test]
    fn test_admin_only_permissions() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let user = Actor::new(Uuid::new_v4(), Role::User);

        assert!(require_create_seminar(&admin).is_ok());
        assert!(require_manage_applications(&admin).is_ok());
        assert!(require_manage_categories(&admin).is_ok());
        assert!(require_view_dashboard(&admin).is_ok());

        assert_matches!(require_create_seminar(&user), Err(SeminarHubError::Forbidden(_)));
        assert_matches!(require_manage_applications(&user), Err(SeminarHubError::Forbidden(_)));
        assert_matches!(require_manage_categories(&user), Err(SeminarHubError::Forbidden(_)));
        assert_matches!(require_view_dashboard(&user), Err(SeminarHubError::Forbidden(_)));
    }

    #[test]
    fn test_any_actor_may_apply() {
        let user = Actor::new(Uuid::new_v4(), Role::User);
        assert!(can_apply(&user, &seminar_by(Uuid::new_v4())));
    }
}
