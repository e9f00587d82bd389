//! Seminar application model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::models::seminar::{Seminar, SeminarStatus};
use crate::models::user::User;

/// A user's enrollment in a seminar. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub seminar_id: Uuid,
    pub applied_at: DateTime<Utc>,
}

/// Roster entry for a seminar's applicant list
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Applicant {
    pub application_id: Uuid,
    pub applied_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub user: User,
}

/// An application together with the seminar it targets and its current status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationView {
    pub application: Application,
    pub seminar: Seminar,
    pub status: SeminarStatus,
    pub can_cancel: bool,
}
