//! Eligibility engine
//!
//! Pure functions of a seminar's date, its closed flag and the current
//! instant. Nothing here touches storage, and the result is never persisted:
//! every read recomputes it.

use chrono::{DateTime, Duration, Utc};
use crate::models::seminar::{LifecycleState, Seminar, SeminarStatus};

/// How long before the start an application can still be cancelled
pub const CANCELLATION_CUTOFF_HOURS: i64 = 24;

pub fn cancellation_cutoff() -> Duration {
    Duration::hours(CANCELLATION_CUTOFF_HOURS)
}

/// The seminar has started (or is over)
pub fn is_expired(seminar: &Seminar, now: DateTime<Utc>) -> bool {
    now >= seminar.date
}

/// Administrator flag or expiry
pub fn effective_closed(seminar: &Seminar, now: DateTime<Utc>) -> bool {
    seminar.is_closed || is_expired(seminar, now)
}

/// Strictly before `date - 24h`; the cutoff instant itself is already too late.
/// Independent of the closed flag.
pub fn cancellation_allowed(seminar: &Seminar, now: DateTime<Utc>) -> bool {
    now < seminar.date - cancellation_cutoff()
}

pub fn application_allowed(seminar: &Seminar, now: DateTime<Utc>) -> bool {
    !effective_closed(seminar, now)
}

/// A held application may be withdrawn
pub fn can_cancel(seminar: &Seminar, now: DateTime<Utc>) -> bool {
    cancellation_allowed(seminar, now) && !effective_closed(seminar, now)
}

/// Expiry wins over the administrator flag
pub fn lifecycle_state(seminar: &Seminar, now: DateTime<Utc>) -> LifecycleState {
    if is_expired(seminar, now) {
        LifecycleState::Expired
    } else if seminar.is_closed {
        LifecycleState::Closed
    } else {
        LifecycleState::Open
    }
}

pub fn status(seminar: &Seminar, now: DateTime<Utc>) -> SeminarStatus {
    SeminarStatus {
        state: lifecycle_state(seminar, now),
        is_expired: is_expired(seminar, now),
        is_closed: effective_closed(seminar, now),
        can_apply: application_allowed(seminar, now),
        can_cancel: can_cancel(seminar, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn seminar(date: DateTime<Utc>, is_closed: bool) -> Seminar {
        Seminar {
            id: Uuid::new_v4(),
            title: "Rust in Production".to_string(),
            description: None,
            date,
            location: "Room 401".to_string(),
            is_closed,
            created_by: Uuid::new_v4(),
            category_id: None,
            created_at: date - Duration::days(30),
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let s = seminar(start(), false);
        assert!(!is_expired(&s, start() - Duration::seconds(1)));
        assert!(is_expired(&s, start()));
        assert!(effective_closed(&s, start()));
    }

    #[test]
    fn test_cancellation_cutoff_instant_is_disallowed() {
        let s = seminar(start(), false);
        let cutoff = start() - Duration::hours(24);
        assert!(cancellation_allowed(&s, cutoff - Duration::milliseconds(1)));
        assert!(!cancellation_allowed(&s, cutoff));
        assert!(!cancellation_allowed(&s, cutoff + Duration::hours(1)));
    }

    #[test]
    fn test_cancellation_window_ignores_closed_flag() {
        let s = seminar(start(), true);
        let now = start() - Duration::days(3);
        assert!(cancellation_allowed(&s, now));
        assert!(!can_cancel(&s, now));
    }

    #[test]
    fn test_lifecycle_states() {
        let open = seminar(start(), false);
        let closed = seminar(start(), true);
        let before = start() - Duration::days(1);

        assert_eq!(lifecycle_state(&open, before), LifecycleState::Open);
        assert_eq!(lifecycle_state(&closed, before), LifecycleState::Closed);
        assert_eq!(lifecycle_state(&open, start()), LifecycleState::Expired);
        assert_eq!(lifecycle_state(&closed, start() + Duration::days(1)), LifecycleState::Expired);
    }

    #[test]
    fn test_status_of_open_seminar_inside_cutoff() {
        let s = seminar(start(), false);
        let st = status(&s, start() - Duration::hours(2));

        assert_eq!(st.state, LifecycleState::Open);
        assert!(!st.is_expired);
        assert!(!st.is_closed);
        assert!(st.can_apply);
        assert!(!st.can_cancel);
    }
}
