//! Property tests for the eligibility engine and the enrollment ledger
//! invariants.

mod helpers;

use chrono::{DateTime, Duration, Utc};
use helpers::{t0, TestContext};
use proptest::prelude::*;
use uuid::Uuid;
use SeminarHub::database::ApplicationStore;
use SeminarHub::models::{LifecycleState, Role, Seminar};
use SeminarHub::services::eligibility;
use SeminarHub::SeminarHubError;

fn seminar_at(date: DateTime<Utc>, is_closed: bool) -> Seminar {
    Seminar {
        id: Uuid::new_v4(),
        title: "Property".to_string(),
        description: None,
        date,
        location: "Anywhere".to_string(),
        is_closed,
        created_by: Uuid::new_v4(),
        category_id: None,
        created_at: t0(),
    }
}

/// Offsets in seconds around the seminar date, dense near the 24h cutoff
fn arb_offset() -> impl Strategy<Value = i64> {
    prop_oneof![
        -10 * 86_400i64..10 * 86_400,
        -86_400 - 5i64..-86_400 + 5,
        -5i64..5,
    ]
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Apply,
    Cancel,
    Advance(i64),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Apply),
        Just(Step::Cancel),
        (0i64..36).prop_map(Step::Advance),
    ]
}

proptest! {
    #[test]
    fn expired_implies_effectively_closed(offset in arb_offset(), flag in any::<bool>()) {
        let seminar = seminar_at(t0(), flag);
        let now = t0() + Duration::seconds(offset);

        if now >= seminar.date {
            prop_assert!(eligibility::effective_closed(&seminar, now));
            prop_assert!(!eligibility::application_allowed(&seminar, now));
            prop_assert_eq!(eligibility::lifecycle_state(&seminar, now), LifecycleState::Expired);
        }
        prop_assert_eq!(eligibility::effective_closed(&seminar, now), flag || now >= seminar.date);
    }

    #[test]
    fn cancellation_disallowed_exactly_from_the_cutoff(offset in arb_offset(), flag in any::<bool>()) {
        let seminar = seminar_at(t0(), flag);
        let now = t0() + Duration::seconds(offset);

        prop_assert_eq!(
            eligibility::cancellation_allowed(&seminar, now),
            now < seminar.date - Duration::hours(24)
        );
    }

    #[test]
    fn status_is_consistent(offset in arb_offset(), flag in any::<bool>()) {
        let seminar = seminar_at(t0(), flag);
        let now = t0() + Duration::seconds(offset);
        let status = eligibility::status(&seminar, now);

        prop_assert_eq!(status.can_apply, !status.is_closed);
        prop_assert!(!status.can_cancel || status.can_apply);
        prop_assert_eq!(status.is_expired, status.state == LifecycleState::Expired);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn at_most_one_application_per_pair(steps in proptest::collection::vec(arb_step(), 1..24)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let ctx = TestContext::new().await;
            let seminar = ctx.create_seminar(t0() + Duration::hours(72)).await;
            let user = ctx.create_user(Role::User).await;
            let ledger = &ctx.services.enrollment;
            let mut held = None;

            for step in steps {
                let now = ctx.clock_now();
                match step {
                    Step::Apply => {
                        let allowed = eligibility::application_allowed(&seminar, now);
                        match ledger.apply(&user, seminar.id).await {
                            Ok(application) => {
                                assert!(held.is_none() && allowed);
                                held = Some(application.id);
                            }
                            Err(SeminarHubError::AlreadyApplied { .. }) => assert!(held.is_some()),
                            Err(SeminarHubError::SeminarClosed { .. }) => assert!(held.is_none() && !allowed),
                            Err(e) => panic!("unexpected apply error: {}", e),
                        }
                    }
                    Step::Cancel => {
                        if let Some(id) = held {
                            match ledger.cancel(&user, id).await {
                                Ok(()) => {
                                    assert!(eligibility::can_cancel(&seminar, now));
                                    held = None;
                                }
                                Err(SeminarHubError::CancellationWindowClosed { .. })
                                | Err(SeminarHubError::SeminarAlreadyClosed { .. }) => {}
                                Err(e) => panic!("unexpected cancel error: {}", e),
                            }
                        }
                    }
                    Step::Advance(hours) => ctx.advance(Duration::hours(hours)),
                }

                let count = ctx.store.count_applications_for_seminar(seminar.id).await.unwrap();
                assert!(count <= 1);
                assert_eq!(count == 1, held.is_some());
            }
        });
    }
}
