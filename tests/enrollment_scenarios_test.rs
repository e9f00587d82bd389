//! Enrollment ledger scenarios
//!
//! End-to-end apply/cancel flows driven through the service graph with a
//! pinned clock.

mod helpers;

use assert_matches::assert_matches;
use chrono::Duration;
use helpers::{t0, TestContext};
use SeminarHub::database::ApplicationStore;
use SeminarHub::models::Role;
use SeminarHub::SeminarHubError;

#[tokio::test]
async fn test_cancel_and_reapply_around_the_cutoff() {
    let ctx = TestContext::new().await;
    let seminar = ctx.create_seminar(t0() + Duration::hours(72)).await;
    let user = ctx.create_user(Role::User).await;
    let ledger = &ctx.services.enrollment;

    // T: apply
    let first = ledger.apply(&user, seminar.id).await.unwrap();

    // T+47h: one hour before the T+48h cutoff
    ctx.set_time(t0() + Duration::hours(47));
    ledger.cancel(&user, first.id).await.unwrap();

    // T+50h: still open, so applying again works
    ctx.set_time(t0() + Duration::hours(50));
    let second = ledger.apply(&user, seminar.id).await.unwrap();
    assert_eq!(second.applied_at, t0() + Duration::hours(50));

    // ...but the cutoff has passed, so it cannot be withdrawn
    assert_matches!(
        ledger.cancel(&user, second.id).await,
        Err(SeminarHubError::CancellationWindowClosed { seminar_id }) if seminar_id == seminar.id
    );
    assert_eq!(ctx.store.count_applications_for_seminar(seminar.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_exact_cutoff_instant_rejects_cancel() {
    let ctx = TestContext::new().await;
    let seminar = ctx.create_seminar(t0() + Duration::days(2)).await;
    let user = ctx.create_user(Role::User).await;
    let application = ctx.services.enrollment.apply(&user, seminar.id).await.unwrap();

    ctx.set_time(seminar.date - Duration::hours(24));
    assert_matches!(
        ctx.services.enrollment.cancel(&user, application.id).await,
        Err(SeminarHubError::CancellationWindowClosed { .. })
    );
}

#[tokio::test]
async fn test_not_owner_checked_before_window() {
    let ctx = TestContext::new().await;
    let seminar = ctx.create_seminar(t0() + Duration::days(2)).await;
    let owner = ctx.create_user(Role::User).await;
    let other = ctx.create_user(Role::User).await;
    let application = ctx.services.enrollment.apply(&owner, seminar.id).await.unwrap();

    // Past the cutoff and expired; ownership still decides first
    ctx.set_time(seminar.date + Duration::hours(1));
    assert_matches!(
        ctx.services.enrollment.cancel(&other, application.id).await,
        Err(SeminarHubError::NotOwner { .. })
    );
}

#[tokio::test]
async fn test_closing_blocks_apply_and_reopening_restores_it() {
    let ctx = TestContext::new().await;
    let seminar = ctx.create_seminar(t0() + Duration::days(5)).await;
    let user = ctx.create_user(Role::User).await;

    ctx.services.lifecycle.close(&ctx.admin, seminar.id).await.unwrap();
    assert_matches!(
        ctx.services.enrollment.apply(&user, seminar.id).await,
        Err(SeminarHubError::SeminarClosed { .. })
    );

    ctx.services.lifecycle.reopen(&ctx.admin, seminar.id).await.unwrap();
    ctx.services.enrollment.apply(&user, seminar.id).await.unwrap();

    let view = ctx.services.lifecycle.get(&user, seminar.id).await.unwrap();
    assert!(view.user_applied);
    assert_eq!(view.application_count, 1);
}

#[tokio::test]
async fn test_expired_seminar_rejects_apply_and_reopen() {
    let ctx = TestContext::new().await;
    let seminar = ctx.create_seminar(t0() + Duration::days(1)).await;
    let user = ctx.create_user(Role::User).await;
    ctx.services.lifecycle.close(&ctx.admin, seminar.id).await.unwrap();

    ctx.advance(Duration::days(1));
    assert_matches!(
        ctx.services.enrollment.apply(&user, seminar.id).await,
        Err(SeminarHubError::SeminarClosed { .. })
    );
    assert_matches!(
        ctx.services.lifecycle.reopen(&ctx.admin, seminar.id).await,
        Err(SeminarHubError::AlreadyExpired { .. })
    );
}

#[tokio::test]
async fn test_delete_cascades_applications_and_attachments() {
    let ctx = TestContext::new().await;
    let seminar = ctx.create_seminar(t0() + Duration::days(3)).await;
    let user = ctx.create_user(Role::User).await;
    let application = ctx.services.enrollment.apply(&user, seminar.id).await.unwrap();

    ctx.services
        .attachment_service
        .upload(
            &ctx.admin,
            seminar.id,
            vec![SeminarHub::models::UploadedFile {
                file_name: "slides.pdf".to_string(),
                content_type: None,
                data: vec![1, 2, 3],
            }],
        )
        .await
        .unwrap();

    ctx.services.lifecycle.delete(&ctx.admin, seminar.id).await.unwrap();

    assert!(ctx.store.find_application(application.id).await.unwrap().is_none());
    assert!(ctx.services.enrollment.list_for_user(&user).await.unwrap().is_empty());
    assert_matches!(
        ctx.services.attachment_service.list(seminar.id).await,
        Err(SeminarHubError::NotFound { .. })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_applies_yield_exactly_one_application() {
    let ctx = TestContext::new().await;
    let seminar = ctx.create_seminar(t0() + Duration::days(3)).await;
    let user = ctx.create_user(Role::User).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ledger = ctx.services.enrollment.clone();
            let seminar_id = seminar.id;
            tokio::spawn(async move { ledger.apply(&user, seminar_id).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert_matches!(e, SeminarHubError::AlreadyApplied { .. }),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(ctx.store.count_applications_for_seminar(seminar.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_for_user_is_newest_first() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user(Role::User).await;
    let a = ctx.create_seminar(t0() + Duration::days(10)).await;
    let b = ctx.create_seminar(t0() + Duration::days(12)).await;

    ctx.services.enrollment.apply(&user, a.id).await.unwrap();
    ctx.advance(Duration::minutes(5));
    ctx.services.enrollment.apply(&user, b.id).await.unwrap();

    let views = ctx.services.enrollment.list_for_user(&user).await.unwrap();
    let order: Vec<_> = views.iter().map(|v| v.seminar.id).collect();
    assert_eq!(order, vec![b.id, a.id]);
    assert!(views.iter().all(|v| v.can_cancel));
}
