//! Services module
//!
//! This module contains the business logic: the clock, the eligibility
//! engine and authorization policy (both pure), and the services built on
//! top of them.

pub mod attachment;
pub mod category;
pub mod clock;
pub mod dashboard;
pub mod eligibility;
pub mod enrollment;
pub mod lifecycle;
pub mod policy;
pub mod user;

// Re-export commonly used services
pub use attachment::AttachmentService;
pub use category::CategoryService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::DashboardService;
pub use enrollment::EnrollmentLedger;
pub use lifecycle::SeminarLifecycle;
pub use user::UserService;

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::Store;

/// Service factory for creating and managing all services over one store
#[derive(Clone)]
pub struct ServiceFactory<S: Store> {
    pub user_service: UserService<S>,
    pub lifecycle: SeminarLifecycle<S>,
    pub enrollment: EnrollmentLedger<S>,
    pub category_service: CategoryService<S>,
    pub attachment_service: AttachmentService<S>,
    pub dashboard_service: DashboardService<S>,
}

impl<S: Store> ServiceFactory<S> {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(store: S, clock: Arc<dyn Clock>, settings: &Settings) -> Self {
        Self {
            user_service: UserService::new(store.clone(), clock.clone()),
            lifecycle: SeminarLifecycle::new(store.clone(), clock.clone()),
            enrollment: EnrollmentLedger::new(store.clone(), clock.clone()),
            category_service: CategoryService::new(store.clone(), clock.clone()),
            attachment_service: AttachmentService::new(
                store.clone(),
                clock.clone(),
                settings.features.max_attachment_bytes,
            ),
            dashboard_service: DashboardService::new(store, clock),
        }
    }
}
