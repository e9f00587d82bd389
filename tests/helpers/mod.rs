//! Test helpers module
//!
//! Shared context for integration tests: an in-memory store, a pinned clock
//! and the full service graph, plus builders for users and seminars.

#![allow(dead_code)]

use std::sync::Arc;
use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use SeminarHub::database::{MemoryStore, UserStore};
use SeminarHub::models::{Actor, Role, Seminar, SeminarRequest, User};
use SeminarHub::services::{Clock, FixedClock, ServiceFactory};
use SeminarHub::Settings;

/// Reference instant every scenario starts from
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 15, 9, 0, 0).unwrap()
}

pub struct TestContext {
    pub store: MemoryStore,
    pub clock: Arc<FixedClock>,
    pub services: ServiceFactory<MemoryStore>,
    pub admin: Actor,
}

impl TestContext {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let clock = Arc::new(FixedClock::new(t0()));
        let services = ServiceFactory::new(store.clone(), clock.clone(), &Settings::default());

        let mut ctx = Self {
            store,
            clock,
            services,
            admin: Actor::new(Uuid::nil(), Role::Admin),
        };
        ctx.admin = ctx.create_user(Role::Admin).await;
        ctx
    }

    /// Insert a user with generated personal data
    pub async fn create_user(&self, role: Role) -> Actor {
        let full_name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let id = Uuid::new_v4();

        let user = self
            .store
            .create_user(User {
                id,
                username: format!("user-{}", id.simple()),
                full_name,
                email: Some(email),
                department: Some("Engineering".to_string()),
                role,
                created_at: t0(),
            })
            .await
            .expect("Failed to create test user");

        Actor::from(&user)
    }

    /// Publish a seminar as the context admin
    pub async fn create_seminar(&self, date: DateTime<Utc>) -> Seminar {
        self.services
            .lifecycle
            .create(&self.admin, seminar_request("Zero-cost abstractions", date))
            .await
            .expect("Failed to create test seminar")
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn set_time(&self, at: DateTime<Utc>) {
        self.clock.set(at);
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

pub fn seminar_request(title: &str, date: DateTime<Utc>) -> SeminarRequest {
    SeminarRequest {
        title: title.to_string(),
        description: Some("Generated for tests".to_string()),
        date,
        location: "Conference Room 2".to_string(),
        category_id: None,
    }
}
