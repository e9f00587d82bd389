//! SeminarHub
//!
//! Internal seminar registration service. Administrators publish seminars,
//! employees browse and enroll, and the library enforces the time-windowed
//! eligibility rules (registration open or closed, the 24 hour cancellation
//! cutoff, expiry) together with role-based write access.
//!
//! Transport, sessions and credentials live outside this crate: every
//! operation takes an [`Actor`](models::Actor) and returns a value or a
//! [`SeminarHubError`].

#![allow(non_snake_case)]

pub mod config;
pub mod services;
pub mod models;
pub mod database;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{SeminarHubError, ErrorKind, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, MemoryStore, Store};
pub use services::{Clock, FixedClock, ServiceFactory, SystemClock};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
