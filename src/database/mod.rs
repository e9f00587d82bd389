//! Database module
//!
//! This module handles database connections, the storage traits the core
//! depends on, and their PostgreSQL and in-memory implementations.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod seed;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, create_pool, run_migrations, health_check};
pub use memory::MemoryStore;
pub use repositories::{UserRepository, SeminarRepository, ApplicationRepository, CategoryRepository, AttachmentRepository};
pub use service::DatabaseService;
pub use store::{ApplicationStore, AttachmentStore, CategoryStore, SeminarStore, Store, UserStore};
