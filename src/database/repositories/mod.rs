//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod seminar;
pub mod application;
pub mod category;
pub mod attachment;

// Re-export repositories
pub use user::UserRepository;
pub use seminar::SeminarRepository;
pub use application::ApplicationRepository;
pub use category::CategoryRepository;
pub use attachment::AttachmentRepository;
