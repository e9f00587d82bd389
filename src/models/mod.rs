//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod seminar;
pub mod application;
pub mod category;
pub mod attachment;
pub mod dashboard;

// Re-export commonly used models
pub use user::{User, Role, Actor, CreateUserRequest};
pub use seminar::{Seminar, SeminarRequest, SeminarFilter, SeminarStatus, SeminarView, LifecycleState};
pub use application::{Application, Applicant, ApplicationView};
pub use category::{Category, CategoryRequest};
pub use attachment::{FileAttachment, AttachmentContent, UploadedFile};
pub use dashboard::{DashboardStats, MonthlySeminarCount, CategorySeminarCount, RecentSeminar, RecentApplication, RecentActivities};
