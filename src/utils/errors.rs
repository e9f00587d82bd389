//! Error handling for SeminarHub
//!
//! This module defines the error taxonomy returned by every core operation.
//! The presentation layer maps [`ErrorKind`] to its own status codes; nothing
//! HTTP-specific lives here.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for SeminarHub operations
#[derive(Error, Debug)]
pub enum SeminarHubError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("User {user_id} has already applied to seminar {seminar_id}")]
    AlreadyApplied { user_id: Uuid, seminar_id: Uuid },

    #[error("Seminar {seminar_id} is closed for applications")]
    SeminarClosed { seminar_id: Uuid },

    #[error("Seminar {seminar_id} is already closed; its applications can no longer be cancelled")]
    SeminarAlreadyClosed { seminar_id: Uuid },

    #[error("Seminar {seminar_id} is already closed")]
    AlreadyClosed { seminar_id: Uuid },

    #[error("Seminar {seminar_id} is not closed")]
    NotClosed { seminar_id: Uuid },

    #[error("Seminar {seminar_id} has already taken place")]
    AlreadyExpired { seminar_id: Uuid },

    #[error("Cancellation window for seminar {seminar_id} closed 24 hours before its start")]
    CancellationWindowClosed { seminar_id: Uuid },

    #[error("Application {application_id} does not belong to the requesting user")]
    NotOwner { application_id: Uuid },

    #[error("Category name already exists: {0}")]
    DuplicateName(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Stable classification of [`SeminarHubError`] for callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    AlreadyApplied,
    SeminarClosed,
    SeminarAlreadyClosed,
    AlreadyClosed,
    NotClosed,
    AlreadyExpired,
    CancellationWindowClosed,
    NotOwner,
    DuplicateName,
    Unavailable,
    InvalidInput,
    Config,
}

/// Result type alias for SeminarHub operations
pub type Result<T> = std::result::Result<T, SeminarHubError>;

impl From<sqlx::Error> for SeminarHubError {
    fn from(error: sqlx::Error) -> Self {
        SeminarHubError::Unavailable(error.to_string())
    }
}

impl From<config::ConfigError> for SeminarHubError {
    fn from(error: config::ConfigError) -> Self {
        SeminarHubError::Config(error.to_string())
    }
}

impl SeminarHubError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        SeminarHubError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Get the caller-facing kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeminarHubError::NotFound { .. } => ErrorKind::NotFound,
            SeminarHubError::Forbidden(_) => ErrorKind::Forbidden,
            SeminarHubError::AlreadyApplied { .. } => ErrorKind::AlreadyApplied,
            SeminarHubError::SeminarClosed { .. } => ErrorKind::SeminarClosed,
            SeminarHubError::SeminarAlreadyClosed { .. } => ErrorKind::SeminarAlreadyClosed,
            SeminarHubError::AlreadyClosed { .. } => ErrorKind::AlreadyClosed,
            SeminarHubError::NotClosed { .. } => ErrorKind::NotClosed,
            SeminarHubError::AlreadyExpired { .. } => ErrorKind::AlreadyExpired,
            SeminarHubError::CancellationWindowClosed { .. } => ErrorKind::CancellationWindowClosed,
            SeminarHubError::NotOwner { .. } => ErrorKind::NotOwner,
            SeminarHubError::DuplicateName(_) => ErrorKind::DuplicateName,
            SeminarHubError::Unavailable(_) => ErrorKind::Unavailable,
            SeminarHubError::Migration(_) => ErrorKind::Unavailable,
            SeminarHubError::InvalidInput(_) => ErrorKind::InvalidInput,
            SeminarHubError::Config(_) => ErrorKind::Config,
        }
    }

    /// Check if the caller may retry the operation later
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unavailable)
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SeminarHubError::Unavailable(_) => ErrorSeverity::Error,
            SeminarHubError::Migration(_) => ErrorSeverity::Critical,
            SeminarHubError::Config(_) => ErrorSeverity::Critical,
            SeminarHubError::Forbidden(_) => ErrorSeverity::Warning,
            SeminarHubError::NotOwner { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
