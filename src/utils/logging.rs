//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the SeminarHub service.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use crate::config::LoggingConfig;
use crate::utils::errors::{Result, SeminarHubError};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for the
/// lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(non_blocking);

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout));

    let initialized = if config.json {
        registry.with(file_layer.json()).try_init()
    } else {
        registry.with(file_layer).try_init()
    };
    initialized.map_err(|e| SeminarHubError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log seminar lifecycle actions
pub fn log_seminar_action(seminar_id: Uuid, action: &str, actor_id: Uuid, details: Option<&str>) {
    info!(
        seminar_id = %seminar_id,
        action = action,
        actor_id = %actor_id,
        details = details,
        "Seminar action performed"
    );
}

/// Log enrollment ledger transitions
pub fn log_application_action(application_id: Uuid, seminar_id: Uuid, action: &str, user_id: Uuid) {
    info!(
        application_id = %application_id,
        seminar_id = %seminar_id,
        action = action,
        user_id = %user_id,
        "Application action performed"
    );
}

/// Log rejected enrollment attempts
pub fn log_application_rejected(seminar_id: Uuid, user_id: Uuid, reason: &str) {
    debug!(
        seminar_id = %seminar_id,
        user_id = %user_id,
        reason = reason,
        "Application request rejected"
    );
}

/// Log authorization denials
pub fn log_authorization_denied(actor_id: Uuid, action: &str, target: Option<Uuid>) {
    warn!(
        actor_id = %actor_id,
        action = action,
        target = ?target,
        "Authorization denied"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: Uuid, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = %admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
