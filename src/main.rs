//! SeminarHub
//!
//! Main application entry point: loads settings, connects to PostgreSQL,
//! applies migrations, optionally seeds sample data and keeps the service
//! graph alive until interrupted.

use std::sync::Arc;
use anyhow::Context;
use tracing::{info, warn};

use SeminarHub::{
    config::Settings,
    database::{create_pool, run_migrations, seed::seed_sample_data, DatabaseService},
    services::{Clock, ServiceFactory, SystemClock},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load settings")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", SeminarHub::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    if settings.database.run_migrations {
        run_migrations(&db_pool).await?;
    } else {
        warn!("Skipping database migrations");
    }

    let database_service = DatabaseService::new(db_pool);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if settings.features.seed_sample_data {
        let report = seed_sample_data(&database_service, clock.now()).await?;
        info!(
            users = report.users,
            seminars = report.seminars,
            applications = report.applications,
            "Sample data ready"
        );
    }

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(database_service.clone(), clock, &settings);

    let categories = services.category_service.list_active().await?;
    info!(active_categories = categories.len(), "SeminarHub is ready");

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;

    info!("SeminarHub has been shut down.");

    Ok(())
}
