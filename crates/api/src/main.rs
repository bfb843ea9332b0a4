use anyhow::{Context, Result};
use api::handler::AppRouter;
use dotenv::dotenv;
use email::service::{EmailService, EmailWorker};
use shared::{
    config::{Config, ConnectionManager},
    service::MailQueue,
    state::AppState,
    utils::{Telemetry, init_logger},
};
use std::sync::Arc;
use tracing::{error, info};

const MAIL_QUEUE_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = Config::init().context("Failed to load configuration")?;

    let mut telemetry = Telemetry::new("parkspot-api", config.otel_endpoint.clone());

    let logger_provider = telemetry.init_logger()?;
    let _meter_provider = telemetry.init_meter()?;
    let _tracer_provider = telemetry.init_tracer()?;

    init_logger(logger_provider, "api", is_dev, is_enable_file);

    let pool = ConnectionManager::new_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    if config.run_migrations {
        ConnectionManager::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("✅ Migrations applied");
    }

    let (queue, receiver) = MailQueue::channel(MAIL_QUEUE_CAPACITY);
    let mailer = EmailService::new(&config.email_config).context("Failed to build mailer")?;
    tokio::spawn(EmailWorker::new(Arc::new(mailer), receiver).run());

    let state = AppState::new(pool, &config, Arc::new(queue))
        .await
        .context("Failed to create AppState")?;

    if let Some(seed) = &config.admin_seed
        && let Err(e) = state
            .di_container
            .user_service
            .command
            .ensure_admin(seed)
            .await
    {
        error!("❌ Failed to seed admin account {}: {e}", seed.email);
    }

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    info!("Shutting down servers...");

    telemetry.shutdown()?;

    Ok(())
}
