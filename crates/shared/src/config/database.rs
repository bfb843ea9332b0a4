use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::info;

pub type ConnectionPool = Pool<Postgres>;

pub struct ConnectionManager;

impl ConnectionManager {
    pub async fn new_pool(connection_string: &str) -> anyhow::Result<ConnectionPool> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await
            .map_err(|err| anyhow::anyhow!("Failed to create database connection pool: {}", err))?;

        Ok(pool)
    }

    /// Builds a pool that only opens connections on first use.
    pub fn new_lazy_pool(connection_string: &str) -> anyhow::Result<ConnectionPool> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_lazy(connection_string)
            .map_err(|err| anyhow::anyhow!("Invalid database connection string: {}", err))?;

        Ok(pool)
    }

    pub async fn run_migrations(pool: &ConnectionPool) -> anyhow::Result<()> {
        info!("Running database migrations");

        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|err| anyhow::anyhow!("Failed to run database migrations: {}", err))?;

        info!("Database migrations completed");
        Ok(())
    }
}
