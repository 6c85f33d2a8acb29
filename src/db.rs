use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

pub type DbPool = PgPool;

/// Create the process-wide connection pool. Connects eagerly so a bad
/// `DATABASE_URL` surfaces at startup rather than on the first request.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    tracing::info!(max_connections, "database connection pool established");
    Ok(pool)
}

/// Apply the SQL migrations embedded from `migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Wait for in-flight connections to be returned, then close the pool.
pub async fn close_pool(pool: DbPool) {
    pool.close().await;
    tracing::info!("database connection pool closed");
}
