//! PostgreSQL pool for the account store.
//!
//! `connect` opens the pool with the configured size and applies the
//! `users`/`sessions` migrations before any request is served.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::ServerConfig;

/// Open a pool against `database_url` and bring the schema up to date.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;
    tracing::info!(max_connections, "account database ready");

    Ok(pool)
}

/// Pool for the configured database, or `None` when `DATABASE_URL` is unset.
///
/// # Errors
///
/// See [`connect`].
pub async fn connect_configured(config: &ServerConfig) -> Result<Option<PgPool>, sqlx::Error> {
    match config.database_url.as_deref() {
        Some(url) => connect(url, config.db_max_connections).await.map(Some),
        None => Ok(None),
    }
}
