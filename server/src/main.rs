mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::memory_store::MemoryAccountStore;
use services::pg_store::PgAccountStore;
use services::store::AccountStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env()?;
    let port = config.port;

    let accounts: Arc<dyn AccountStore> = match db::connect_configured(&config).await? {
        Some(pool) => Arc::new(PgAccountStore::new(pool)),
        None => {
            tracing::warn!("DATABASE_URL not set; accounts are kept in memory and lost on restart");
            Arc::new(MemoryAccountStore::new())
        }
    };

    let state = state::AppState::new(accounts, config);

    let app = match routes::leptos_app(state.clone()) {
        Ok(app) => app,
        Err(e) => {
            tracing::warn!(error = %e, "storefront rendering disabled; serving API only");
            routes::api_routes(state)
        }
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(%port, "storefront listening");
    axum::serve(listener, app).await?;
    Ok(())
}
