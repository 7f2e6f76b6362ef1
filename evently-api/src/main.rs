//! # Evently API Server
//!
//! REST backend for the Evently task/event manager:
//! - Authentication (register/login, bearer-token gate)
//! - Owner-scoped task CRUD with a denormalized per-user task counter
//! - Attendee CRUD keyed by task identifier
//! - Aggregate task statistics
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/evently \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p evently-api
//! ```

use evently_api::{
    app::{build_router, AppState},
    config::Config,
};
use evently_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evently_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        "Evently API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    migrations::ensure_database_exists(&config.database.url).await?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
