//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Startup failures are `anyhow` errors; request errors are rendered by
//! the auth and blog crates.

use std::net::SocketAddr;
use std::sync::Arc;

use api::{AppConfig, Storage, build_router, with_http_layers};
use auth::{InMemoryUserRepository, PgUserRepository};
use axum::Router;
use blog::{InMemoryEntryRepository, PgEntryRepository};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,blog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let auth_config = Arc::new(config.auth.clone());
    let blog_config = Arc::new(config.blog.clone());

    let router: Router = match &config.storage {
        Storage::Postgres(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            build_router(
                Arc::new(PgUserRepository::new(pool.clone())),
                Arc::new(PgEntryRepository::new(pool)),
                auth_config.clone(),
                blog_config,
            )
        }
        Storage::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            build_router(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryEntryRepository::new()),
                auth_config.clone(),
                blog_config,
            )
        }
    };

    let app = with_http_layers(
        router,
        &config.frontend_origins,
        &auth_config.csrf_header_name,
    );

    // Start server
    let addr = config.bind_addr;
    tracing::info!(
        site_url = %config.blog.site_url,
        "Listening on {}",
        addr
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
