use std::net::SocketAddr;

use clinicdesk::api::build_router;
use clinicdesk::bootstrap;
use clinicdesk::config::Config;
use clinicdesk::database::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clinicdesk=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    if config.admin_password_hash.is_empty() {
        tracing::warn!("ADMIN_PASSWORD_HASH is not set; admin login is disabled");
    }

    // Initialize database connection
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    db.run_migrations().await?;
    tracing::info!("Database migrations applied");

    // Build application state and router
    let state = bootstrap::build_app_state(db, &config);
    let app = build_router(state, &config.cors_origin);

    // Start server
    let address = config.server_address();
    tracing::info!("listening on {}", address);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
