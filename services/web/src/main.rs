use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use web::{AppState, MIGRATOR, config::AppConfig, routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting VSafe web service");

    let config = AppConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool, &MIGRATOR).await?;

    let bind_address = config.bind_address.clone();
    let app_state = AppState::new(pool, config)?;

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("VSafe web service listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
