use dotenvy::dotenv;
use std::{path::Path, sync::Arc};
use teman_tani::{
    api::{self, AppState},
    config::{database, seed, settings::Settings},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Settings
    let settings = Settings::from_env()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    info!(bind_addr = %settings.bind_addr, "Settings loaded");

    // 4. Database
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Seed an empty database
    if Path::new(&settings.seed_path).exists() {
        let initial = seed::load_seed(&settings.seed_path)?;
        seed::apply_seed(&db, &initial)
            .await
            .inspect_err(|e| error!("Failed to apply seed data: {}", e))?;
    } else {
        warn!(path = %settings.seed_path, "Seed file not found, starting without initial data");
    }

    // 6. Serve the API
    let app = api::router(Arc::new(AppState::new(db)));
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    info!("Listening on http://{}", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
