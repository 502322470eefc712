//! Application entry point for safiri-guard.
//!
//! Initializes all components and starts the HTTP server.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::info;

use safiri_guard::config::Config;
use safiri_guard::logging::setup_logging;
use safiri_guard::notifier::Notifier;
use safiri_guard::notifier::sms_notifier::SmsNotifier;
use safiri_guard::repository::Repository;
use safiri_guard::server;
use safiri_guard::service::Services;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config()?;

    let db = setup_database(&config, init_start).await?;
    let notifier: Arc<dyn Notifier> = Arc::new(SmsNotifier::new(&config));
    let services = Arc::new(Services::new(db, notifier));

    run(&config, services, init_start).await
}

fn load_config() -> Result<Arc<Config>> {
    let mut config = Config::new();
    config.load()?;
    let config = Arc::new(config);
    setup_logging(&config)?;
    info!("Starting safiri-guard...");
    Ok(config)
}

async fn setup_database(config: &Config, init_start: Instant) -> Result<Arc<Repository>> {
    debug!("Setting up Repository...");
    let db = Arc::new(Repository::new(&config.db_url, &config.db_path).await?);

    info!("Running database migrations...");
    db.run_migrations().await?;
    info!(
        "Database setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );

    Ok(db)
}

async fn run(config: &Config, services: Arc<Services>, init_start: Instant) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        "safiri-guard is up on {addr} in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    axum::serve(listener, server::router(services))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Ctrl+C received, shutting down.");
}
