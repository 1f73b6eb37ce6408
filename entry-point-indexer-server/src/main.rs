use blockscout_service_launcher::{database, launcher::ConfigSettings};
use entry_point_indexer_server::{run_indexer, Settings};
use migration::Migrator;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const SERVICE_NAME: &str = "entry_point_indexer";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let settings = Settings::build().expect("failed to read config");

    blockscout_service_launcher::tracing::init_logs(
        SERVICE_NAME,
        &settings.tracing,
        &settings.jaeger,
    )?;

    let db_connection = database::initialize_postgres::<Migrator>(&settings.database).await?;

    let shutdown = CancellationToken::new();
    let handles = run_indexer(settings, Arc::new(db_connection), shutdown.clone())?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, stopping background tasks");
    shutdown.cancel();
    for handle in handles {
        if let Err(err) = handle.await {
            tracing::error!(error = ?err, "background task panicked");
        }
    }
    Ok(())
}
