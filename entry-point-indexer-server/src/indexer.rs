use crate::settings::Settings;
use entry_point_indexer_logic::{
    explorer::Client,
    indexer::{scheduler::run_periodically, InternalTxBackfiller, SyncOrchestrator},
    repository::writer::Writer,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawns the enabled background loops. They stop once `shutdown` is cancelled.
pub fn run(
    settings: Settings,
    db_connection: Arc<DatabaseConnection>,
    shutdown: CancellationToken,
) -> Result<Vec<JoinHandle<()>>, anyhow::Error> {
    let indexer_settings = settings.indexer;
    let client = Client::new(indexer_settings.explorer.clone())?;
    let mut handles = Vec::new();

    if indexer_settings.sync.enabled {
        let writer = Writer::new(db_connection.clone(), indexer_settings.writer.chunk_size);
        let interval = indexer_settings.sync.interval;
        let orchestrator = SyncOrchestrator::new(
            db_connection.clone(),
            client.clone(),
            writer,
            indexer_settings.sync.clone(),
        );
        handles.push(tokio::spawn(run_periodically(
            "sync",
            interval,
            shutdown.clone(),
            move || {
                let orchestrator = orchestrator.clone();
                async move { orchestrator.run_cycle().await }
            },
        )));
    } else {
        tracing::warn!("entry point sync is disabled in settings");
    }

    if indexer_settings.backfill.enabled {
        let backfiller = InternalTxBackfiller::new(db_connection.clone(), client);
        handles.push(tokio::spawn(run_periodically(
            "internal_txs_backfill",
            indexer_settings.backfill.interval,
            shutdown.clone(),
            move || {
                let backfiller = backfiller.clone();
                async move {
                    backfiller.run_tick().await;
                }
            },
        )));
    } else {
        tracing::warn!("internal txs backfill is disabled in settings");
    }

    Ok(handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn disabled_loops_are_not_spawned() {
        let mut settings = Settings::default("postgres://localhost/entry_point".to_string());
        settings.indexer.sync.enabled = false;
        settings.indexer.backfill.enabled = false;
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let handles = run(settings, db, CancellationToken::new()).unwrap();
        assert!(handles.is_empty());
    }

    #[tokio::test]
    async fn loops_stop_on_cancellation() {
        let settings = Settings::default("postgres://localhost/entry_point".to_string());
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let handles = run(settings, db, shutdown).unwrap();
        assert_eq!(handles.len(), 2);
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
