use crate::{
    explorer::Client,
    indexer::{
        calldata::{decode_user_operation_infos, is_bundle_input},
        cursor::next_from_block,
        events::{
            decode_account_deployed_events, decode_revert_reason_events,
            decode_user_operation_events,
        },
    },
    repository::{self, writer::Writer},
    settings::SyncSettings,
    types::{
        entry_point::{EntryPoint, ScanProvider, SupportedChain},
        transaction::EntryPointTx,
    },
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::instrument;

/// Rows written by one sync unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub logs: usize,
    pub account_deployed: usize,
    pub revert_reasons: usize,
    pub txs: usize,
    pub user_operation_infos: usize,
}

/// Pulls logs and bundle transactions of every configured entry point from the explorers.
///
/// A cycle visits every (entry point, chain) pair sequentially. A failing pair is
/// logged and does not prevent the remaining pairs from being synced.
#[derive(Clone)]
pub struct SyncOrchestrator {
    db: Arc<DatabaseConnection>,
    client: Client,
    writer: Writer,
    settings: SyncSettings,
}

impl SyncOrchestrator {
    pub fn new(
        db: Arc<DatabaseConnection>,
        client: Client,
        writer: Writer,
        settings: SyncSettings,
    ) -> Self {
        Self {
            db,
            client,
            writer,
            settings,
        }
    }

    #[instrument(name = "sync_cycle", skip_all, level = "info")]
    pub async fn run_cycle(&self) {
        let entry_points = match repository::entry_point::load_entry_points(&self.db).await {
            Ok(entry_points) => entry_points,
            Err(err) => {
                tracing::error!(error = ?err, "failed to load entry points");
                return;
            }
        };
        if entry_points.is_empty() {
            tracing::info!("no entry points configured, skipping cycle");
            return;
        }
        let providers = match repository::entry_point::load_scan_providers(&self.db).await {
            Ok(providers) => providers,
            Err(err) => {
                tracing::error!(error = ?err, "failed to load scan providers");
                return;
            }
        };
        if providers.is_empty() {
            tracing::info!("no scan providers configured, skipping cycle");
            return;
        }

        for entry_point in &entry_points {
            for chain in &entry_point.support_chains {
                let Some(provider) = providers.get(&chain.chain_id) else {
                    tracing::warn!(
                        chain_id = chain.chain_id,
                        entry_point = %entry_point.address,
                        "no scan provider for chain, skipping"
                    );
                    continue;
                };
                if let Err(err) = self.sync_unit(entry_point, chain, provider).await {
                    tracing::error!(
                        chain_id = chain.chain_id,
                        entry_point = %entry_point.address,
                        error = ?err,
                        "failed to sync entry point"
                    );
                }
            }
        }
    }

    #[instrument(
        name = "sync_unit",
        skip_all,
        fields(chain_id = chain.chain_id, entry_point = %entry_point.address),
        level = "info"
    )]
    pub async fn sync_unit(
        &self,
        entry_point: &EntryPoint,
        chain: &SupportedChain,
        provider: &ScanProvider,
    ) -> Result<SyncReport, anyhow::Error> {
        let chain_id = chain.chain_id;
        let mut report = SyncReport::default();

        let persisted =
            repository::entry_point::max_log_block(&self.db, chain_id, entry_point.address).await?;
        let from_block = next_from_block(chain.start_block, persisted, self.settings.rewind_blocks);
        let logs = self
            .client
            .fetch_logs(provider, entry_point.address, from_block)
            .await;
        tracing::debug!(from_block, count = logs.len(), "fetched logs");

        let user_ops =
            decode_user_operation_events(chain_id, entry_point.user_operation_event_topic, &logs);
        let deployed =
            decode_account_deployed_events(chain_id, entry_point.account_deployed_topic, &logs);
        let reverts = decode_revert_reason_events(chain_id, entry_point.revert_reason_topic, &logs);
        report.logs = self.writer.upsert_logs(user_ops).await;
        report.account_deployed = self.writer.upsert_account_deployed_logs(deployed).await;
        report.revert_reasons = self.writer.upsert_revert_reason_logs(reverts).await;

        let persisted =
            repository::entry_point::max_tx_block(&self.db, chain_id, entry_point.address).await?;
        let from_block = next_from_block(chain.start_block, persisted, self.settings.rewind_blocks);
        let txs: Vec<_> = self
            .client
            .fetch_txs(provider, entry_point.address, from_block)
            .await
            .into_iter()
            .filter(|tx| is_bundle_input(&tx.input))
            .map(|tx| EntryPointTx {
                chain_id,
                entry_point: entry_point.address,
                tx,
            })
            .collect();
        tracing::debug!(from_block, count = txs.len(), "fetched bundle txs");

        let infos = decode_user_operation_infos(&txs);
        report.user_operation_infos = self.writer.upsert_user_operation_infos(infos).await;
        report.txs = self.writer.upsert_txs(txs).await;

        tracing::info!(?report, "entry point synced");
        Ok(report)
    }
}
