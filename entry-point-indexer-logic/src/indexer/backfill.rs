use crate::{
    explorer::{types::InternalTx, Client},
    repository::{self, internal_txs},
    types::{common::address_from_db, entry_point::ScanProvider},
};
use alloy::primitives::{Address, ChainId, TxHash};
use entity::entry_point_txs;
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;
use tracing::instrument;

/// Fills in internal call traces of stored bundle transactions.
///
/// Every tick handles at most one transaction per chain, the most recent one that has
/// no trace yet. A failed fetch stores nothing, so the transaction is retried later.
#[derive(Clone)]
pub struct InternalTxBackfiller {
    db: Arc<DatabaseConnection>,
    client: Client,
}

impl InternalTxBackfiller {
    pub fn new(db: Arc<DatabaseConnection>, client: Client) -> Self {
        Self { db, client }
    }

    /// Returns the number of transactions whose traces were stored.
    #[instrument(name = "internal_txs_backfill", skip_all, level = "debug")]
    pub async fn run_tick(&self) -> usize {
        let providers = match repository::entry_point::load_scan_providers(&self.db).await {
            Ok(providers) => providers,
            Err(err) => {
                tracing::error!(error = ?err, "failed to load scan providers");
                return 0;
            }
        };
        let mut providers: Vec<_> = providers.into_values().collect();
        providers.sort_by_key(|p| p.chain_id);

        let mut stored = 0;
        for provider in &providers {
            match self.backfill_chain(provider).await {
                Ok(true) => stored += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(
                        chain_id = provider.chain_id,
                        error = ?err,
                        "failed to backfill internal txs"
                    );
                }
            }
        }
        stored
    }

    async fn backfill_chain(&self, provider: &ScanProvider) -> Result<bool, anyhow::Error> {
        let chain_id = provider.chain_id;
        let Some((tx_hash, entry_point)) =
            internal_txs::find_tx_without_internal_txs(&self.db, chain_id).await?
        else {
            return Ok(false);
        };
        let Some(traces) = self.client.fetch_internal_txs(provider, tx_hash).await else {
            return Ok(false);
        };
        internal_txs::insert_internal_txs(&self.db, chain_id, entry_point, tx_hash, &traces)
            .await?;
        tracing::debug!(chain_id, tx_hash = %tx_hash, count = traces.len(), "stored internal txs");
        Ok(true)
    }

    /// Fetches and stores the traces of one transaction right away.
    ///
    /// Returns an empty list when the chain has no provider or the explorer fails.
    pub async fn fetch_internal_txs_now(
        &self,
        chain_id: ChainId,
        tx_hash: TxHash,
    ) -> Vec<InternalTx> {
        match self.try_fetch_internal_txs_now(chain_id, tx_hash).await {
            Ok(traces) => traces,
            Err(err) => {
                tracing::error!(chain_id, tx_hash = %tx_hash, error = ?err, "failed to fetch internal txs");
                vec![]
            }
        }
    }

    async fn try_fetch_internal_txs_now(
        &self,
        chain_id: ChainId,
        tx_hash: TxHash,
    ) -> Result<Vec<InternalTx>, anyhow::Error> {
        let Some(provider) = repository::entry_point::find_scan_provider(&self.db, chain_id).await?
        else {
            tracing::warn!(chain_id, "no scan provider for chain");
            return Ok(vec![]);
        };
        let Some(traces) = self.client.fetch_internal_txs(&provider, tx_hash).await else {
            return Ok(vec![]);
        };
        let entry_point = entry_point_txs::Entity::find_by_id((chain_id as i64, tx_hash.to_vec()))
            .one(self.db.as_ref())
            .await?
            .map(|tx| address_from_db(&tx.address))
            .unwrap_or(Address::ZERO);
        internal_txs::insert_internal_txs(&self.db, chain_id, entry_point, tx_hash, &traces)
            .await?;
        Ok(traces)
    }
}
