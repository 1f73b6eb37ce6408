use crate::types::{
    event::{AccountDeployedLog, RevertReasonLog, UserOperationEventLog},
    transaction::{EntryPointTx, UserOperationInfo},
};
use entity::{
    account_deployed_logs, entry_point_logs, entry_point_txs, revert_reason_logs,
    user_operation_info,
};
use sea_orm::{sea_query::OnConflict, ActiveModelTrait, DatabaseConnection, EntityTrait};
use std::{collections::HashSet, hash::Hash, sync::Arc};

/// Idempotent batched writer for indexed rows.
///
/// Every record is keyed by its natural identity, so rewriting an already stored
/// record refreshes its mutable columns instead of duplicating it. Records are
/// written in chunks of `chunk_size`; a failed chunk is logged and skipped while
/// the remaining chunks are still written.
#[derive(Clone)]
pub struct Writer {
    db: Arc<DatabaseConnection>,
    chunk_size: usize,
}

impl Writer {
    pub fn new(db: Arc<DatabaseConnection>, chunk_size: usize) -> Self {
        Self {
            db,
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn upsert_logs(&self, logs: Vec<UserOperationEventLog>) -> usize {
        let logs = dedup_by_key(logs, |l| (l.chain_id, l.transaction_hash, l.log_index));
        let on_conflict = OnConflict::columns([
            entry_point_logs::Column::ChainId,
            entry_point_logs::Column::TransactionHash,
            entry_point_logs::Column::LogIndex,
        ])
        .update_columns([
            entry_point_logs::Column::BlockNumber,
            entry_point_logs::Column::BlockHash,
        ])
        .to_owned();
        self.upsert_in_chunks::<entry_point_logs::ActiveModel, _>(
            "entry_point_logs",
            logs,
            on_conflict,
        )
        .await
    }

    pub async fn upsert_txs(&self, txs: Vec<EntryPointTx>) -> usize {
        let txs = dedup_by_key(txs, |t| (t.chain_id, t.tx.hash));
        let on_conflict = OnConflict::columns([
            entry_point_txs::Column::ChainId,
            entry_point_txs::Column::Hash,
        ])
        .update_columns([
            entry_point_txs::Column::BlockNumber,
            entry_point_txs::Column::BlockHash,
        ])
        .to_owned();
        self.upsert_in_chunks::<entry_point_txs::ActiveModel, _>(
            "entry_point_txs",
            txs,
            on_conflict,
        )
        .await
    }

    pub async fn upsert_user_operation_infos(&self, infos: Vec<UserOperationInfo>) -> usize {
        let infos = dedup_by_key(infos, |i| (i.chain_id, i.transaction_hash, i.sender, i.nonce));
        let on_conflict = OnConflict::columns([
            user_operation_info::Column::ChainId,
            user_operation_info::Column::TransactionHash,
            user_operation_info::Column::Sender,
            user_operation_info::Column::Nonce,
        ])
        .update_columns([
            user_operation_info::Column::Address,
            user_operation_info::Column::InitCode,
            user_operation_info::Column::CallData,
            user_operation_info::Column::CallGasLimit,
            user_operation_info::Column::VerificationGasLimit,
            user_operation_info::Column::PreVerificationGas,
            user_operation_info::Column::MaxFeePerGas,
            user_operation_info::Column::MaxPriorityFeePerGas,
            user_operation_info::Column::PaymasterAndData,
            user_operation_info::Column::Signature,
            user_operation_info::Column::Beneficiary,
            user_operation_info::Column::Factory,
        ])
        .to_owned();
        self.upsert_in_chunks::<user_operation_info::ActiveModel, _>(
            "user_operation_info",
            infos,
            on_conflict,
        )
        .await
    }

    pub async fn upsert_account_deployed_logs(&self, logs: Vec<AccountDeployedLog>) -> usize {
        let logs = dedup_by_key(logs, |l| (l.chain_id, l.user_op_hash));
        let on_conflict = OnConflict::columns([
            account_deployed_logs::Column::ChainId,
            account_deployed_logs::Column::UserOpHash,
        ])
        .update_columns([
            account_deployed_logs::Column::Sender,
            account_deployed_logs::Column::Factory,
            account_deployed_logs::Column::Paymaster,
        ])
        .to_owned();
        self.upsert_in_chunks::<account_deployed_logs::ActiveModel, _>(
            "account_deployed_logs",
            logs,
            on_conflict,
        )
        .await
    }

    pub async fn upsert_revert_reason_logs(&self, logs: Vec<RevertReasonLog>) -> usize {
        let logs = dedup_by_key(logs, |l| (l.chain_id, l.user_op_hash));
        let on_conflict = OnConflict::columns([
            revert_reason_logs::Column::ChainId,
            revert_reason_logs::Column::UserOpHash,
        ])
        .update_columns([
            revert_reason_logs::Column::Sender,
            revert_reason_logs::Column::Nonce,
            revert_reason_logs::Column::RevertReason,
        ])
        .to_owned();
        self.upsert_in_chunks::<revert_reason_logs::ActiveModel, _>(
            "revert_reason_logs",
            logs,
            on_conflict,
        )
        .await
    }

    /// Returns the number of records in successfully written chunks.
    async fn upsert_in_chunks<A, T>(
        &self,
        table: &'static str,
        records: Vec<T>,
        on_conflict: OnConflict,
    ) -> usize
    where
        A: ActiveModelTrait + From<T> + Clone + Send,
    {
        let models: Vec<A> = records.into_iter().map(A::from).collect();
        let mut written = 0;
        for (index, chunk) in models.chunks(self.chunk_size).enumerate() {
            let result = <A::Entity as EntityTrait>::insert_many(chunk.to_vec())
                .on_empty_do_nothing()
                .on_conflict(on_conflict.clone())
                .exec(self.db.as_ref())
                .await;
            match result {
                Ok(_) => written += chunk.len(),
                Err(err) => {
                    tracing::error!(
                        table,
                        chunk = index,
                        rows = chunk.len(),
                        error = ?err,
                        "failed to write chunk"
                    );
                }
            }
        }
        tracing::debug!(table, total = models.len(), written, "records written");
        written
    }
}

/// Keeps the last occurrence of every key, preserving the order of survivors.
///
/// Postgres rejects an upsert statement that touches the same row twice.
fn dedup_by_key<T, K, F>(records: Vec<T>, key: F) -> Vec<T>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(records.len());
    let mut unique: Vec<T> = records
        .into_iter()
        .rev()
        .filter(|r| seen.insert(key(r)))
        .collect();
    unique.reverse();
    unique
}
