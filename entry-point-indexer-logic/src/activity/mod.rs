//! Read side of the indexer.
//!
//! Every query degrades to an empty or zeroed result when the database fails, the
//! error is only logged.

mod recovery;

pub use recovery::recover_original_calldata;

use crate::{
    explorer::types::InternalTx,
    indexer::calldata::BUNDLE_SELECTORS,
    repository::{self, user_op::UserOpDetailDB},
    types::{
        activity::{
            ActivityPage, ActivityRole, AddressActivity, Bundle, BundlesPage, EntryPointSummary,
            EntryPointsPage, UserOpActivity, UserOpCall, UserOpDetail,
        },
        common::{address_from_db, b256_from_db, decimal_to_u256},
        network::network_name,
    },
};
use alloy::primitives::{Address, BlockNumber, Bytes, ChainId, B256};
use entity::entry_point_logs;
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, future::Future, sync::Arc};

#[derive(Clone)]
pub struct ActivityService {
    db: Arc<DatabaseConnection>,
    max_page_size: u64,
}

impl ActivityService {
    pub fn new(db: Arc<DatabaseConnection>, max_page_size: u64) -> Self {
        Self { db, max_page_size }
    }

    /// Activity of `address` under the first role, in priority order, with a non-empty page.
    pub async fn address_activity(
        &self,
        chain_id: ChainId,
        address: Option<Address>,
        page_size: u64,
        offset: u64,
    ) -> AddressActivity {
        let Some(address) = address else {
            return AddressActivity::unknown(chain_id, None);
        };
        for role in ActivityRole::PRIORITY {
            let page = self.role_activity(chain_id, role, address, page_size, offset).await;
            if !page.items.is_empty() {
                return AddressActivity {
                    chain_id,
                    network: network_name(chain_id),
                    address: Some(address),
                    role: Some(role),
                    total: page.total,
                    user_ops: page.items,
                };
            }
        }
        AddressActivity::unknown(chain_id, Some(address))
    }

    pub async fn entry_point_activity(
        &self,
        chain_id: ChainId,
        address: Address,
        page_size: u64,
        offset: u64,
    ) -> ActivityPage {
        self.role_activity(chain_id, ActivityRole::EntryPoint, address, page_size, offset)
            .await
    }

    pub async fn paymaster_activity(
        &self,
        chain_id: ChainId,
        address: Address,
        page_size: u64,
        offset: u64,
    ) -> ActivityPage {
        self.role_activity(chain_id, ActivityRole::Paymaster, address, page_size, offset)
            .await
    }

    pub async fn bundler_activity(
        &self,
        chain_id: ChainId,
        address: Address,
        page_size: u64,
        offset: u64,
    ) -> ActivityPage {
        self.role_activity(chain_id, ActivityRole::Bundler, address, page_size, offset)
            .await
    }

    pub async fn beneficiary_activity(
        &self,
        chain_id: ChainId,
        address: Address,
        page_size: u64,
        offset: u64,
    ) -> ActivityPage {
        self.role_activity(chain_id, ActivityRole::Beneficiary, address, page_size, offset)
            .await
    }

    pub async fn sender_activity(
        &self,
        chain_id: ChainId,
        address: Address,
        page_size: u64,
        offset: u64,
    ) -> ActivityPage {
        self.role_activity(chain_id, ActivityRole::Sender, address, page_size, offset)
            .await
    }

    pub async fn block_activity(
        &self,
        chain_id: ChainId,
        block_number: BlockNumber,
    ) -> Vec<UserOpActivity> {
        degrade(
            "block_activity",
            repository::user_op::list_block_user_ops(&self.db, chain_id, block_number),
        )
        .await
    }

    pub async fn latest_user_ops(
        &self,
        chain_id: ChainId,
        page_size: u64,
        offset: u64,
    ) -> ActivityPage {
        let db = &self.db;
        let (total, items) = self
            .paginate(
                "latest_user_ops",
                page_size,
                repository::user_op::count_user_ops(db, chain_id),
                |limit| repository::user_op::list_user_ops(db, chain_id, limit, offset),
            )
            .await;
        ActivityPage { total, items }
    }

    pub async fn user_ops_total(&self, chain_id: ChainId) -> u64 {
        degrade(
            "user_ops_total",
            repository::user_op::count_user_ops(&self.db, chain_id),
        )
        .await
    }

    pub async fn bundles_total(&self, chain_id: ChainId) -> u64 {
        degrade(
            "bundles_total",
            repository::bundle::count_bundles(&self.db, chain_id, &BUNDLE_SELECTORS),
        )
        .await
    }

    /// Most recent bundle transactions, each with the operations it executed.
    pub async fn latest_bundles(
        &self,
        chain_id: ChainId,
        page_size: u64,
        offset: u64,
    ) -> BundlesPage {
        let db = &self.db;
        let (total, txs) = self
            .paginate(
                "latest_bundles",
                page_size,
                repository::bundle::count_bundles(db, chain_id, &BUNDLE_SELECTORS),
                |limit| {
                    repository::bundle::list_bundles(db, chain_id, &BUNDLE_SELECTORS, limit, offset)
                },
            )
            .await;
        if txs.is_empty() {
            return BundlesPage {
                total,
                bundles: vec![],
            };
        }

        let hashes: Vec<B256> = txs.iter().map(|tx| b256_from_db(&tx.hash)).collect();
        let mut user_ops: HashMap<B256, Vec<UserOpActivity>> = HashMap::new();
        for op in degrade(
            "latest_bundles",
            repository::user_op::list_by_tx_hashes(db, chain_id, &hashes),
        )
        .await
        {
            user_ops.entry(op.transaction_hash).or_default().push(op);
        }

        let bundles = txs
            .into_iter()
            .zip(hashes)
            .map(|(tx, hash)| Bundle::new(tx, user_ops.remove(&hash).unwrap_or_default()))
            .collect();
        BundlesPage { total, bundles }
    }

    pub async fn user_ops_by_hash(
        &self,
        chain_id: ChainId,
        user_op_hashes: &[B256],
    ) -> Vec<UserOpDetail> {
        degrade(
            "user_ops_by_hash",
            repository::user_op::find_details_by_hashes(&self.db, chain_id, user_op_hashes),
        )
        .await
        .into_iter()
        .map(user_op_detail)
        .collect()
    }

    /// Every configured entry point, with its operation count on `chain_id`.
    pub async fn entry_points(&self, chain_id: ChainId) -> EntryPointsPage {
        let configured = degrade(
            "entry_points",
            repository::entry_point::load_entry_points(&self.db),
        )
        .await;
        let mut entry_points = vec![];
        for entry_point in configured {
            let stats = degrade(
                "entry_points",
                repository::entry_point::entry_point_stats(&self.db, chain_id, entry_point.address),
            )
            .await;
            entry_points.push(EntryPointSummary {
                address: entry_point.address,
                name: entry_point.name,
                chain_id,
                network: network_name(chain_id),
                user_ops: stats.ops,
                last_op_block_number: stats.last_op_block_number,
                last_op_timestamp: stats.last_op_timestamp,
            });
        }
        EntryPointsPage {
            total: entry_points.len() as u64,
            entry_points,
        }
    }

    async fn role_activity(
        &self,
        chain_id: ChainId,
        role: ActivityRole,
        address: Address,
        page_size: u64,
        offset: u64,
    ) -> ActivityPage {
        let db = &self.db;
        let (total, items) = self
            .paginate(
                role.as_str(),
                page_size,
                repository::user_op::count_by_role(db, chain_id, role, address),
                |limit| repository::user_op::list_by_role(db, chain_id, role, address, limit, offset),
            )
            .await;
        ActivityPage { total, items }
    }

    /// Counts first and only queries rows when there is something to return.
    async fn paginate<T, C, R, RFut>(
        &self,
        query: &'static str,
        page_size: u64,
        count: C,
        rows: R,
    ) -> (u64, Vec<T>)
    where
        C: Future<Output = Result<u64, anyhow::Error>>,
        R: FnOnce(u64) -> RFut,
        RFut: Future<Output = Result<Vec<T>, anyhow::Error>>,
    {
        let total = degrade(query, count).await;
        let limit = page_size.min(self.max_page_size);
        if total == 0 || limit == 0 {
            return (total, vec![]);
        }
        (total, degrade(query, rows(limit)).await)
    }
}

async fn degrade<T: Default>(
    query: &'static str,
    fut: impl Future<Output = Result<T, anyhow::Error>>,
) -> T {
    fut.await.unwrap_or_else(|err| {
        tracing::error!(query, error = ?err, "activity query failed");
        T::default()
    })
}

fn user_op_detail(row: UserOpDetailDB) -> UserOpDetail {
    let user_op = UserOpActivity::from(entry_point_logs::Model {
        chain_id: row.chain_id,
        transaction_hash: row.transaction_hash,
        log_index: row.log_index,
        address: row.address,
        user_op_hash: row.user_op_hash,
        sender: row.sender,
        paymaster: row.paymaster,
        nonce: row.nonce,
        success: row.success,
        actual_gas_cost: row.actual_gas_cost,
        actual_gas_used: row.actual_gas_used,
        block_number: row.block_number,
        block_hash: row.block_hash,
        timestamp: row.timestamp,
        gas_price: row.gas_price,
        gas_used: row.gas_used,
        transaction_index: row.transaction_index,
        inserted_at: Default::default(),
    });

    let call = row.signature.map(|signature| UserOpCall {
        init_code: row.init_code.unwrap_or_default().into(),
        call_data: row.call_data.unwrap_or_default().into(),
        call_gas_limit: row.call_gas_limit.as_ref().map(decimal_to_u256).unwrap_or_default(),
        verification_gas_limit: row
            .verification_gas_limit
            .as_ref()
            .map(decimal_to_u256)
            .unwrap_or_default(),
        pre_verification_gas: row
            .pre_verification_gas
            .as_ref()
            .map(decimal_to_u256)
            .unwrap_or_default(),
        max_fee_per_gas: row.max_fee_per_gas.as_ref().map(decimal_to_u256).unwrap_or_default(),
        max_priority_fee_per_gas: row
            .max_priority_fee_per_gas
            .as_ref()
            .map(decimal_to_u256)
            .unwrap_or_default(),
        paymaster_and_data: row.paymaster_and_data.unwrap_or_default().into(),
        signature: signature.into(),
        beneficiary: row.beneficiary.as_deref().map(address_from_db).unwrap_or_default(),
        factory: row.factory.as_deref().map(address_from_db).unwrap_or_default(),
    });

    let internal_txs = row
        .internal_txs
        .map(|value| {
            serde_json::from_value::<Vec<InternalTx>>(value).unwrap_or_else(|err| {
                tracing::warn!(
                    user_op_hash = %user_op.user_op_hash,
                    error = ?err,
                    "stored internal txs are malformed"
                );
                vec![]
            })
        })
        .unwrap_or_default()
        .into_iter()
        .filter(|tx| tx.involves(user_op.sender))
        .collect();

    let original_calldata = match (&row.input, &call) {
        (Some(input), Some(call)) => {
            recover_original_calldata(input, user_op.sender, user_op.nonce, &call.signature)
        }
        _ => Bytes::new(),
    };

    UserOpDetail {
        revert_reason: row.revert_reason.map(Bytes::from),
        call,
        internal_txs,
        bundler: row.tx_from.as_deref().map(address_from_db),
        tx_to: row.tx_to.as_deref().map(address_from_db),
        original_calldata,
        user_op,
    }
}
