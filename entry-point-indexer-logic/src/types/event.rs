use crate::types::common::{success_marker, u256_to_decimal, u64_to_db};
use alloy::primitives::{Address, BlockHash, BlockNumber, Bytes, ChainId, TxHash, B256, U256};
use entity::{account_deployed_logs, entry_point_logs, revert_reason_logs};
use sea_orm::ActiveValue::Set;

/// Decoded `UserOperationEvent` emitted by an entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserOperationEventLog {
    pub chain_id: ChainId,
    pub entry_point: Address,
    pub user_op_hash: B256,
    pub sender: Address,
    pub paymaster: Address,
    pub nonce: U256,
    pub success: bool,
    pub actual_gas_cost: U256,
    pub actual_gas_used: U256,
    pub block_number: BlockNumber,
    pub block_hash: BlockHash,
    pub timestamp: u64,
    pub gas_price: U256,
    pub gas_used: U256,
    pub log_index: u64,
    pub transaction_hash: TxHash,
    pub transaction_index: u64,
}

/// Decoded `AccountDeployed` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountDeployedLog {
    pub chain_id: ChainId,
    pub entry_point: Address,
    pub user_op_hash: B256,
    pub sender: Address,
    pub factory: Address,
    pub paymaster: Address,
    pub transaction_hash: TxHash,
}

/// Decoded `UserOperationRevertReason` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevertReasonLog {
    pub chain_id: ChainId,
    pub entry_point: Address,
    pub user_op_hash: B256,
    pub sender: Address,
    pub nonce: U256,
    pub revert_reason: Bytes,
    pub transaction_hash: TxHash,
}

impl From<UserOperationEventLog> for entry_point_logs::ActiveModel {
    fn from(v: UserOperationEventLog) -> Self {
        Self {
            chain_id: Set(v.chain_id as i64),
            transaction_hash: Set(v.transaction_hash.to_vec()),
            log_index: Set(u64_to_db(v.log_index)),
            address: Set(v.entry_point.to_vec()),
            user_op_hash: Set(v.user_op_hash.to_vec()),
            sender: Set(v.sender.to_vec()),
            paymaster: Set(v.paymaster.to_vec()),
            nonce: Set(u256_to_decimal(v.nonce)),
            success: Set(success_marker(v.success)),
            actual_gas_cost: Set(u256_to_decimal(v.actual_gas_cost)),
            actual_gas_used: Set(u256_to_decimal(v.actual_gas_used)),
            block_number: Set(u64_to_db(v.block_number)),
            block_hash: Set(v.block_hash.to_vec()),
            timestamp: Set(u64_to_db(v.timestamp)),
            gas_price: Set(u256_to_decimal(v.gas_price)),
            gas_used: Set(u256_to_decimal(v.gas_used)),
            transaction_index: Set(u64_to_db(v.transaction_index)),
            ..Default::default()
        }
    }
}

impl From<AccountDeployedLog> for account_deployed_logs::ActiveModel {
    fn from(v: AccountDeployedLog) -> Self {
        Self {
            chain_id: Set(v.chain_id as i64),
            user_op_hash: Set(v.user_op_hash.to_vec()),
            address: Set(v.entry_point.to_vec()),
            sender: Set(v.sender.to_vec()),
            factory: Set(v.factory.to_vec()),
            paymaster: Set(v.paymaster.to_vec()),
            transaction_hash: Set(v.transaction_hash.to_vec()),
            ..Default::default()
        }
    }
}

impl From<RevertReasonLog> for revert_reason_logs::ActiveModel {
    fn from(v: RevertReasonLog) -> Self {
        Self {
            chain_id: Set(v.chain_id as i64),
            user_op_hash: Set(v.user_op_hash.to_vec()),
            address: Set(v.entry_point.to_vec()),
            sender: Set(v.sender.to_vec()),
            nonce: Set(u256_to_decimal(v.nonce)),
            revert_reason: Set(v.revert_reason.to_vec()),
            transaction_hash: Set(v.transaction_hash.to_vec()),
            ..Default::default()
        }
    }
}
