use crate::{
    explorer::types::InternalTx,
    types::{
        common::{address_from_db, b256_from_db, decimal_to_u256, is_success_marker},
        network::network_name,
    },
};
use alloy::primitives::{Address, BlockHash, BlockNumber, Bytes, ChainId, TxHash, B256, U256};
use entity::{entry_point_logs, entry_point_txs};
use std::fmt;

/// Role an address plays in account abstraction activity.
///
/// When an address matches several roles, the first one in [`ActivityRole::PRIORITY`] wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityRole {
    EntryPoint,
    Paymaster,
    Bundler,
    Beneficiary,
    Sender,
}

impl ActivityRole {
    pub const PRIORITY: [ActivityRole; 5] = [
        ActivityRole::EntryPoint,
        ActivityRole::Paymaster,
        ActivityRole::Bundler,
        ActivityRole::Beneficiary,
        ActivityRole::Sender,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityRole::EntryPoint => "EntryPoint",
            ActivityRole::Paymaster => "Paymaster",
            ActivityRole::Bundler => "Bundler",
            ActivityRole::Beneficiary => "Beneficiary",
            ActivityRole::Sender => "Sender",
        }
    }
}

impl fmt::Display for ActivityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One executed user operation, as recorded by its `UserOperationEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOpActivity {
    pub chain_id: ChainId,
    pub network: Option<&'static str>,
    pub user_op_hash: B256,
    pub entry_point: Address,
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

impl From<entry_point_logs::Model> for UserOpActivity {
    fn from(v: entry_point_logs::Model) -> Self {
        let chain_id = v.chain_id as ChainId;
        Self {
            chain_id,
            network: network_name(chain_id),
            user_op_hash: b256_from_db(&v.user_op_hash),
            entry_point: address_from_db(&v.address),
            sender: address_from_db(&v.sender),
            paymaster: address_from_db(&v.paymaster),
            nonce: decimal_to_u256(&v.nonce),
            success: is_success_marker(&v.success),
            actual_gas_cost: decimal_to_u256(&v.actual_gas_cost),
            actual_gas_used: decimal_to_u256(&v.actual_gas_used),
            block_number: v.block_number as BlockNumber,
            block_hash: b256_from_db(&v.block_hash),
            timestamp: v.timestamp as u64,
            gas_price: decimal_to_u256(&v.gas_price),
            gas_used: decimal_to_u256(&v.gas_used),
            log_index: v.log_index as u64,
            transaction_hash: b256_from_db(&v.transaction_hash),
            transaction_index: v.transaction_index as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPage {
    pub total: u64,
    pub items: Vec<UserOpActivity>,
}

/// Activity of an address under the highest-priority role it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressActivity {
    pub chain_id: ChainId,
    pub network: Option<&'static str>,
    pub address: Option<Address>,
    pub role: Option<ActivityRole>,
    pub total: u64,
    pub user_ops: Vec<UserOpActivity>,
}

impl AddressActivity {
    pub fn unknown(chain_id: ChainId, address: Option<Address>) -> Self {
        Self {
            chain_id,
            network: network_name(chain_id),
            address,
            role: None,
            total: 0,
            user_ops: vec![],
        }
    }

    pub fn role_name(&self) -> &'static str {
        self.role.map(|r| r.as_str()).unwrap_or("Unknown")
    }
}

/// A bundler transaction with the operations it executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub chain_id: ChainId,
    pub network: Option<&'static str>,
    pub transaction_hash: TxHash,
    pub entry_point: Address,
    pub bundler: Address,
    pub block_number: BlockNumber,
    pub block_hash: BlockHash,
    pub timestamp: u64,
    pub function_name: String,
    pub gas_price: U256,
    pub gas_used: U256,
    pub is_error: bool,
    pub user_ops_length: usize,
    pub user_ops: Vec<UserOpActivity>,
}

impl Bundle {
    pub fn new(tx: entry_point_txs::Model, user_ops: Vec<UserOpActivity>) -> Self {
        let chain_id = tx.chain_id as ChainId;
        Self {
            chain_id,
            network: network_name(chain_id),
            transaction_hash: b256_from_db(&tx.hash),
            entry_point: address_from_db(&tx.address),
            bundler: address_from_db(&tx.tx_from),
            block_number: tx.block_number as BlockNumber,
            block_hash: b256_from_db(&tx.block_hash),
            timestamp: tx.timestamp as u64,
            function_name: tx.function_name,
            gas_price: decimal_to_u256(&tx.gas_price),
            gas_used: decimal_to_u256(&tx.gas_used),
            is_error: tx.is_error,
            user_ops_length: user_ops.len(),
            user_ops,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundlesPage {
    pub total: u64,
    pub bundles: Vec<Bundle>,
}

/// Call parameters of a user operation, decoded from its bundle calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOpCall {
    pub init_code: Bytes,
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_and_data: Bytes,
    pub signature: Bytes,
    pub beneficiary: Address,
    pub factory: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOpDetail {
    pub user_op: UserOpActivity,
    pub revert_reason: Option<Bytes>,
    pub call: Option<UserOpCall>,
    /// Traces of the bundle that touch the sender.
    pub internal_txs: Vec<InternalTx>,
    pub bundler: Option<Address>,
    pub tx_to: Option<Address>,
    /// Encoded operation as it appears in the bundle input, empty when it cannot be located.
    pub original_calldata: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointSummary {
    pub address: Address,
    pub name: String,
    pub chain_id: ChainId,
    pub network: Option<&'static str>,
    pub user_ops: u64,
    pub last_op_block_number: Option<BlockNumber>,
    pub last_op_timestamp: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPointsPage {
    pub total: u64,
    pub entry_points: Vec<EntryPointSummary>,
}
