use crate::{
    explorer::types::ExplorerTx,
    types::common::{u256_to_decimal, u64_to_db},
};
use alloy::primitives::{Address, Bytes, ChainId, FixedBytes, TxHash, U256};
use entity::{entry_point_txs, user_operation_info};
use sea_orm::ActiveValue::Set;

/// Transaction sent to an entry point, as listed by the explorer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPointTx {
    pub chain_id: ChainId,
    pub entry_point: Address,
    pub tx: ExplorerTx,
}

impl EntryPointTx {
    pub fn method_id(&self) -> Option<FixedBytes<4>> {
        self.tx
            .input
            .get(..4)
            .map(FixedBytes::<4>::from_slice)
    }
}

impl From<EntryPointTx> for entry_point_txs::ActiveModel {
    fn from(v: EntryPointTx) -> Self {
        let method_id = v.method_id().map(|m| m.to_vec());
        let tx = v.tx;
        Self {
            chain_id: Set(v.chain_id as i64),
            hash: Set(tx.hash.to_vec()),
            address: Set(v.entry_point.to_vec()),
            nonce: Set(u256_to_decimal(tx.nonce)),
            block_number: Set(u64_to_db(tx.block_number)),
            block_hash: Set(tx.block_hash.to_vec()),
            transaction_index: Set(u64_to_db(tx.transaction_index)),
            tx_from: Set(tx.from.to_vec()),
            tx_to: Set(tx.to.map(|a| a.to_vec())),
            value: Set(u256_to_decimal(tx.value)),
            timestamp: Set(u64_to_db(tx.timestamp)),
            gas: Set(u256_to_decimal(tx.gas)),
            gas_price: Set(u256_to_decimal(tx.gas_price)),
            gas_used: Set(u256_to_decimal(tx.gas_used)),
            cumulative_gas_used: Set(u256_to_decimal(tx.cumulative_gas_used)),
            is_error: Set(tx.is_error == "1"),
            receipt_status: Set(tx.receipt_status),
            contract_address: Set(tx.contract_address.map(|a| a.to_vec())),
            input: Set(tx.input.to_vec()),
            method_id: Set(method_id),
            function_name: Set(tx.function_name),
            ..Default::default()
        }
    }
}

/// Parameters of the user operation carried by a bundle transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserOperationInfo {
    pub chain_id: ChainId,
    pub entry_point: Address,
    pub transaction_hash: TxHash,
    pub sender: Address,
    pub nonce: U256,
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

impl From<UserOperationInfo> for user_operation_info::ActiveModel {
    fn from(v: UserOperationInfo) -> Self {
        Self {
            chain_id: Set(v.chain_id as i64),
            transaction_hash: Set(v.transaction_hash.to_vec()),
            sender: Set(v.sender.to_vec()),
            nonce: Set(u256_to_decimal(v.nonce)),
            address: Set(v.entry_point.to_vec()),
            init_code: Set(v.init_code.to_vec()),
            call_data: Set(v.call_data.to_vec()),
            call_gas_limit: Set(u256_to_decimal(v.call_gas_limit)),
            verification_gas_limit: Set(u256_to_decimal(v.verification_gas_limit)),
            pre_verification_gas: Set(u256_to_decimal(v.pre_verification_gas)),
            max_fee_per_gas: Set(u256_to_decimal(v.max_fee_per_gas)),
            max_priority_fee_per_gas: Set(u256_to_decimal(v.max_priority_fee_per_gas)),
            paymaster_and_data: Set(v.paymaster_and_data.to_vec()),
            signature: Set(v.signature.to_vec()),
            beneficiary: Set(v.beneficiary.to_vec()),
            factory: Set(v.factory.to_vec()),
            ..Default::default()
        }
    }
}
