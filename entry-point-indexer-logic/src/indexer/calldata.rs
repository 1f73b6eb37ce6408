use crate::{
    indexer::abi::IEntryPoint,
    types::transaction::{EntryPointTx, UserOperationInfo},
};
use alloy::{
    primitives::{Address, Bytes},
    sol_types::SolCall,
};

/// Selectors of the bundle methods whose calldata is decoded.
pub const BUNDLE_SELECTORS: [[u8; 4]; 2] = [
    IEntryPoint::handleOpsCall::SELECTOR,
    IEntryPoint::handleAggregatedOpsCall::SELECTOR,
];

pub fn is_bundle_input(input: &[u8]) -> bool {
    input
        .get(..4)
        .is_some_and(|selector| BUNDLE_SELECTORS.iter().any(|s| s == selector))
}

/// Factory of a new account, taken from the first 20 bytes of `initCode`.
pub fn extract_factory(init_code: &Bytes) -> Address {
    if init_code.len() >= 20 {
        Address::from_slice(&init_code[..20])
    } else {
        Address::ZERO
    }
}

/// Decodes the user operation of a bundle transaction.
///
/// Both selectors are decoded with the `handleOps(UserOperation[], address)` layout and
/// only the first operation of the bundle is taken. Returns `None` for inputs that are
/// not bundles or cannot be decoded.
pub fn decode_user_operation_info(tx: &EntryPointTx) -> Option<UserOperationInfo> {
    let input = &tx.tx.input;
    if !is_bundle_input(input) {
        return None;
    }
    let call = match IEntryPoint::handleOpsCall::abi_decode_raw(&input[4..]) {
        Ok(call) => call,
        Err(err) => {
            tracing::warn!(
                chain_id = tx.chain_id,
                tx_hash = %tx.tx.hash,
                error = ?err,
                "failed to decode bundle calldata"
            );
            return None;
        }
    };
    let Some(op) = call.ops.into_iter().next() else {
        tracing::warn!(
            chain_id = tx.chain_id,
            tx_hash = %tx.tx.hash,
            "bundle contains no user operations"
        );
        return None;
    };

    Some(UserOperationInfo {
        chain_id: tx.chain_id,
        entry_point: tx.entry_point,
        transaction_hash: tx.tx.hash,
        factory: extract_factory(&op.initCode),
        sender: op.sender,
        nonce: op.nonce,
        init_code: op.initCode,
        call_data: op.callData,
        call_gas_limit: op.callGasLimit,
        verification_gas_limit: op.verificationGasLimit,
        pre_verification_gas: op.preVerificationGas,
        max_fee_per_gas: op.maxFeePerGas,
        max_priority_fee_per_gas: op.maxPriorityFeePerGas,
        paymaster_and_data: op.paymasterAndData,
        signature: op.signature,
        beneficiary: call.beneficiary,
    })
}

pub fn decode_user_operation_infos(txs: &[EntryPointTx]) -> Vec<UserOperationInfo> {
    txs.iter().filter_map(decode_user_operation_info).collect()
}
