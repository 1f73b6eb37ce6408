//! Projections of raw entry point logs.
//!
//! Identity fields come from the topics, payload fields from `data`. A payload that
//! fails to decode does not drop the log: the row is still produced with defaulted
//! payload fields, since the block position of the event is known regardless.

use crate::{
    explorer::types::ExplorerLog,
    indexer::abi::IEntryPoint,
    types::event::{AccountDeployedLog, RevertReasonLog, UserOperationEventLog},
};
use alloy::{
    primitives::{Address, Bytes, ChainId, B256, U256},
    sol_types::SolEvent,
};

fn topic_address(log: &ExplorerLog, index: usize) -> Address {
    log.topic(index).map(Address::from_word).unwrap_or_default()
}

fn matching<'a>(topic: B256, logs: &'a [ExplorerLog]) -> impl Iterator<Item = &'a ExplorerLog> {
    logs.iter().filter(move |log| log.topic(0) == Some(topic))
}

pub fn decode_user_operation_events(
    chain_id: ChainId,
    topic: B256,
    logs: &[ExplorerLog],
) -> Vec<UserOperationEventLog> {
    matching(topic, logs)
        .map(|log| {
            let (nonce, success, actual_gas_cost, actual_gas_used) =
                IEntryPoint::UserOperationEvent::abi_decode_data(&log.data).unwrap_or_else(
                    |err| {
                        tracing::warn!(
                            chain_id,
                            tx_hash = %log.transaction_hash,
                            log_index = log.log_index,
                            error = ?err,
                            "failed to decode user operation event data"
                        );
                        (U256::ZERO, true, U256::ZERO, U256::ZERO)
                    },
                );
            UserOperationEventLog {
                chain_id,
                entry_point: log.address,
                user_op_hash: log.topic(1).unwrap_or_default(),
                sender: topic_address(log, 2),
                paymaster: topic_address(log, 3),
                nonce,
                success,
                actual_gas_cost,
                actual_gas_used,
                block_number: log.block_number,
                block_hash: log.block_hash,
                timestamp: log.timestamp,
                gas_price: log.gas_price,
                gas_used: log.gas_used,
                log_index: log.log_index,
                transaction_hash: log.transaction_hash,
                transaction_index: log.transaction_index,
            }
        })
        .collect()
}

pub fn decode_account_deployed_events(
    chain_id: ChainId,
    topic: B256,
    logs: &[ExplorerLog],
) -> Vec<AccountDeployedLog> {
    matching(topic, logs)
        .map(|log| {
            let (factory, paymaster) = IEntryPoint::AccountDeployed::abi_decode_data(&log.data)
                .unwrap_or_else(|err| {
                    tracing::warn!(
                        chain_id,
                        tx_hash = %log.transaction_hash,
                        error = ?err,
                        "failed to decode account deployed event data"
                    );
                    (Address::ZERO, Address::ZERO)
                });
            AccountDeployedLog {
                chain_id,
                entry_point: log.address,
                user_op_hash: log.topic(1).unwrap_or_default(),
                sender: topic_address(log, 2),
                factory,
                paymaster,
                transaction_hash: log.transaction_hash,
            }
        })
        .collect()
}

pub fn decode_revert_reason_events(
    chain_id: ChainId,
    topic: B256,
    logs: &[ExplorerLog],
) -> Vec<RevertReasonLog> {
    matching(topic, logs)
        .map(|log| {
            let (nonce, revert_reason) =
                IEntryPoint::UserOperationRevertReason::abi_decode_data(&log.data)
                    .unwrap_or_else(|err| {
                        tracing::warn!(
                            chain_id,
                            tx_hash = %log.transaction_hash,
                            error = ?err,
                            "failed to decode revert reason event data"
                        );
                        (U256::ZERO, Bytes::new())
                    });
            RevertReasonLog {
                chain_id,
                entry_point: log.address,
                user_op_hash: log.topic(1).unwrap_or_default(),
                sender: topic_address(log, 2),
                nonce,
                revert_reason,
                transaction_hash: log.transaction_hash,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, bytes};
    use pretty_assertions::assert_eq;

    const ENTRY_POINT: Address = address!("00000000000000000000000000000000000000e1");
    const SENDER: Address = address!("0000000000000000000000000000000000000051");
    const PAYMASTER: Address = address!("00000000000000000000000000000000000000a1");
    const USER_OP_HASH: B256 =
        b256!("1111111111111111111111111111111111111111111111111111111111111111");

    fn log(topics: Vec<Option<B256>>, data: Bytes) -> ExplorerLog {
        ExplorerLog {
            address: ENTRY_POINT,
            topics,
            data,
            block_number: 100,
            block_hash: B256::repeat_byte(0xbb),
            timestamp: 1700000000,
            gas_price: U256::from(7),
            gas_used: U256::from(21000),
            log_index: 3,
            transaction_hash: B256::repeat_byte(0xcc),
            transaction_index: 1,
        }
    }

    #[test]
    fn decodes_user_operation_event() {
        let topic = IEntryPoint::UserOperationEvent::SIGNATURE_HASH;
        let data = IEntryPoint::UserOperationEvent {
            userOpHash: USER_OP_HASH,
            sender: SENDER,
            paymaster: PAYMASTER,
            nonce: U256::from(5),
            success: true,
            actualGasCost: U256::from(100),
            actualGasUsed: U256::from(90),
        }
        .encode_data();
        let logs = vec![
            log(
                vec![
                    Some(topic),
                    Some(USER_OP_HASH),
                    Some(SENDER.into_word()),
                    Some(PAYMASTER.into_word()),
                ],
                data.into(),
            ),
            log(vec![Some(B256::repeat_byte(9))], Bytes::new()),
        ];

        let decoded = decode_user_operation_events(1, topic, &logs);

        assert_eq!(
            decoded,
            vec![UserOperationEventLog {
                chain_id: 1,
                entry_point: ENTRY_POINT,
                user_op_hash: USER_OP_HASH,
                sender: SENDER,
                paymaster: PAYMASTER,
                nonce: U256::from(5),
                success: true,
                actual_gas_cost: U256::from(100),
                actual_gas_used: U256::from(90),
                block_number: 100,
                block_hash: B256::repeat_byte(0xbb),
                timestamp: 1700000000,
                gas_price: U256::from(7),
                gas_used: U256::from(21000),
                log_index: 3,
                transaction_hash: B256::repeat_byte(0xcc),
                transaction_index: 1,
            }]
        );
    }

    #[test]
    fn malformed_user_operation_event_keeps_the_row() {
        let topic = B256::repeat_byte(0x42);
        let logs = vec![log(
            vec![
                Some(topic),
                Some(USER_OP_HASH),
                Some(SENDER.into_word()),
                Some(PAYMASTER.into_word()),
            ],
            bytes!("deadbeef"),
        )];

        let decoded = decode_user_operation_events(1, topic, &logs);

        assert_eq!(decoded.len(), 1);
        let row = &decoded[0];
        assert_eq!(row.user_op_hash, USER_OP_HASH);
        assert_eq!(row.sender, SENDER);
        assert_eq!(row.paymaster, PAYMASTER);
        assert_eq!(row.nonce, U256::ZERO);
        assert!(row.success);
        assert_eq!(row.actual_gas_cost, U256::ZERO);
        assert_eq!(row.actual_gas_used, U256::ZERO);
        assert_eq!(row.log_index, 3);
    }

    #[test]
    fn missing_topics_default_to_zero() {
        let topic = B256::repeat_byte(0x42);
        let logs = vec![log(vec![Some(topic)], Bytes::new())];

        let decoded = decode_user_operation_events(1, topic, &logs);

        assert_eq!(decoded[0].user_op_hash, B256::ZERO);
        assert_eq!(decoded[0].sender, Address::ZERO);
        assert_eq!(decoded[0].paymaster, Address::ZERO);
    }

    #[test]
    fn decodes_account_deployed() {
        let topic = IEntryPoint::AccountDeployed::SIGNATURE_HASH;
        let factory = address!("9406Cc6185a346906296840746125a0E44976454");
        let data = IEntryPoint::AccountDeployed {
            userOpHash: USER_OP_HASH,
            sender: SENDER,
            factory,
            paymaster: PAYMASTER,
        }
        .encode_data();
        let logs = vec![log(
            vec![Some(topic), Some(USER_OP_HASH), Some(SENDER.into_word())],
            data.into(),
        )];

        let decoded = decode_account_deployed_events(10, topic, &logs);

        assert_eq!(
            decoded,
            vec![AccountDeployedLog {
                chain_id: 10,
                entry_point: ENTRY_POINT,
                user_op_hash: USER_OP_HASH,
                sender: SENDER,
                factory,
                paymaster: PAYMASTER,
                transaction_hash: B256::repeat_byte(0xcc),
            }]
        );
    }

    #[test]
    fn decodes_revert_reason() {
        let topic = IEntryPoint::UserOperationRevertReason::SIGNATURE_HASH;
        let data = IEntryPoint::UserOperationRevertReason {
            userOpHash: USER_OP_HASH,
            sender: SENDER,
            nonce: U256::from(8),
            revertReason: bytes!("08c379a0"),
        }
        .encode_data();
        let logs = vec![
            log(
                vec![Some(topic), Some(USER_OP_HASH), Some(SENDER.into_word())],
                data.into(),
            ),
            log(
                vec![Some(topic), Some(USER_OP_HASH), Some(SENDER.into_word())],
                bytes!("00"),
            ),
        ];

        let decoded = decode_revert_reason_events(1, topic, &logs);

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].nonce, U256::from(8));
        assert_eq!(decoded[0].revert_reason, bytes!("08c379a0"));
        assert_eq!(decoded[1].nonce, U256::ZERO);
        assert_eq!(decoded[1].revert_reason, Bytes::new());
        assert_eq!(decoded[1].sender, SENDER);
    }
}
