use crate::types::common::{address_from_db, b256_from_db};
use alloy::primitives::{Address, ChainId, B256};
use anyhow::Context;
use entity::{entry_point_config, scan_config};
use serde::{Deserialize, Serialize};

/// A chain an entry point is deployed on, with the block its scan starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SupportedChain {
    #[serde(rename = "chainId", alias = "chain_id")]
    pub chain_id: ChainId,
    #[serde(rename = "block", alias = "start_block", default)]
    pub start_block: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub address: Address,
    pub name: String,
    pub support_chains: Vec<SupportedChain>,
    pub user_operation_event_topic: B256,
    pub account_deployed_topic: B256,
    pub revert_reason_topic: B256,
}

impl TryFrom<entry_point_config::Model> for EntryPoint {
    type Error = anyhow::Error;

    fn try_from(v: entry_point_config::Model) -> Result<Self, Self::Error> {
        let address = address_from_db(&v.address);
        let support_chains = serde_json::from_value(v.support_chains)
            .with_context(|| format!("invalid support_chains for entry point {address}"))?;
        Ok(Self {
            address,
            name: v.name,
            support_chains,
            user_operation_event_topic: b256_from_db(&v.user_operation_event_topic),
            account_deployed_topic: b256_from_db(&v.account_deployed_topic),
            revert_reason_topic: b256_from_db(&v.revert_reason_topic),
        })
    }
}

/// Explorer endpoint serving a single chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProvider {
    pub chain_id: ChainId,
    pub url: String,
    pub api_key: String,
}

impl From<scan_config::Model> for ScanProvider {
    fn from(v: scan_config::Model) -> Self {
        Self {
            chain_id: v.chain_id as ChainId,
            url: v.scan_url,
            api_key: v.api_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use pretty_assertions::assert_eq;

    fn model(support_chains: serde_json::Value) -> entry_point_config::Model {
        entry_point_config::Model {
            address: address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789").to_vec(),
            name: "EntryPoint v0.6".to_string(),
            support_chains,
            user_operation_event_topic: B256::repeat_byte(1).to_vec(),
            account_deployed_topic: B256::repeat_byte(2).to_vec(),
            revert_reason_topic: B256::repeat_byte(3).to_vec(),
            created_at: Default::default(),
        }
    }

    #[test]
    fn parses_support_chains() {
        let entry_point = EntryPoint::try_from(model(serde_json::json!([
            { "chainId": 1, "block": 17000000 },
            { "chain_id": 137, "start_block": 42 },
            { "chainId": 10 },
        ])))
        .unwrap();

        assert_eq!(
            entry_point.support_chains,
            vec![
                SupportedChain {
                    chain_id: 1,
                    start_block: 17000000
                },
                SupportedChain {
                    chain_id: 137,
                    start_block: 42
                },
                SupportedChain {
                    chain_id: 10,
                    start_block: 0
                },
            ]
        );
        assert_eq!(entry_point.revert_reason_topic, B256::repeat_byte(3));
    }

    #[test]
    fn rejects_malformed_support_chains() {
        assert!(EntryPoint::try_from(model(serde_json::json!({ "chainId": 1 }))).is_err());
    }
}
