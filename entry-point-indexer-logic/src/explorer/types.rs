use alloy::primitives::{Address, BlockHash, Bytes, TxHash, B256, U256};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DeserializeAs, NoneAsEmptyString};

/// Numeric field of an explorer response. Explorers mix `"0x1a"`, `"26"`,
/// bare JSON numbers and empty strings for the same field, so all of them are accepted.
/// Block numbers, timestamps and indexes are stored as `bigint` and must fit into `i64`.
pub struct Quantity;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(u64),
    Text(String),
}

pub fn parse_quantity(s: &str) -> Result<U256, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some("") => return Ok(U256::ZERO),
        Some(hex) => U256::from_str_radix(hex, 16),
        None if s.is_empty() => return Ok(U256::ZERO),
        None => U256::from_str_radix(s, 10),
    };
    parsed.map_err(|err| format!("invalid quantity '{s}': {err}"))
}

impl<'de> DeserializeAs<'de, U256> for Quantity {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawQuantity::deserialize(deserializer)? {
            RawQuantity::Number(n) => Ok(U256::from(n)),
            RawQuantity::Text(s) => parse_quantity(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl<'de> DeserializeAs<'de, u64> for Quantity {
    fn deserialize_as<D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: U256 = <Quantity as DeserializeAs<'de, U256>>::deserialize_as(deserializer)?;
        i64::try_from(value)
            .map(|value| value as u64)
            .map_err(|_| serde::de::Error::custom(format!("quantity {value} is out of range")))
    }
}

/// Entry of a `module=logs&action=getLogs` response.
#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerLog {
    pub address: Address,
    #[serde(default)]
    pub topics: Vec<Option<B256>>,
    #[serde(default)]
    pub data: Bytes,
    #[serde_as(as = "Quantity")]
    pub block_number: u64,
    pub block_hash: BlockHash,
    #[serde(rename = "timeStamp", default)]
    #[serde_as(as = "Quantity")]
    pub timestamp: u64,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub gas_price: U256,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub gas_used: U256,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub log_index: u64,
    pub transaction_hash: TxHash,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub transaction_index: u64,
}

impl ExplorerLog {
    pub fn topic(&self, index: usize) -> Option<B256> {
        self.topics.get(index).copied().flatten()
    }
}

/// Entry of a `module=account&action=txlist` response.
#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTx {
    pub hash: TxHash,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub nonce: U256,
    #[serde_as(as = "Quantity")]
    pub block_number: u64,
    pub block_hash: BlockHash,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub transaction_index: u64,
    pub from: Address,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub to: Option<Address>,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub value: U256,
    #[serde(rename = "timeStamp", default)]
    #[serde_as(as = "Quantity")]
    pub timestamp: u64,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub gas: U256,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub gas_price: U256,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub gas_used: U256,
    #[serde(default)]
    #[serde_as(as = "Quantity")]
    pub cumulative_gas_used: U256,
    #[serde(default)]
    pub is_error: String,
    #[serde(rename = "txreceipt_status", default)]
    pub receipt_status: String,
    #[serde(default)]
    pub input: Bytes,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub function_name: String,
}

/// Entry of a `module=account&action=txlistinternal` response.
///
/// Stored verbatim as the trace of a bundle transaction, so every field is kept as returned.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InternalTx {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
    #[serde(rename = "timeStamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub call_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_code: Option<String>,
}

impl InternalTx {
    /// Whether the call was made by or to `address`.
    pub fn involves(&self, address: Address) -> bool {
        let matches = |field: &Option<String>| {
            field
                .as_deref()
                .and_then(|s| s.parse::<Address>().ok())
                .is_some_and(|a| a == address)
        };
        matches(&self.from) || matches(&self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("0x1a", 26)]
    #[case("26", 26)]
    #[case("", 0)]
    #[case("0x", 0)]
    #[case(" 0X0f ", 15)]
    fn quantity_formats(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(parse_quantity(raw).unwrap(), U256::from(expected));
    }

    #[test]
    fn quantity_rejects_garbage() {
        assert!(parse_quantity("0xzz").is_err());
        assert!(parse_quantity("12a").is_err());
    }

    #[test]
    fn deserializes_log() {
        let log: ExplorerLog = serde_json::from_value(serde_json::json!({
            "address": "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789",
            "topics": [
                "0x49628fd1471006c1482da88028e9ce4dbb080b815c9b0344d39e5a8e6ec1419f",
                "0x0101010101010101010101010101010101010101010101010101010101010101",
                null
            ],
            "data": "0x",
            "blockNumber": "0x10",
            "blockHash": "0x0202020202020202020202020202020202020202020202020202020202020202",
            "timeStamp": "0x64",
            "gasPrice": "0x3b9aca00",
            "gasUsed": "",
            "logIndex": "0x",
            "transactionHash": "0x0303030303030303030303030303030303030303030303030303030303030303",
            "transactionIndex": "0x2"
        }))
        .unwrap();

        assert_eq!(log.address, address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789"));
        assert_eq!(log.block_number, 16);
        assert_eq!(log.timestamp, 100);
        assert_eq!(log.gas_price, U256::from(1_000_000_000u64));
        assert_eq!(log.gas_used, U256::ZERO);
        assert_eq!(log.log_index, 0);
        assert_eq!(log.transaction_index, 2);
        assert_eq!(
            log.topic(1),
            Some(b256!("0101010101010101010101010101010101010101010101010101010101010101"))
        );
        assert_eq!(log.topic(2), None);
        assert_eq!(log.topic(3), None);
    }

    #[test]
    fn log_with_out_of_range_block_number_is_rejected() {
        let log = |block_number: &str| {
            serde_json::from_value::<ExplorerLog>(serde_json::json!({
                "address": "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789",
                "blockNumber": block_number,
                "blockHash": "0x0202020202020202020202020202020202020202020202020202020202020202",
                "transactionHash": "0x0303030303030303030303030303030303030303030303030303030303030303",
            }))
        };

        assert_eq!(log("0x7fffffffffffffff").unwrap().block_number, i64::MAX as u64);
        assert!(log("0x8000000000000000").is_err());
        assert!(log("18446744073709551615").is_err());
    }

    #[test]
    fn log_without_transaction_hash_is_rejected() {
        let res = serde_json::from_value::<ExplorerLog>(serde_json::json!({
            "address": "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789",
            "topics": [],
            "data": "0x",
            "blockNumber": "0x10",
            "blockHash": "0x0202020202020202020202020202020202020202020202020202020202020202",
        }));
        assert!(res.is_err());
    }

    #[test]
    fn deserializes_tx_with_empty_to() {
        let tx: ExplorerTx = serde_json::from_value(serde_json::json!({
            "blockNumber": "18000000",
            "timeStamp": "1693000000",
            "hash": "0x0303030303030303030303030303030303030303030303030303030303030303",
            "nonce": "7",
            "blockHash": "0x0202020202020202020202020202020202020202020202020202020202020202",
            "transactionIndex": "12",
            "from": "0x1111111111111111111111111111111111111111",
            "to": "",
            "value": "0",
            "gas": "500000",
            "gasPrice": "30000000000",
            "isError": "0",
            "txreceipt_status": "1",
            "input": "0x1fad948c",
            "contractAddress": "",
            "cumulativeGasUsed": "1000000",
            "gasUsed": "250000",
            "confirmations": "10",
            "methodId": "0x1fad948c",
            "functionName": "handleOps(tuple[] ops, address beneficiary)"
        }))
        .unwrap();

        assert_eq!(tx.block_number, 18000000);
        assert_eq!(tx.nonce, U256::from(7));
        assert_eq!(tx.to, None);
        assert_eq!(tx.contract_address, None);
        assert_eq!(tx.receipt_status, "1");
        assert_eq!(tx.input.as_ref(), &[0x1f, 0xad, 0x94, 0x8c]);
    }

    #[test]
    fn internal_tx_involvement() {
        let sender = address!("1111111111111111111111111111111111111111");
        let tx = InternalTx {
            from: Some("0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789".to_string()),
            to: Some("0x1111111111111111111111111111111111111111".to_string()),
            ..Default::default()
        };
        assert!(tx.involves(sender));
        assert!(!tx.involves(address!("2222222222222222222222222222222222222222")));
        assert!(!InternalTx::default().involves(sender));
    }
}
