pub mod types;

use crate::{settings::ExplorerSettings, types::entry_point::ScanProvider};
use alloy::primitives::{Address, TxHash};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION, CONTENT_TYPE, USER_AGENT},
    Client as HttpClient,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::Instrument;
use types::{ExplorerLog, ExplorerTx, InternalTx};
use url::Url;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("explorer rejected the request: {message}: {result}")]
    Api { message: String, result: String },
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: serde_json::Value,
}

/// Client for the etherscan-compatible `/api` of block explorers.
///
/// Every call is bounded by the configured timeout. The public fetchers never fail:
/// they log the error and return an empty result instead.
#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    settings: ExplorerSettings,
}

impl Client {
    pub fn new(settings: ExplorerSettings) -> Result<Self, ExplorerError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        if let Ok(user_agent) = HeaderValue::from_str(&settings.user_agent) {
            headers.insert(USER_AGENT, user_agent);
        }
        let http = HttpClient::builder().default_headers(headers).build()?;
        Ok(Self { http, settings })
    }

    /// Event logs emitted by `address`, starting at `from_block` when it is positive.
    pub async fn fetch_logs(
        &self,
        provider: &ScanProvider,
        address: Address,
        from_block: u64,
    ) -> Vec<ExplorerLog> {
        let mut query = vec![
            ("module", "logs".to_string()),
            ("action", "getLogs".to_string()),
            ("address", address.to_string()),
        ];
        if from_block > 0 {
            query.push(("fromBlock", from_block.to_string()));
        }
        self.fetch_list(provider, query)
            .instrument(tracing::debug_span!("fetch_logs", chain_id = provider.chain_id))
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(chain_id = provider.chain_id, error = ?err, "failed to fetch logs");
                vec![]
            })
    }

    /// Transactions sent to `address`, starting at `from_block` when it is positive.
    pub async fn fetch_txs(
        &self,
        provider: &ScanProvider,
        address: Address,
        from_block: u64,
    ) -> Vec<ExplorerTx> {
        let mut query = vec![
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", address.to_string()),
        ];
        if from_block > 0 {
            query.push(("fromBlock", from_block.to_string()));
        }
        self.fetch_list(provider, query)
            .instrument(tracing::debug_span!("fetch_txs", chain_id = provider.chain_id))
            .await
            .unwrap_or_else(|err| {
                tracing::warn!(chain_id = provider.chain_id, error = ?err, "failed to fetch txs");
                vec![]
            })
    }

    /// Internal calls of a single transaction.
    ///
    /// Returns `None` when the explorer could not be queried, so that callers can tell
    /// a failed request apart from a transaction without internal calls.
    pub async fn fetch_internal_txs(
        &self,
        provider: &ScanProvider,
        hash: TxHash,
    ) -> Option<Vec<InternalTx>> {
        let query = vec![
            ("module", "account".to_string()),
            ("action", "txlistinternal".to_string()),
            ("txhash", hash.to_string()),
        ];
        self.fetch_list(provider, query)
            .instrument(tracing::debug_span!(
                "fetch_internal_txs",
                chain_id = provider.chain_id
            ))
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    chain_id = provider.chain_id,
                    tx_hash = %hash,
                    error = ?err,
                    "failed to fetch internal txs"
                );
            })
            .ok()
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        provider: &ScanProvider,
        query: Vec<(&str, String)>,
    ) -> Result<Vec<T>, ExplorerError> {
        let url = build_url(provider, query)?;
        let response = timeout(self.settings.timeout, self.get(url))
            .await
            .map_err(|_| ExplorerError::Timeout(self.settings.timeout))??;
        parse_result(response)
    }

    async fn get(&self, url: Url) -> Result<ExplorerResponse, ExplorerError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ExplorerError::Status(response.status()));
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn build_url(provider: &ScanProvider, query: Vec<(&str, String)>) -> Result<Url, ExplorerError> {
    let mut url = Url::parse(&format!("{}/api", provider.url.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .extend_pairs(query)
        .append_pair("apikey", &provider.api_key);
    Ok(url)
}

/// Entries of `result` that match `T`. A missing `result` is an empty list, any other
/// non-list `result` carries an explorer error such as a rate limit. Malformed entries
/// are skipped.
fn parse_result<T: DeserializeOwned>(
    response: ExplorerResponse,
) -> Result<Vec<T>, ExplorerError> {
    let items = match response.result {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Ok(vec![]),
        serde_json::Value::String(result) => {
            return Err(ExplorerError::Api {
                message: response.message.unwrap_or_default(),
                result,
            })
        }
        other => {
            return Err(ExplorerError::Api {
                message: response.message.unwrap_or_default(),
                result: other.to_string(),
            })
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value(item)
                .inspect_err(|err| {
                    tracing::warn!(error = ?err, "skipping malformed explorer entry");
                })
                .ok()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param, query_param_is_missing},
        Mock, MockServer, ResponseTemplate,
    };

    const ENTRY_POINT: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

    fn provider(server: &MockServer) -> ScanProvider {
        ScanProvider {
            chain_id: 1,
            url: format!("{}/", server.uri()),
            api_key: "key".to_string(),
        }
    }

    fn client(timeout: Duration) -> Client {
        Client::new(ExplorerSettings {
            timeout,
            ..Default::default()
        })
        .unwrap()
    }

    fn tx_json(hash: &str) -> serde_json::Value {
        json!({
            "blockNumber": "100",
            "timeStamp": "1700000000",
            "hash": hash,
            "nonce": "1",
            "blockHash": "0x0202020202020202020202020202020202020202020202020202020202020202",
            "transactionIndex": "0",
            "from": "0x1111111111111111111111111111111111111111",
            "to": "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789",
            "value": "0",
            "gas": "21000",
            "gasPrice": "1",
            "isError": "0",
            "txreceipt_status": "1",
            "input": "0x",
            "contractAddress": "",
            "cumulativeGasUsed": "21000",
            "gasUsed": "21000",
            "functionName": ""
        })
    }

    #[tokio::test]
    async fn fetch_txs_sends_query_and_skips_malformed_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("module", "account"))
            .and(query_param("action", "txlist"))
            .and(query_param("address", ENTRY_POINT.to_string()))
            .and(query_param("fromBlock", "90"))
            .and(query_param("apikey", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": [
                    tx_json("0x0303030303030303030303030303030303030303030303030303030303030303"),
                    { "hash": "not a hash" },
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let txs = client(Duration::from_secs(5))
            .fetch_txs(&provider(&server), ENTRY_POINT, 90)
            .await;

        assert_eq!(txs.len(), 1);
        assert_eq!(
            txs[0].hash,
            b256!("0303030303030303030303030303030303030303030303030303030303030303")
        );
    }

    #[tokio::test]
    async fn zero_from_block_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("action", "getLogs"))
            .and(query_param_is_missing("fromBlock"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let logs = client(Duration::from_secs(5))
            .fetch_logs(&provider(&server), ENTRY_POINT, 0)
            .await;
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn failures_yield_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "getLogs"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "txlist"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "result": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("action", "txlistinternal"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = client(Duration::from_millis(200));
        let provider = provider(&server);

        assert!(client.fetch_logs(&provider, ENTRY_POINT, 1).await.is_empty());
        assert!(client.fetch_txs(&provider, ENTRY_POINT, 1).await.is_empty());
        assert_eq!(
            client.fetch_internal_txs(&provider, TxHash::ZERO).await,
            None
        );
    }

    #[tokio::test]
    async fn missing_result_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "txlistinternal"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "status": "0", "message": "No transactions found" })),
            )
            .mount(&server)
            .await;

        let internal = client(Duration::from_secs(5))
            .fetch_internal_txs(&provider(&server), TxHash::ZERO)
            .await;
        assert_eq!(internal, Some(vec![]));
    }

    #[tokio::test]
    async fn rate_limited_reply_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "0",
                "message": "NOTOK",
                "result": "Max rate limit reached"
            })))
            .mount(&server)
            .await;
        let client = client(Duration::from_secs(5));
        let provider = provider(&server);

        assert_eq!(
            client.fetch_internal_txs(&provider, TxHash::ZERO).await,
            None
        );
        assert!(client.fetch_logs(&provider, ENTRY_POINT, 1).await.is_empty());
        assert!(matches!(
            parse_result::<InternalTx>(ExplorerResponse {
                message: Some("NOTOK".to_string()),
                result: json!("Max rate limit reached"),
            }),
            Err(ExplorerError::Api { message, result })
                if message == "NOTOK" && result == "Max rate limit reached"
        ));
    }

    #[tokio::test]
    async fn fetch_internal_txs_parses_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "txlistinternal"))
            .and(query_param(
                "txhash",
                "0x0303030303030303030303030303030303030303030303030303030303030303",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{
                    "from": "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789",
                    "to": "0x1111111111111111111111111111111111111111",
                    "value": "1000",
                    "type": "call",
                    "isError": "0"
                }]
            })))
            .mount(&server)
            .await;

        let internal = client(Duration::from_secs(5))
            .fetch_internal_txs(
                &provider(&server),
                b256!("0303030303030303030303030303030303030303030303030303030303030303"),
            )
            .await
            .unwrap();
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].call_type.as_deref(), Some("call"));
        assert_eq!(internal[0].value.as_deref(), Some("1000"));
    }
}
