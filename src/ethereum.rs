//! Ethereum JSON-RPC gateway client and the domain types it returns.
//!
//! The client wraps the four read-only operations the explorer depends on:
//! current block height, block-with-transactions, transaction receipt, and
//! address balance. Responses are walked as `serde_json::Value` and converted
//! into owned domain structs; quantities arrive as 0x-prefixed hex strings
//! and are decoded into `u64` or `U256` without ever passing through floats.

use primitive_types::U256;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

use crate::error::EthError;

/// Default timeout for gateway requests in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Placeholder credential for hosted endpoints when no API key is configured.
const DEMO_API_KEY: &str = "demo";

// Network types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Sepolia,
    Localnet,
    Custom { name: String, rpc_url: String },
}

impl Network {
    pub fn as_str(&self) -> &str {
        match self {
            Network::Mainnet => "Mainnet",
            Network::Sepolia => "Sepolia",
            Network::Localnet => "Localnet",
            Network::Custom { name, .. } => name,
        }
    }

    /// Resolves the JSON-RPC endpoint URL for this network.
    ///
    /// Hosted networks append the API credential to the URL path; the
    /// credential itself is never rendered anywhere in the UI.
    pub fn rpc_url(&self, api_key: Option<&str>) -> String {
        let key = api_key.unwrap_or(DEMO_API_KEY);
        match self {
            Network::Mainnet => format!("https://eth-mainnet.g.alchemy.com/v2/{key}"),
            Network::Sepolia => format!("https://eth-sepolia.g.alchemy.com/v2/{key}"),
            Network::Localnet => "http://localhost:8545".to_string(),
            Network::Custom { rpc_url, .. } => rpc_url.clone(),
        }
    }
}

// API Client
#[derive(Debug, Clone)]
pub struct EthClient {
    network: Network,
    api_key: Option<String>,
    http: Client,
}

impl EthClient {
    pub fn new(network: Network, api_key: Option<String>) -> Self {
        Self {
            network,
            api_key,
            http: Client::new(),
        }
    }

    /// Sends a single JSON-RPC request and extracts its `result` member.
    async fn rpc(&self, method: &str, params: Value) -> Result<Value, EthError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(self.network.rpc_url(self.api_key.as_deref()))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let envelope: Value = response.json().await?;

        if let Some(error) = envelope.get("error") {
            let code = error["code"].as_i64().unwrap_or(0);
            let message = error["message"].as_str().unwrap_or("unknown").to_string();
            tracing::debug!("{method} failed with RPC error {code}: {message}");
            return Err(EthError::Rpc { code, message });
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| EthError::parse(format!("{method} response has no result")))
    }

    /// Fetches the current block height (`eth_blockNumber`).
    pub async fn get_block_number(&self) -> Result<u64, EthError> {
        let result = self.rpc("eth_blockNumber", json!([])).await?;
        parse_quantity(&result)
    }

    /// Fetches a block and its full transaction objects
    /// (`eth_getBlockByNumber` with the transaction flag set).
    pub async fn get_block_with_transactions(&self, number: u64) -> Result<BlockDetails, EthError> {
        let tag = format!("0x{number:x}");
        let result = self.rpc("eth_getBlockByNumber", json!([tag, true])).await?;
        if result.is_null() {
            return Err(EthError::parse(format!("block {number} not found")));
        }
        BlockDetails::from_json(&result)
    }

    /// Fetches the receipt for a transaction hash
    /// (`eth_getTransactionReceipt`). Returns `None` while the transaction
    /// is not yet mined.
    pub async fn get_transaction_receipt(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionReceipt>, EthError> {
        if !is_hex_hash(hash) {
            return Err(EthError::invalid_input(format!(
                "'{hash}' is not a transaction hash"
            )));
        }
        let result = self.rpc("eth_getTransactionReceipt", json!([hash])).await?;
        if result.is_null() {
            return Ok(None);
        }
        TransactionReceipt::from_json(&result).map(Some)
    }

    /// Fetches the wei balance of an address at the latest block
    /// (`eth_getBalance`).
    pub async fn get_balance(&self, address: &str) -> Result<U256, EthError> {
        if !is_hex_address(address) {
            return Err(EthError::invalid_input(format!(
                "'{address}' is not an address"
            )));
        }
        let result = self.rpc("eth_getBalance", json!([address, "latest"])).await?;
        parse_u256(&result)
    }
}

/// A fetched block header plus its transactions. Replaced wholesale on each
/// explicit fetch; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDetails {
    pub number: u64,
    pub timestamp: String,
    pub transactions: Vec<TransactionRecord>,
}

impl BlockDetails {
    pub(crate) fn from_json(block: &Value) -> Result<Self, EthError> {
        let number = parse_quantity(&block["number"])?;
        let timestamp = format_timestamp(parse_quantity(&block["timestamp"]).unwrap_or(0));

        let transactions = block["transactions"]
            .as_array()
            .ok_or_else(|| EthError::parse("block has no transactions array"))?
            .iter()
            .map(TransactionRecord::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            number,
            timestamp,
            transactions,
        })
    }
}

/// One transaction row of a block. `to` is absent for contract creations.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
}

impl TransactionRecord {
    fn from_json(txn: &Value) -> Result<Self, EthError> {
        Ok(Self {
            hash: required_str(txn, "hash")?,
            from: required_str(txn, "from")?,
            to: optional_str(txn, "to"),
        })
    }
}

/// Post-execution record of a transaction's outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReceipt {
    pub to: Option<String>,
    pub from: String,
    pub contract_address: Option<String>,
    pub transaction_index: u64,
    pub gas_used: U256,
    pub logs_bloom: String,
    pub transaction_hash: String,
    pub logs: Vec<Value>,
    pub block_number: u64,
    pub txn_type: u64,
    pub status: u64,
    pub cumulative_gas_used: U256,
    pub effective_gas_price: U256,
}

impl TransactionReceipt {
    pub(crate) fn from_json(receipt: &Value) -> Result<Self, EthError> {
        Ok(Self {
            to: optional_str(receipt, "to"),
            from: required_str(receipt, "from")?,
            contract_address: optional_str(receipt, "contractAddress"),
            transaction_index: parse_quantity(&receipt["transactionIndex"])?,
            gas_used: parse_u256(&receipt["gasUsed"])?,
            logs_bloom: required_str(receipt, "logsBloom")?,
            transaction_hash: required_str(receipt, "transactionHash")?,
            logs: receipt["logs"].as_array().cloned().unwrap_or_default(),
            block_number: parse_quantity(&receipt["blockNumber"])?,
            txn_type: parse_quantity(&receipt["type"]).unwrap_or(0),
            status: parse_quantity(&receipt["status"]).unwrap_or(0),
            cumulative_gas_used: parse_u256(&receipt["cumulativeGasUsed"])?,
            effective_gas_price: parse_u256(&receipt["effectiveGasPrice"])?,
        })
    }
}

// Hex decoding helpers. Quantities arrive as 0x-prefixed, unpadded hex.

fn hex_digits(value: &Value) -> Result<&str, EthError> {
    let text = value
        .as_str()
        .ok_or_else(|| EthError::parse(format!("expected hex string, got {value}")))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    if digits.is_empty() {
        return Err(EthError::parse("empty hex quantity"));
    }
    Ok(digits)
}

fn parse_quantity(value: &Value) -> Result<u64, EthError> {
    let digits = hex_digits(value)?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| EthError::parse(format!("bad quantity '{digits}': {e}")))
}

fn parse_u256(value: &Value) -> Result<U256, EthError> {
    let digits = hex_digits(value)?;
    U256::from_str_radix(digits, 16)
        .map_err(|e| EthError::parse(format!("bad quantity '{digits}': {e:?}")))
}

fn required_str(object: &Value, key: &str) -> Result<String, EthError> {
    object[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| EthError::parse(format!("missing field '{key}'")))
}

fn optional_str(object: &Value, key: &str) -> Option<String> {
    object[key].as_str().map(str::to_string)
}

fn format_timestamp(secs: u64) -> String {
    if secs == 0 {
        return "Timestamp not available".to_string();
    }
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%a, %d %b %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Timestamp not available".to_string())
}

/// Returns `true` for a 0x-prefixed 20-byte hex address.
pub fn is_hex_address(text: &str) -> bool {
    is_prefixed_hex(text, 40)
}

/// Returns `true` for a 0x-prefixed 32-byte hex hash.
pub fn is_hex_hash(text: &str) -> bool {
    is_prefixed_hex(text, 64)
}

fn is_prefixed_hex(text: &str, digits: usize) -> bool {
    match text.strip_prefix("0x") {
        Some(rest) => rest.len() == digits && rest.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
