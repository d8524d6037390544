// src/blockchain/models.rs
use ethers::types::{Transaction, H256, U256, U64};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

// --- Error types for analytics operations ---

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("failed to fetch {what}: {source}")]
    UpstreamFetch {
        what: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to serialize analytics: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub fn upstream(what: impl Into<String>, source: anyhow::Error) -> Self {
        AnalyticsError::UpstreamFetch {
            what: what.into(),
            source,
        }
    }
}

// --- Chain Models ---

/// A network identity as reported in `blockchainInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub name: String,
    pub id: u64,
}

/// One entry of a block's `transactions` array. Nodes return bare hashes
/// unless full transactions were requested, but either shape may appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransaction {
    Hash(H256),
    Full(Box<Transaction>),
}

/// The subset of a block body the analytics scan reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainBlock {
    #[serde(default)]
    pub number: Option<U64>,
    /// Seconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: U256,
    #[serde(default)]
    pub transactions: Vec<BlockTransaction>,
}

impl ChainBlock {
    /// Hashes of transactions that still have to be fetched. Expanded
    /// entries are not followed.
    pub fn transaction_hashes(&self) -> Vec<H256> {
        self.transactions
            .iter()
            .filter_map(|entry| match entry {
                BlockTransaction::Hash(hash) => Some(*hash),
                BlockTransaction::Full(_) => None,
            })
            .collect()
    }
}

// --- Analytics Request ---

pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_LIMIT: u32 = 10;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Arguments of the `wallet_analytics` tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsRequest {
    /// Wallet to analyze; the connected account when absent.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}

impl Default for AnalyticsRequest {
    fn default() -> Self {
        Self {
            address: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

// --- Analytics Result ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// A transaction from the scanned window that touches the target address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    /// Transferred amount in wei, as a decimal string.
    pub value: String,
    pub block_number: u64,
    pub timestamp: Option<String>,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub outgoing_count: usize,
    pub incoming_count: usize,
    pub total_value_sent: f64,
    pub total_value_received: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainInfo {
    pub network: String,
    pub chain_id: u64,
    pub latest_block: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub address: String,
    pub balance_in_eth: f64,
    pub transaction_count: u64,
    pub recent_transactions: Vec<TransactionRecord>,
    pub analytics: ActivitySummary,
    pub blockchain_info: BlockchainInfo,
}
