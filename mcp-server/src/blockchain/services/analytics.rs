// src/blockchain/services/analytics.rs

//! Wallet analytics over a small window of recent blocks.
//!
//! Standard EVM RPC has no per-address history, so recent activity is
//! sampled by walking the newest blocks and fetching their transactions
//! one by one. Anything older than the window is not seen.

use std::str::FromStr;
use std::sync::Arc;

use ethers::{
    types::{Address, Transaction, H256, U256},
    utils::to_checksum,
};
use futures::future::try_join_all;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::{
    blockchain::{
        client::ChainReader,
        models::{
            ActivitySummary, AnalyticsError, AnalyticsRequest, AnalyticsResult, BlockchainInfo,
            ChainBlock, ChainInfo, Direction, TransactionRecord, DEFAULT_LIMIT, MAX_LIMIT,
            MIN_LIMIT,
        },
    },
    utils::{format_timestamp, is_address, wei_to_eth},
};

pub const TOOL_NAME: &str = "wallet_analytics";
pub const TOOL_DESCRIPTION: &str = "Analyze wallet activity and transaction history";

/// Number of most recent blocks scanned for matching transactions.
pub const BLOCK_WINDOW: u64 = 10;

/// JSON schema of the tool arguments, as advertised in `tools/list`.
pub fn input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "address": {
                "type": "string",
                "description": "The wallet address to analyze (defaults to user wallet if not provided)"
            },
            "limit": {
                "type": "integer",
                "minimum": MIN_LIMIT,
                "maximum": MAX_LIMIT,
                "default": DEFAULT_LIMIT,
                "description": "Number of transactions to analyze (max 100)"
            }
        },
        "additionalProperties": false
    })
}

/// Block numbers in the scan window, newest first.
pub fn scan_window(latest_block: u64) -> Vec<u64> {
    let size = BLOCK_WINDOW.min(latest_block);
    (0..size).map(|offset| latest_block - offset).collect()
}

/// A transaction that could not be fetched during the scan.
#[derive(Debug)]
pub struct TransactionFetchFailure {
    pub hash: H256,
    pub block_number: u64,
    pub error: anyhow::Error,
}

/// Result of scanning the block window: the matches in block order and the
/// per-transaction failures that were skipped over.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<TransactionRecord>,
    pub failures: Vec<TransactionFetchFailure>,
}

/// The `wallet_analytics` tool.
#[derive(Clone)]
pub struct WalletAnalytics {
    client: Arc<dyn ChainReader>,
    default_chain: ChainInfo,
}

impl WalletAnalytics {
    /// `default_chain` is reported when the client has no chain configured.
    pub fn new(client: Arc<dyn ChainReader>, default_chain: ChainInfo) -> Self {
        Self {
            client,
            default_chain,
        }
    }

    /// Runs the analysis and returns it as pretty-printed JSON.
    pub async fn handle(&self, request: &AnalyticsRequest) -> Result<String, AnalyticsError> {
        let result = self.analyze(request).await?;
        Ok(serde_json::to_string_pretty(&result)?)
    }

    pub async fn analyze(&self, request: &AnalyticsRequest) -> Result<AnalyticsResult, AnalyticsError> {
        let (target, address) = self.resolve_target(request.address.as_deref())?;
        let limit = request.limit as usize;
        info!("Analyzing wallet {} (limit {})", target, limit);

        let (balance, transaction_count, latest_block) = tokio::try_join!(
            async {
                self.client
                    .balance(address)
                    .await
                    .map_err(|e| AnalyticsError::upstream("balance", e))
            },
            async {
                self.client
                    .transaction_count(address)
                    .await
                    .map_err(|e| AnalyticsError::upstream("transaction count", e))
            },
            async {
                self.client
                    .block_number()
                    .await
                    .map_err(|e| AnalyticsError::upstream("latest block number", e))
            },
        )?;

        let blocks = self.fetch_window(latest_block).await?;
        let outcome = self.scan_blocks(address, &blocks, limit).await;
        if !outcome.failures.is_empty() {
            warn!(
                "{} transaction(s) could not be fetched while analyzing {}",
                outcome.failures.len(),
                target
            );
        }

        let chain = self.client.chain().unwrap_or_else(|| self.default_chain.clone());

        Ok(AnalyticsResult {
            address: target,
            balance_in_eth: wei_to_eth(balance),
            transaction_count: transaction_count.low_u64(),
            analytics: summarize(&outcome.records),
            recent_transactions: outcome.records,
            blockchain_info: BlockchainInfo {
                network: chain.name,
                chain_id: chain.id,
                latest_block,
            },
        })
    }

    /// Explicit address first, then the connected account. An empty
    /// address counts as absent.
    fn resolve_target(&self, explicit: Option<&str>) -> Result<(String, Address), AnalyticsError> {
        let target = match explicit.filter(|address| !address.is_empty()) {
            Some(address) => address.to_string(),
            None => match self.client.account() {
                Some(account) => to_checksum(&account, None),
                None => {
                    return Err(AnalyticsError::InvalidAddress(
                        "no address given and no wallet connected".to_string(),
                    ))
                }
            },
        };

        if !is_address(&target) {
            return Err(AnalyticsError::InvalidAddress(target));
        }
        let address = Address::from_str(&target[2..])
            .map_err(|_| AnalyticsError::InvalidAddress(target.clone()))?;
        Ok((target, address))
    }

    /// Fetches every block of the window concurrently. A single failure or
    /// missing block fails the whole request.
    async fn fetch_window(&self, latest_block: u64) -> Result<Vec<ChainBlock>, AnalyticsError> {
        let window = scan_window(latest_block);
        debug!("Fetching {} block(s) down from {}", window.len(), latest_block);

        try_join_all(window.into_iter().map(|number| async move {
            match self.client.block(number).await {
                Ok(Some(mut block)) => {
                    block.number.get_or_insert(number.into());
                    Ok(block)
                }
                Ok(None) => Err(AnalyticsError::upstream(
                    format!("block {}", number),
                    anyhow::anyhow!("block not found"),
                )),
                Err(e) => Err(AnalyticsError::upstream(format!("block {}", number), e)),
            }
        }))
        .await
    }

    /// Walks the blocks in order, fetching hash entries one at a time, and
    /// stops as soon as `limit` matches are collected.
    pub async fn scan_blocks(&self, target: Address, blocks: &[ChainBlock], limit: usize) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        'blocks: for block in blocks {
            if outcome.records.len() >= limit {
                break;
            }
            let block_number = block.number.map(|n| n.as_u64()).unwrap_or_default();
            let hashes = block.transaction_hashes();
            let skipped = block.transactions.len() - hashes.len();
            if skipped > 0 {
                debug!("Skipping {} expanded transaction(s) in block {}", skipped, block_number);
            }

            for hash in hashes {
                if outcome.records.len() >= limit {
                    break 'blocks;
                }
                match self.client.transaction(hash).await {
                    Ok(Some(tx)) => {
                        if let Some(record) = match_transaction(&tx, target, block) {
                            outcome.records.push(record);
                        }
                    }
                    Ok(None) => debug!("Transaction {:?} not found, skipping", hash),
                    Err(error) => {
                        warn!("Failed to fetch transaction {:?}: {:#}", hash, error);
                        outcome.failures.push(TransactionFetchFailure {
                            hash,
                            block_number,
                            error,
                        });
                    }
                }
            }
        }

        outcome
    }
}

/// Builds a record when `tx` was sent from or to `target`. Address
/// comparison is on the parsed bytes, so casing never matters.
pub fn match_transaction(tx: &Transaction, target: Address, block: &ChainBlock) -> Option<TransactionRecord> {
    let direction = if tx.from == target {
        Direction::Outgoing
    } else if tx.to == Some(target) {
        Direction::Incoming
    } else {
        return None;
    };

    let block_number = tx
        .block_number
        .or(block.number)
        .map(|n| n.as_u64())
        .unwrap_or_default();

    Some(TransactionRecord {
        hash: format!("{:?}", tx.hash),
        from: to_checksum(&tx.from, None),
        to: tx.to.map(|to| to_checksum(&to, None)),
        value: tx.value.to_string(),
        block_number,
        timestamp: format_timestamp(block.timestamp),
        direction,
    })
}

/// Counts and ether totals per direction.
pub fn summarize(records: &[TransactionRecord]) -> ActivitySummary {
    let mut summary = ActivitySummary {
        outgoing_count: 0,
        incoming_count: 0,
        total_value_sent: 0.0,
        total_value_received: 0.0,
    };
    for record in records {
        let value = U256::from_dec_str(&record.value).map(wei_to_eth).unwrap_or_default();
        match record.direction {
            Direction::Outgoing => {
                summary.outgoing_count += 1;
                summary.total_value_sent += value;
            }
            Direction::Incoming => {
                summary.incoming_count += 1;
                summary.total_value_received += value;
            }
        }
    }
    summary
}
