//! Read-only chain access used by the analytics handler.
//!
//! The handler never talks to a node directly. It goes through
//! [`ChainReader`], which [`EvmClient`] implements on top of an `ethers`
//! HTTP provider and which tests implement in memory.

use anyhow::Result;
use async_trait::async_trait;
use ethers::{
    providers::{Http, Provider},
    types::{Address, Transaction, H256, U256},
};

pub use super::evm_client::EvmClient;
use crate::blockchain::models::{ChainBlock, ChainInfo};

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Balance of `address` in wei at the latest block.
    async fn balance(&self, address: Address) -> Result<U256>;

    /// Number of transactions sent from `address` (its nonce).
    async fn transaction_count(&self, address: Address) -> Result<U256>;

    async fn block_number(&self) -> Result<u64>;

    /// `Ok(None)` when the node does not know the block.
    async fn block(&self, number: u64) -> Result<Option<ChainBlock>>;

    /// `Ok(None)` when the node does not know the transaction.
    async fn transaction(&self, hash: H256) -> Result<Option<Transaction>>;

    /// Account of the connected wallet, if one is configured.
    fn account(&self) -> Option<Address>;

    /// Chain the client is configured for, if any.
    fn chain(&self) -> Option<ChainInfo>;
}

/// Create a provider for the given RPC URL
pub fn create_provider(rpc_url: &str) -> Result<Provider<Http>> {
    Provider::<Http>::try_from(rpc_url)
        .map_err(|e| anyhow::anyhow!("Failed to create provider for {}: {}", rpc_url, e))
}
