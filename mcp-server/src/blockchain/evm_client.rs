// src/blockchain/evm_client.rs

use crate::blockchain::{
    client::{create_provider, ChainReader},
    models::{ChainBlock, ChainInfo},
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, BlockNumber, Transaction, H256, U256, U64},
};
use std::sync::Arc;

/// Client for reading from an EVM-compatible node over JSON-RPC
#[derive(Clone)]
pub struct EvmClient {
    provider: Arc<Provider<Http>>,
    account: Option<Address>,
    chain: Option<ChainInfo>,
}

impl EvmClient {
    /// Create a new EvmClient for the given RPC URL
    pub fn new(rpc_url: &str, account: Option<Address>, chain: Option<ChainInfo>) -> Result<Self> {
        let provider = create_provider(rpc_url)?;
        tracing::debug!("EVM client connected to {}", rpc_url);
        Ok(Self {
            provider: Arc::new(provider),
            account,
            chain,
        })
    }
}

#[async_trait]
impl ChainReader for EvmClient {
    async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address, None)
            .await
            .with_context(|| format!("eth_getBalance failed for {:?}", address))
    }

    async fn transaction_count(&self, address: Address) -> Result<U256> {
        self.provider
            .get_transaction_count(address, None)
            .await
            .with_context(|| format!("eth_getTransactionCount failed for {:?}", address))
    }

    async fn block_number(&self) -> Result<u64> {
        let number = self
            .provider
            .get_block_number()
            .await
            .context("eth_blockNumber failed")?;
        Ok(number.as_u64())
    }

    async fn block(&self, number: u64) -> Result<Option<ChainBlock>> {
        // Requested through the raw method so that the body deserializes into
        // `ChainBlock`, which tolerates both hash and expanded entries.
        let tag = BlockNumber::Number(U64::from(number));
        self.provider
            .request::<_, Option<ChainBlock>>("eth_getBlockByNumber", (tag, false))
            .await
            .with_context(|| format!("eth_getBlockByNumber failed for block {}", number))
    }

    async fn transaction(&self, hash: H256) -> Result<Option<Transaction>> {
        self.provider
            .get_transaction(hash)
            .await
            .with_context(|| format!("eth_getTransactionByHash failed for {:?}", hash))
    }

    fn account(&self) -> Option<Address> {
        self.account
    }

    fn chain(&self) -> Option<ChainInfo> {
        self.chain.clone()
    }
}
