#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use ethers::types::{Address, Transaction, H256, U256, U64};
use serde_json::{json, Value};
use wallet_analytics_mcp::{
    blockchain::{
        client::ChainReader,
        models::{BlockTransaction, ChainBlock, ChainInfo},
        services::analytics::WalletAnalytics,
    },
    config::Config,
    AppState,
};

pub const ETHER: u64 = 1_000_000_000_000_000_000;
pub const GENESIS_TIME: u64 = 1_704_067_200;

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn transfer(id: u64, from: Address, to: Option<Address>, value: U256, block: u64) -> Transaction {
    Transaction {
        hash: H256::from_low_u64_be(id),
        from,
        to,
        value,
        block_number: Some(U64::from(block)),
        ..Default::default()
    }
}

/// Chain state shared by the in-memory reader and the fake JSON-RPC node.
#[derive(Default, Clone)]
pub struct ChainState {
    pub latest: u64,
    pub balance: U256,
    pub nonce: U256,
    pub blocks: HashMap<u64, Vec<H256>>,
    pub transactions: HashMap<H256, Transaction>,
    pub failing: HashSet<H256>,
}

impl ChainState {
    pub fn new(latest: u64) -> Self {
        Self {
            latest,
            blocks: (0..=latest).map(|n| (n, Vec::new())).collect(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, tx: Transaction) {
        let block = tx.block_number.map(|n| n.as_u64()).unwrap_or_default();
        self.blocks.entry(block).or_default().push(tx.hash);
        self.transactions.insert(tx.hash, tx);
    }

    pub fn block(&self, number: u64) -> Option<ChainBlock> {
        self.blocks.get(&number).map(|hashes| ChainBlock {
            number: Some(U64::from(number)),
            timestamp: U256::from(GENESIS_TIME + number * 12),
            transactions: hashes.iter().copied().map(BlockTransaction::Hash).collect(),
        })
    }
}

/// `ChainReader` backed directly by a `ChainState`.
pub struct MemoryChain {
    pub state: ChainState,
    pub account: Option<Address>,
}

#[async_trait]
impl ChainReader for MemoryChain {
    async fn balance(&self, _address: Address) -> anyhow::Result<U256> {
        Ok(self.state.balance)
    }

    async fn transaction_count(&self, _address: Address) -> anyhow::Result<U256> {
        Ok(self.state.nonce)
    }

    async fn block_number(&self) -> anyhow::Result<u64> {
        Ok(self.state.latest)
    }

    async fn block(&self, number: u64) -> anyhow::Result<Option<ChainBlock>> {
        Ok(self.state.block(number))
    }

    async fn transaction(&self, hash: H256) -> anyhow::Result<Option<Transaction>> {
        if self.state.failing.contains(&hash) {
            return Err(anyhow!("upstream timeout"));
        }
        Ok(self.state.transactions.get(&hash).cloned())
    }

    fn account(&self) -> Option<Address> {
        self.account
    }

    fn chain(&self) -> Option<ChainInfo> {
        None
    }
}

pub fn test_state(state: ChainState, account: Option<Address>) -> AppState {
    let config = Config::default();
    let analytics = WalletAnalytics::new(Arc::new(MemoryChain { state, account }), config.default_chain());
    AppState { config, analytics }
}

// --- Fake JSON-RPC node ---

fn hex(value: impl Into<U256>) -> String {
    format!("{:#x}", value.into())
}

fn transaction_json(tx: &Transaction) -> Value {
    json!({
        "hash": tx.hash,
        "nonce": "0x0",
        "blockHash": H256::from_low_u64_be(tx.block_number.map(|n| n.as_u64()).unwrap_or_default() + 1000),
        "blockNumber": tx.block_number,
        "transactionIndex": "0x0",
        "from": tx.from,
        "to": tx.to,
        "value": hex(tx.value),
        "gasPrice": "0x3b9aca00",
        "gas": "0x5208",
        "input": "0x",
        "v": "0x1b",
        "r": "0x1",
        "s": "0x1"
    })
}

fn block_json(state: &ChainState, number: u64) -> Value {
    match state.block(number) {
        Some(block) => json!({
            "number": hex(number),
            "hash": H256::from_low_u64_be(number + 1000),
            "timestamp": hex(block.timestamp),
            "transactions": state.blocks[&number],
        }),
        None => Value::Null,
    }
}

fn parse_quantity(value: &Value) -> u64 {
    value
        .as_str()
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
        .unwrap_or_default()
}

async fn handle_rpc(State(state): State<Arc<ChainState>>, Json(body): Json<Value>) -> Json<Value> {
    let id = body["id"].clone();
    let params = &body["params"];
    let result = match body["method"].as_str().unwrap_or_default() {
        "eth_getBalance" => json!(hex(state.balance)),
        "eth_getTransactionCount" => json!(hex(state.nonce)),
        "eth_blockNumber" => json!(hex(state.latest)),
        "eth_chainId" => json!("0x2105"),
        "eth_getBlockByNumber" => block_json(&state, parse_quantity(&params[0])),
        "eth_getTransactionByHash" => {
            let hash: H256 = serde_json::from_value(params[0].clone()).unwrap_or_default();
            if state.failing.contains(&hash) {
                return Json(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": -32000, "message": "request timed out" }
                }));
            }
            state
                .transactions
                .get(&hash)
                .map(transaction_json)
                .unwrap_or(Value::Null)
        }
        other => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {} not supported", other) }
            }))
        }
    };
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

/// Serves `state` as a JSON-RPC node on a random local port and returns its URL.
pub async fn spawn_fake_node(state: ChainState) -> String {
    let app = Router::new()
        .route("/", post(handle_rpc))
        .with_state(Arc::new(state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
