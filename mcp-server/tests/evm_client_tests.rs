//! Tests for the ethers-backed chain reader against a local fake node

mod common;

use std::sync::Arc;

use ethers::types::{H256, U256};
use wallet_analytics_mcp::blockchain::{
    client::{ChainReader, EvmClient},
    models::{AnalyticsError, AnalyticsRequest, ChainInfo, Direction},
    services::analytics::WalletAnalytics,
};

use common::{addr, spawn_fake_node, transfer, ChainState, ETHER};

fn base() -> ChainInfo {
    ChainInfo {
        name: "Base".to_string(),
        id: 8453,
    }
}

#[tokio::test]
async fn reads_account_and_blocks() {
    let me = addr(0xaa);
    let mut state = ChainState::new(12);
    state.balance = U256::from(ETHER) * 3;
    state.nonce = U256::from(42u64);
    state.add(transfer(1, me, Some(addr(2)), U256::from(ETHER), 11));
    let url = spawn_fake_node(state).await;

    let client = EvmClient::new(&url, None, None).unwrap();
    assert_eq!(client.balance(me).await.unwrap(), U256::from(ETHER) * 3);
    assert_eq!(client.transaction_count(me).await.unwrap(), U256::from(42u64));
    assert_eq!(client.block_number().await.unwrap(), 12);

    let block = client.block(11).await.unwrap().unwrap();
    assert_eq!(block.transaction_hashes(), vec![H256::from_low_u64_be(1)]);
    assert!(client.block(500).await.unwrap().is_none());

    let tx = client.transaction(H256::from_low_u64_be(1)).await.unwrap().unwrap();
    assert_eq!(tx.from, me);
    assert_eq!(tx.value, U256::from(ETHER));
    assert!(client
        .transaction(H256::from_low_u64_be(99))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn end_to_end_analytics_over_rpc() {
    let me = addr(0xaa);
    let mut state = ChainState::new(30);
    state.balance = U256::from(ETHER) / 2;
    state.nonce = U256::from(3u64);
    state.add(transfer(1, me, Some(addr(2)), U256::from(ETHER) * 3 / 2, 29));
    state.add(transfer(2, addr(3), Some(me), U256::from(ETHER), 29));
    state.add(transfer(3, addr(4), Some(me), U256::from(ETHER), 28));
    state.add(transfer(4, addr(5), Some(addr(6)), U256::from(ETHER), 27));
    // outside the ten block window
    state.add(transfer(5, addr(5), Some(me), U256::from(ETHER), 15));
    state.failing.insert(H256::from_low_u64_be(3));
    let url = spawn_fake_node(state).await;

    let client = EvmClient::new(&url, Some(me), None).unwrap();
    let analytics = WalletAnalytics::new(Arc::new(client), base());
    let result = analytics.analyze(&AnalyticsRequest::default()).await.unwrap();

    assert_eq!(result.balance_in_eth, 0.5);
    assert_eq!(result.transaction_count, 3);
    assert_eq!(result.blockchain_info.latest_block, 30);
    assert_eq!(result.blockchain_info.network, "Base");
    assert_eq!(result.recent_transactions.len(), 2);
    assert_eq!(result.recent_transactions[0].direction, Direction::Outgoing);
    assert_eq!(result.recent_transactions[1].direction, Direction::Incoming);
    assert_eq!(result.analytics.total_value_sent, 1.5);
    assert_eq!(result.analytics.total_value_received, 1.0);
    assert_eq!(
        result.recent_transactions[0].timestamp.as_deref(),
        Some("2024-01-01T00:05:48.000Z")
    );
}

#[tokio::test]
async fn unreachable_node_is_an_upstream_error() {
    // Nothing listens on the discard port.
    let client = EvmClient::new("http://127.0.0.1:9", None, None).unwrap();
    let analytics = WalletAnalytics::new(Arc::new(client), base());
    let err = analytics
        .analyze(&AnalyticsRequest {
            address: Some(format!("{:?}", addr(1))),
            limit: 5,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::UpstreamFetch { .. }));
}
