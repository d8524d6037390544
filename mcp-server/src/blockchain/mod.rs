// src/blockchain/mod.rs

pub mod client;
pub use client::{ChainReader, EvmClient};

pub mod evm_client;
pub mod models;
pub mod services;
