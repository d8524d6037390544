// src/config.rs

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use ethers::types::{Address, Chain};
use ethers_signers::{LocalWallet, Signer};
use secrecy::{ExposeSecret, SecretString};

use crate::blockchain::models::ChainInfo;

/// Network reported when the connected client has no chain configured.
pub const DEFAULT_NETWORK_NAME: &str = "Base";
pub const DEFAULT_CHAIN_ID: u64 = 8453;

// A struct to hold all configuration, loaded once at startup from the .env file.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// JSON-RPC endpoint of the EVM node every read goes through.
    pub rpc_url: String,
    /// Chain the connected client is configured for, if any.
    pub chain_id: Option<u64>,
    pub chain_name: Option<String>,

    /// Fallback network reported in `blockchainInfo` when `chain_id` is unset.
    pub default_network_name: String,
    pub default_chain_id: u64,

    // Wallet settings
    pub wallet_address: Option<String>,
    pub wallet_private_key: Option<SecretString>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: None,
            chain_name: None,
            default_network_name: DEFAULT_NETWORK_NAME.to_string(),
            default_chain_id: DEFAULT_CHAIN_ID,
            wallet_address: None,
            wallet_private_key: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let rpc_url = env::var("RPC_URL").context("RPC_URL must be set to the node's JSON-RPC endpoint")?;

        let chain_id = env::var("CHAIN_ID")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("CHAIN_ID must be a valid number")?;

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            rpc_url,
            chain_id,
            chain_name: env::var("CHAIN_NAME").ok(),

            default_network_name: env::var("DEFAULT_NETWORK_NAME")
                .unwrap_or_else(|_| DEFAULT_NETWORK_NAME.to_string()),
            default_chain_id: env::var("DEFAULT_CHAIN_ID")
                .unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string())
                .parse()
                .context("DEFAULT_CHAIN_ID must be a valid number")?,

            wallet_address: env::var("WALLET_ADDRESS").ok(),
            wallet_private_key: env::var("WALLET_PRIVATE_KEY").ok().map(SecretString::new),
        })
    }

    /// The chain the client is connected to. The name falls back to the
    /// well-known name for the id, then to `chain-<id>`.
    pub fn configured_chain(&self) -> Option<ChainInfo> {
        let id = self.chain_id?;
        let name = self.chain_name.clone().unwrap_or_else(|| {
            Chain::try_from(id)
                .map(|chain| chain.to_string())
                .unwrap_or_else(|_| format!("chain-{}", id))
        });
        Some(ChainInfo { name, id })
    }

    pub fn default_chain(&self) -> ChainInfo {
        ChainInfo {
            name: self.default_network_name.clone(),
            id: self.default_chain_id,
        }
    }

    /// Resolves the connected account: `WALLET_ADDRESS` wins, otherwise the
    /// address is derived from `WALLET_PRIVATE_KEY`.
    pub fn account_address(&self) -> Result<Option<Address>> {
        if let Some(address) = &self.wallet_address {
            let parsed = Address::from_str(address.trim())
                .map_err(|e| anyhow!("WALLET_ADDRESS is not a valid address: {}", e))?;
            return Ok(Some(parsed));
        }
        match &self.wallet_private_key {
            Some(key) => {
                let wallet = LocalWallet::from_str(key.expose_secret().trim_start_matches("0x"))
                    .map_err(|e| anyhow!("WALLET_PRIVATE_KEY is not a valid private key: {}", e))?;
                Ok(Some(wallet.address()))
            }
            None => Ok(None),
        }
    }
}
