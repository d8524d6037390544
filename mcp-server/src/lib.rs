// src/lib.rs

// Re-export modules
pub mod api;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// The wallet analytics tool, bound to the node client
    pub analytics: blockchain::services::analytics::WalletAnalytics,
}
