//! Utility functions for the wallet analytics MCP server

use chrono::{DateTime, SecondsFormat};
use ethers::{types::U256, utils::format_ether};
use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};
use validator::Validate;

use crate::mcp::protocol::{error_codes, Response};

/// Deserialize and validate tool arguments, mapping failures to an
/// invalid-params response.
pub fn parse_args<T: DeserializeOwned + Validate>(args: &Value, req_id: &Value) -> Result<T, Response> {
    let parsed: T = from_value(args.clone()).map_err(|e| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Invalid arguments: {}", e),
        )
    })?;
    parsed.validate().map_err(|e| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Invalid arguments: {}", e),
        )
    })?;
    Ok(parsed)
}

/// Loose address check: `0x` followed by 40 hex digits in any case. The
/// EIP-55 checksum is not enforced.
pub fn is_address(input: &str) -> bool {
    match input.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Converts a wei amount to ether.
pub fn wei_to_eth(wei: U256) -> f64 {
    // format_ether always yields a plain decimal
    format_ether(wei).parse::<f64>().unwrap_or(f64::MAX)
}

/// Renders a block timestamp as ISO-8601 with millisecond precision.
/// A zero or out-of-range timestamp yields `None`.
pub fn format_timestamp(seconds: U256) -> Option<String> {
    if seconds.is_zero() || seconds > U256::from(i64::MAX as u64) {
        return None;
    }
    DateTime::from_timestamp(seconds.as_u64() as i64, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
