//! # MCP Handler Module
//!
//! This module implements the Model Context Protocol (MCP) for the wallet
//! analytics server. It handles incoming MCP requests and dispatches them to
//! the registered tool.
//!
//! ## Supported Tools
//!
//! - `wallet_analytics` - Balance, nonce and recent activity of a wallet

use crate::{
    blockchain::{
        models::{AnalyticsError, AnalyticsRequest},
        services::analytics::{self, TOOL_DESCRIPTION, TOOL_NAME},
    },
    mcp::protocol::{error_codes, Request, Response, ToolCallParams, ToolResult},
    utils, AppState,
};
use serde_json::{json, Value};
use tracing::{error, info};

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Convenience alias for direct method calls from CLI; rewritten into
        // tools/call internally to reuse the same logic
        TOOL_NAME => {
            let params = ToolCallParams::new(TOOL_NAME, req.params.clone());
            run_tool(&req.id, params, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the correct tool logic.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    match serde_json::from_value::<ToolCallParams>(params) {
        Ok(call) => run_tool(&req.id, call, state).await,
        Err(e) => Response::error(
            req.id,
            error_codes::INVALID_PARAMS,
            format!("Invalid tools/call params: {}", e),
        ),
    }
}

async fn run_tool(req_id: &Value, call: ToolCallParams, state: AppState) -> Response {
    match call.name.as_str() {
        TOOL_NAME => {
            let res: Result<Response, Response> = (async {
                let request = utils::parse_args::<AnalyticsRequest>(&call.arguments, req_id)?;
                let result = state
                    .analytics
                    .handle(&request)
                    .await
                    .map(ToolResult::text)
                    .and_then(|result| serde_json::to_value(result).map_err(AnalyticsError::from))
                    .map_err(|e| analytics_error_response(req_id, e))?;
                Ok(Response::success(req_id.clone(), result))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        _ => Response::error(
            req_id.clone(),
            error_codes::METHOD_NOT_FOUND,
            format!("Unknown tool: {}", call.name),
        ),
    }
}

fn analytics_error_response(req_id: &Value, err: AnalyticsError) -> Response {
    match err {
        AnalyticsError::InvalidAddress(_) => {
            Response::error(req_id.clone(), error_codes::INVALID_PARAMS, err.to_string())
        }
        AnalyticsError::UpstreamFetch { ref what, ref source } => {
            error!("wallet_analytics upstream failure on {}: {:#}", what, source);
            Response::error_with_data(
                req_id.clone(),
                error_codes::INTERNAL_ERROR,
                err.to_string(),
                json!({ "failed": what }),
            )
        }
        AnalyticsError::Serialization(_) => {
            error!("wallet_analytics failed: {}", err);
            Response::error(req_id.clone(), error_codes::INTERNAL_ERROR, err.to_string())
        }
    }
}

fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "wallet_analytics_mcp",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "Read-only EVM wallet analytics: balance, transaction count and recent activity of an address.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning a JSON definition of all available tools.
fn handle_tools_list(req: &Request) -> Response {
    let tools = json!([
        {
            "name": TOOL_NAME,
            "description": TOOL_DESCRIPTION,
            "inputSchema": analytics::input_schema()
        }
    ]);

    Response::success(req.id.clone(), json!({ "tools": tools }))
}
