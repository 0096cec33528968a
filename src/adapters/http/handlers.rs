//! Route handlers: the A2A JSON-RPC endpoint and the health probe.

use super::AppState;
use super::error::{ApiError, RpcFailure};
use super::rpc::{
    ExecuteParams, JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, MessageSendParams, RpcMethod,
};
use crate::ports::TaskContext;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

/// A2A endpoint.
///
/// POST /a2a/budget
pub async fn a2a_endpoint(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<JsonRpcResponse>, RpcFailure> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Parse(e.to_string()).with_id(Value::Null))?;
    let id = raw.get("id").cloned().unwrap_or(Value::Null);

    let request: JsonRpcRequest = serde_json::from_value(raw)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()).with_id(id.clone()))?;
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(ApiError::InvalidRequest(format!(
            "unsupported jsonrpc version {:?}",
            request.jsonrpc
        ))
        .with_id(id));
    }

    let method = RpcMethod::parse(&request.method)
        .ok_or_else(|| ApiError::MethodNotFound(request.method.clone()).with_id(id.clone()))?;
    debug!(method = %request.method, "a2a request");

    let (messages, ctx, config) = match method {
        RpcMethod::MessageSend => {
            let params: MessageSendParams = decode_params(request.params, &id)?;
            (vec![params.message], TaskContext::default(), params.configuration)
        }
        RpcMethod::Execute => {
            let params: ExecuteParams = decode_params(request.params, &id)?;
            let ctx = TaskContext {
                context_id: params.context_id,
                task_id: params.task_id,
            };
            (params.messages, ctx, None)
        }
    };

    let result = state
        .agent
        .process_messages(messages, ctx, config)
        .await
        .map_err(|e| ApiError::from(e).with_id(id.clone()))?;

    Ok(Json(JsonRpcResponse::new(id, result)))
}

fn decode_params<T: DeserializeOwned>(params: Value, id: &Value) -> Result<T, RpcFailure> {
    serde_json::from_value(params)
        .map_err(|e| ApiError::InvalidParams(e.to_string()).with_id(id.clone()))
}

/// Liveness probe. Never touches the store.
///
/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "agent": "weekly_budget"}))
}
