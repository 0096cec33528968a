//! JSON-RPC 2.0 envelope for the A2A endpoint.

use crate::domain::{A2AMessage, MessageConfiguration, TaskResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Methods the agent answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    /// `message/send`: one message plus optional configuration.
    MessageSend,
    /// `execute`: a batch of messages; the last one is processed.
    Execute,
}

impl RpcMethod {
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "message/send" => Some(RpcMethod::MessageSend),
            "execute" => Some(RpcMethod::Execute),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageSendParams {
    pub message: A2AMessage,
    #[serde(default)]
    pub configuration: Option<MessageConfiguration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteParams {
    pub messages: Vec<A2AMessage>,
    #[serde(default)]
    pub context_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub result: TaskResult,
}

impl JsonRpcResponse {
    pub fn new(id: Value, result: TaskResult) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub error: RpcErrorObject,
}
