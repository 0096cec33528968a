//! API error handling. Every failure is answered with a JSON-RPC error body.

use super::rpc::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, JsonRpcErrorResponse,
    METHOD_NOT_FOUND, PARSE_ERROR, RpcErrorObject,
};
use crate::domain::DomainError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> i64 {
        match self {
            ApiError::Parse(_) => PARSE_ERROR,
            ApiError::InvalidRequest(_) => INVALID_REQUEST,
            ApiError::MethodNotFound(_) => METHOD_NOT_FOUND,
            ApiError::InvalidParams(_) => INVALID_PARAMS,
            ApiError::Internal(_) => INTERNAL_ERROR,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Parse(_) | ApiError::InvalidRequest(_) | ApiError::InvalidParams(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MethodNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::Parse(_) => "Parse error",
            ApiError::InvalidRequest(_) => "Invalid Request",
            ApiError::MethodNotFound(_) => "Method not found",
            ApiError::InvalidParams(_) => "Invalid params",
            ApiError::Internal(_) => "Internal error",
        }
    }

    fn detail(&self) -> &str {
        match self {
            ApiError::Parse(d)
            | ApiError::InvalidRequest(d)
            | ApiError::MethodNotFound(d)
            | ApiError::InvalidParams(d)
            | ApiError::Internal(d) => d,
        }
    }

    /// Attach the request id so the error can be rendered.
    pub fn with_id(self, id: Value) -> RpcFailure {
        RpcFailure { id, error: self }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidRequest(msg) => ApiError::InvalidParams(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// An `ApiError` bound to the id of the request that caused it.
#[derive(Debug)]
pub struct RpcFailure {
    pub id: Value,
    pub error: ApiError,
}

impl IntoResponse for RpcFailure {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            error!(code = self.error.code(), error = %self.error, "request failed");
        }
        let body = JsonRpcErrorResponse {
            jsonrpc: JSONRPC_VERSION,
            id: self.id,
            error: RpcErrorObject {
                code: self.error.code(),
                message: self.error.title(),
                data: Some(self.error.detail().to_string()).filter(|d| !d.is_empty()),
            },
        };
        (status, Json(body)).into_response()
    }
}
