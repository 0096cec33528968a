//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use super::entities::TransactionKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Session store error: {0}")]
    Store(String),

    #[error("Webhook push failed: {0}")]
    Webhook(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Stored session JSON could not be decoded or encoded.
    #[error("Session data corrupted: {0}")]
    Codec(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a single command line could not be turned into an operation.
///
/// Never fatal for a request: the agent answers the offending part with a hint
/// and keeps processing the remaining parts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no amount found in add {} command", .kind.as_str())]
    MissingAmount { kind: TransactionKind },

    #[error("amount {raw:?} is not a positive number with at most two decimals")]
    InvalidAmount { kind: TransactionKind, raw: String },
}

impl ParseError {
    /// The kind of transaction the user was trying to add.
    pub fn kind(&self) -> TransactionKind {
        match self {
            ParseError::MissingAmount { kind } | ParseError::InvalidAmount { kind, .. } => *kind,
        }
    }
}
