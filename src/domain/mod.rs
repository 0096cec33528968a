//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the command grammar and the weekly window rules live here.
//! Dependencies flow inward.

pub mod a2a;
pub mod command;
pub mod entities;
pub mod errors;
pub mod ledger;
pub mod money;

pub use a2a::{
    A2AMessage, Artifact, MessageConfiguration, MessagePart, PushAuthentication,
    PushNotificationConfig, Role, TaskResult, TaskState, TaskStatus,
};
pub use command::{Command, parse_command};
pub use entities::{Transaction, TransactionKind, UpdatedTotals, UserLedger, WeeklySummary};
pub use errors::{DomainError, ParseError};
pub use money::Money;
