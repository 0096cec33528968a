//! Infrastructure adapters. Implement ports.
//!
//! HTTP server, session stores, webhook client. Map errors to DomainError.

pub mod http;
pub mod integrations;
pub mod persistence;
