//! weekly-budget: A2A webhook agent tracking weekly income and expenses.
//! Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
