//! Application use cases. Orchestrate domain logic via ports.

pub mod budget_agent;
pub mod ledger_service;

pub use budget_agent::BudgetAgent;
pub use ledger_service::LedgerService;
