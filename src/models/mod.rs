//! Core data models
//!
//! This module contains the data structures of the dashboard domain: the
//! transaction record, its identifier, its type, and the period filter used
//! when aggregating.

pub mod ids;
pub mod period;
pub mod transaction;

pub use ids::TransactionId;
pub use period::PeriodFilter;
pub use transaction::{
    Transaction, TransactionType, TransactionValidationError, DEFAULT_PAYMENT_METHOD,
};
