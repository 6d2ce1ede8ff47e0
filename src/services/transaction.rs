//! Transaction service
//!
//! Business logic for recording transactions: validation, manual-entry
//! defaults, persistence and audit logging. Transactions are append-only.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::audit::Operation;
use crate::error::{DashboardError, DashboardResult};
use crate::models::{
    PeriodFilter, Transaction, TransactionId, TransactionType, DEFAULT_PAYMENT_METHOD,
};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for creating a transaction by hand
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub value: f64,
    pub category: String,
    pub description: Option<String>,
    /// Defaults to PIX
    pub payment_method: Option<String>,
    pub file_name: Option<String>,
}

impl CreateTransactionInput {
    /// Input with the manual-entry defaults for everything but the amount
    /// and category
    pub fn new(date: NaiveDate, value: f64, category: impl Into<String>) -> Self {
        Self {
            kind: TransactionType::default(),
            date,
            value,
            category: category.into(),
            description: None,
            payment_method: None,
            file_name: None,
        }
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a single manually entered transaction
    pub fn create(&self, input: CreateTransactionInput) -> DashboardResult<Transaction> {
        let date = input
            .date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DashboardError::Validation("Invalid transaction date".into()))?;

        let payment_method = input
            .payment_method
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

        let txn = Transaction::new(input.kind, date, input.value, input.category.trim())
            .with_description(input.description.unwrap_or_default().trim())
            .with_payment_method(payment_method)
            .with_file_name(input.file_name.filter(|f| !f.trim().is_empty()));

        txn.validate()
            .map_err(|e| DashboardError::Validation(e.to_string()))?;

        let stored = self.storage.transactions.insert(txn)?;
        self.persist(std::slice::from_ref(&stored))?;

        self.record_audit(Operation::Create, std::slice::from_ref(&stored));
        info!(id = %display_id(&stored), kind = %stored.kind, "Transaction created");

        Ok(stored)
    }

    /// Record many transactions as one write
    ///
    /// Either every transaction is stored or none is. An empty batch is a
    /// no-op.
    pub fn create_many(
        &self,
        transactions: Vec<Transaction>,
        operation: Operation,
    ) -> DashboardResult<Vec<Transaction>> {
        if transactions.is_empty() {
            return Ok(Vec::new());
        }

        for (idx, txn) in transactions.iter().enumerate() {
            txn.validate().map_err(|e| {
                DashboardError::Validation(format!("Transaction {}: {}", idx + 1, e))
            })?;
        }

        let stored = self.storage.transactions.insert_many(transactions)?;
        self.persist(&stored)?;

        self.record_audit(operation, &stored);
        info!(count = stored.len(), %operation, "Transactions stored");

        Ok(stored)
    }

    /// All of the user's transactions, newest first
    pub fn list(&self) -> DashboardResult<Vec<Transaction>> {
        self.storage.transactions.get_all()
    }

    /// Transactions inside `filter`, newest first, capped at `limit`
    pub fn list_in_period(
        &self,
        filter: PeriodFilter,
        now: chrono::NaiveDateTime,
        limit: Option<usize>,
    ) -> DashboardResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .list()?
            .into_iter()
            .filter(|t| t.date.map_or(false, |d| filter.contains(d, now)))
            .collect();

        if let Some(limit) = limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Write the store; on failure roll the in-memory inserts back
    fn persist(&self, stored: &[Transaction]) -> DashboardResult<()> {
        if let Err(e) = self.storage.transactions.save() {
            let ids: Vec<TransactionId> = stored.iter().filter_map(|t| t.id).collect();
            self.storage.transactions.discard(&ids)?;
            return Err(e);
        }
        Ok(())
    }

    fn record_audit(&self, operation: Operation, stored: &[Transaction]) {
        if let Err(e) = self.storage.audit().record(operation, stored) {
            warn!(error = %e, "Failed to write audit log");
        }
    }
}

fn display_id(txn: &Transaction) -> String {
    txn.id.map(|id| id.to_string()).unwrap_or_default()
}
