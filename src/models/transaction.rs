//! Transaction model
//!
//! A single dated money movement tagged as revenue or expense. Transactions are
//! created by manual entry or CSV import and are never edited afterwards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TransactionId;

/// Payment method pre-selected for manual entries
pub const DEFAULT_PAYMENT_METHOD: &str = "PIX";

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    #[default]
    #[serde(alias = "receita")]
    Revenue,
    /// Money going out
    #[serde(alias = "despesa")]
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revenue => write!(f, "Revenue"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" | "receita" | "income" => Ok(Self::Revenue),
            "expense" | "despesa" => Ok(Self::Expense),
            other => Err(format!(
                "Unknown transaction type '{}'. Use 'revenue' or 'expense'",
                other
            )),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Assigned by the store; `None` until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TransactionId>,

    /// Transaction date; `None` when the stored value was missing or malformed
    #[serde(default, with = "lenient_date")]
    pub date: Option<NaiveDateTime>,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Monetary amount
    pub value: f64,

    /// Free-text category label
    pub category: String,

    #[serde(default)]
    pub description: String,

    /// Informational only, never aggregated
    #[serde(default)]
    pub payment_method: String,

    /// Name of an attached receipt file
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Transaction {
    /// Create a new, unpersisted transaction
    pub fn new(
        kind: TransactionType,
        date: NaiveDateTime,
        value: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            date: Some(date),
            kind,
            value,
            category: category.into(),
            description: String::new(),
            payment_method: String::new(),
            file_name: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the payment method
    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = payment_method.into();
        self
    }

    /// Attach a receipt file name
    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    /// Return a copy carrying a store-assigned identifier
    pub(crate) fn with_id(mut self, id: TransactionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_revenue(&self) -> bool {
        self.kind == TransactionType::Revenue
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.date.is_none() {
            return Err(TransactionValidationError::MissingDate);
        }

        if !self.value.is_finite() {
            return Err(TransactionValidationError::NonFiniteValue(self.value));
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        write!(
            f,
            "{} {} {} {:.2}",
            date, self.category, self.kind, self.value
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionValidationError {
    MissingDate,
    NonFiniteValue(f64),
    EmptyCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDate => write!(f, "Transaction must have a valid date"),
            Self::NonFiniteValue(v) => write!(f, "Transaction value must be a finite number, got {}", v),
            Self::EmptyCategory => write!(f, "Transaction category cannot be empty"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Serde adapter for transaction dates.
///
/// Writes ISO local date-times. Reads ISO local date-times, RFC 3339, plain
/// `YYYY-MM-DD` and `{ "seconds", "nanoseconds" }` timestamp objects; anything
/// else becomes `None` instead of failing the whole document.
mod lenient_date {
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(date: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(from_value))
    }

    fn from_value(value: &Value) -> Option<NaiveDateTime> {
        match value {
            Value::String(s) => from_str(s),
            Value::Object(map) => {
                let seconds = map
                    .get("seconds")
                    .or_else(|| map.get("_seconds"))
                    .and_then(Value::as_i64)?;
                let nanos = map
                    .get("nanoseconds")
                    .or_else(|| map.get("_nanoseconds"))
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                let nanos = u32::try_from(nanos).ok()?;
                DateTime::from_timestamp(seconds, nanos)
                    .map(|dt| dt.with_timezone(&Local).naive_local())
            }
            _ => None,
        }
    }

    fn from_str(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if let Ok(date) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(date);
        }
        if let Ok(date) = DateTime::parse_from_rfc3339(s) {
            return Some(date.with_timezone(&Local).naive_local());
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}
