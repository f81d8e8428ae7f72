use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{lenient_transaction_type, TransactionError, TransactionType};
use crate::types::{Timestamp, TransactionId};

/// A stored transaction record.
///
/// Every field is populated: records only come into existence through
/// [`TransactionRequest::into_transaction`], after validation has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Always strictly positive.
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub description: String,
    pub category: String,
    /// When the record was created or last accepted by the service.
    pub timestamp: Timestamp
}

/// Caller-supplied payload for create and update.
///
/// Nothing here is trusted. Missing fields and unrecognized types are carried
/// as `None` so the service can refuse them with a precise error kind; an
/// amount, id or timestamp that cannot be parsed fails decoding instead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub id: Option<TransactionId>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(rename = "type", default, deserialize_with = "lenient_transaction_type")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Timestamp>
}

impl TransactionRequest {
    #[cfg(test)]
    pub fn new(amount: Decimal, transaction_type: TransactionType, description: &str, category: &str) -> Self {
        Self {
            id: None,
            amount: Some(amount),
            transaction_type: Some(transaction_type),
            description: Some(description.to_string()),
            category: Some(category.to_string()),
            timestamp: None
        }
    }

    #[cfg(test)]
    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = Some(id);
        self
    }

    #[cfg(test)]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builds the stored record under the given identity.
    ///
    /// A client-supplied timestamp is kept; `now` is used only when none was sent.
    pub fn into_transaction(self, id: TransactionId, now: Timestamp) -> Result<Transaction, TransactionError> {
        Ok(Transaction {
            id,
            amount: self.amount.ok_or(TransactionError::InvalidAmount)?,
            transaction_type: self.transaction_type.ok_or(TransactionError::InvalidType)?,
            description: self.description.ok_or(TransactionError::MissingDescription)?,
            category: self.category.ok_or(TransactionError::MissingCategory)?,
            timestamp: self.timestamp.unwrap_or(now)
        })
    }
}
