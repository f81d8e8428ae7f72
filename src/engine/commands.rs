use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{lenient_transaction_type, TransactionRequest, TransactionType};
use crate::types::{Timestamp, TransactionId};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete
}

/// A single row from a command CSV file.
///
/// `id` is the target of a get, update or delete. On a create it is an optional
/// client-chosen identity.
#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    #[serde(rename = "op")]
    pub operation: Operation,
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

impl Command {
    /// The payload part of the row, with `id` carried over as given.
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest {
            id: self.id,
            amount: self.amount,
            transaction_type: self.transaction_type,
            description: self.description.clone(),
            category: self.category.clone(),
            timestamp: self.timestamp
        }
    }
}
