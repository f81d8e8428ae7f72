use crate::types::TransactionId;
use thiserror::Error;

/// Every way a service operation can be refused.
///
/// Absence on a plain read is not an error; `NotFound` is only raised when an
/// update or delete targets a record that does not exist.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum TransactionError {
    #[error("Invalid transaction amount")]
    InvalidAmount,
    #[error("Transaction amount cannot be negative")]
    NegativeAmount,
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,
    #[error("Invalid transaction type")]
    InvalidType,
    #[error("Transaction description is required")]
    MissingDescription,
    #[error("Transaction category is required")]
    MissingCategory,
    #[error("Invalid pagination parameters")]
    InvalidPagination,
    #[error("Transaction not found [{transaction_id}]")]
    NotFound {
        transaction_id: TransactionId
    }
}

impl TransactionError {
    pub fn not_found(transaction_id: TransactionId) -> Self {
        Self::NotFound { transaction_id }
    }

    /// Stable identifier surfaced to clients alongside the message.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::InvalidType => "INVALID_TYPE",
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::MissingCategory => "MISSING_CATEGORY",
            Self::InvalidPagination => "INVALID_PAGINATION",
            Self::NotFound { .. } => "TRANSACTION_NOT_FOUND"
        }
    }

    /// HTTP status an adapter should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            _ => 400
        }
    }
}
